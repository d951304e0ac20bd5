use axum::{
    routing::{get, post},
    Router,
};
use honorarium_engine::{api, AppConfig, PaymentService, RateTableStore, RuleStore};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging with local-time format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // load configuration
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // build the rule store once; misses fall back to the rate tables
    let rules_file = PathBuf::from(&config.data.rules_file);
    let rule_store = Arc::new(RuleStore::load_from_file(&rules_file).await);

    // cold-start rate table load must finish before calculations are served
    let rates_dir = PathBuf::from(&config.data.rates_dir);
    let rate_tables = Arc::new(RateTableStore::new());
    rate_tables.load_from_dir(&rates_dir).await;

    let service = Arc::new(PaymentService::new(rule_store, rate_tables.clone()));

    // calculation routes
    let payment_routes = Router::new()
        .route("/api/payment/calculate", post(api::calculate))
        .route("/api/payment/calculate/batch", post(api::calculate_batch))
        .with_state(service);

    // rate table administration
    let reload_routes = Router::new()
        .route("/api/rates/reload", post(api::reload_rates))
        .with_state(api::ReloadState {
            store: rate_tables,
            rates_dir,
        });

    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(payment_routes)
        .merge(reload_routes)
        .layer(ServiceBuilder::new());

    // start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/payment/calculate        - one (physician, patient) calculation");
    info!("  POST /api/payment/calculate/batch  - batch calculation");
    info!("  POST /api/rates/reload             - atomic rate table reload");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
