use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration: defaults, then an optional `config.*` file,
/// then `APP_`-prefixed environment variables (e.g. `APP_SERVER__PORT`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the rule file and rate table directory live on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub rules_file: String,
    pub rates_dir: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("data.rules_file", "data/doctor_rules.json")?
            .set_default("data.rates_dir", "data/rate_tables")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}
