use crate::error::EngineError;
use crate::models::CalculatedPaymentResult;
use crate::service::{PaymentRequest, PaymentService};
use crate::store::RateTableStore;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Response envelope for a single calculation.
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<CalculatedPaymentResult>,
}

/// Request body: independent calculations for many (physician, patient) pairs.
#[derive(Debug, Deserialize)]
pub struct BatchCalculateRequest {
    pub requests: Vec<PaymentRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchCalculateResponse {
    pub success: bool,
    pub message: String,
    pub results: Option<Vec<CalculatedPaymentResult>>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
    pub tables_loaded: usize,
}

/// Shared state for the rate reload route.
#[derive(Clone)]
pub struct ReloadState {
    pub store: Arc<RateTableStore>,
    pub rates_dir: PathBuf,
}

/// Health check.
pub async fn health_check() -> &'static str {
    "OK"
}

fn error_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::RateTablesNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Single (physician, patient) calculation.
pub async fn calculate(
    State(service): State<Arc<PaymentService>>,
    Json(req): Json<PaymentRequest>,
) -> Response {
    match service.calculate(&req.physician, req.hospital.as_deref(), &req.procedures) {
        Ok(result) => {
            let response = CalculateResponse {
                success: true,
                message: format!(
                    "Calculated {} procedures for {}",
                    result.procedures.len(),
                    req.physician
                ),
                result: Some(result),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let status = error_status(&e);
            let response = CalculateResponse {
                success: false,
                message: format!("Error: {}", e),
                result: None,
            };
            (status, Json(response)).into_response()
        }
    }
}

/// Batch calculation for dashboard aggregation.
pub async fn calculate_batch(
    State(service): State<Arc<PaymentService>>,
    Json(req): Json<BatchCalculateRequest>,
) -> Response {
    match service.calculate_batch(&req.requests) {
        Ok(results) => {
            let response = BatchCalculateResponse {
                success: true,
                message: format!("Calculated {} payment results", results.len()),
                results: Some(results),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let status = error_status(&e);
            let response = BatchCalculateResponse {
                success: false,
                message: format!("Error: {}", e),
                results: None,
            };
            (status, Json(response)).into_response()
        }
    }
}

/// Re-reads the rate table directory and swaps the tables atomically;
/// in-flight calculations keep the snapshot they started with.
pub async fn reload_rates(State(state): State<ReloadState>) -> Response {
    let loaded = state.store.reload_from_dir(&state.rates_dir).await;
    let response = ReloadResponse {
        success: true,
        message: format!("Reloaded rate tables from {}", state.rates_dir.display()),
        tables_loaded: loaded,
    };
    (StatusCode::OK, Json(response)).into_response()
}
