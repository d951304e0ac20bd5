pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use error::EngineError;
pub use service::{PaymentRequest, PaymentService};
pub use store::{RateTableSnapshot, RateTableStore, RuleStore};
