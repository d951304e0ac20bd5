pub mod handlers;

pub use handlers::{calculate, calculate_batch, health_check, reload_rates, ReloadState};
