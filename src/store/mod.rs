pub mod rate_store;
pub mod rule_store;

pub use rate_store::{RateTableSnapshot, RateTableStore};
pub use rule_store::RuleStore;
