use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::procedure::ProcedureBillingEntry;

/// One billed procedure annotated with its payable amount and the rule
/// that produced it. `payment_rule` is never empty: when nothing is paid
/// it says why, which is what a billing audit reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedProcedure {
    #[serde(flatten)]
    pub entry: ProcedureBillingEntry,
    pub calculated_payment: BigDecimal,
    pub payment_rule: String,
    pub is_special_rule: bool,
}

/// Payment calculation for one (physician, patient) pair. Not persisted by
/// the engine; callers aggregate or export it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedPaymentResult {
    pub procedures: Vec<CalculatedProcedure>,
    pub total_payment: BigDecimal,
    /// Which top-level branch governed the calculation.
    pub applied_rule: String,
    pub calculated_at: DateTime<Utc>,
}
