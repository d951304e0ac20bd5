use std::sync::Arc;

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::EngineError;
use crate::models::CalculatedPaymentResult;
use crate::models::ProcedureBillingEntry;
use crate::store::{RateTableStore, RuleStore};

use super::eligibility::{filter_eligible, EligibilityPolicy};
use super::resolver;

/// One calculation request: a physician, an optional hospital and one
/// patient's billed procedures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub physician: String,
    #[serde(default)]
    pub hospital: Option<String>,
    pub procedures: Vec<ProcedureBillingEntry>,
}

/// Orchestrates one payment calculation: rate-table snapshot, rule lookup,
/// eligibility filter, then the pure resolver. Holds only read-only shared
/// state, so it is cheap to share across handlers and worker threads.
pub struct PaymentService {
    rule_store: Arc<RuleStore>,
    rate_tables: Arc<RateTableStore>,
    policy: EligibilityPolicy,
}

impl PaymentService {
    pub fn new(rule_store: Arc<RuleStore>, rate_tables: Arc<RateTableStore>) -> Self {
        Self {
            rule_store,
            rate_tables,
            policy: EligibilityPolicy::default(),
        }
    }

    pub fn with_policy(
        rule_store: Arc<RuleStore>,
        rate_tables: Arc<RateTableStore>,
        policy: EligibilityPolicy,
    ) -> Self {
        Self {
            rule_store,
            rate_tables,
            policy,
        }
    }

    /// Calculates the payable amount for one (physician, patient) pair.
    /// Fails only when called before the rate-table cold start finished.
    pub fn calculate(
        &self,
        physician: &str,
        hospital: Option<&str>,
        procedures: &[ProcedureBillingEntry],
    ) -> Result<CalculatedPaymentResult, EngineError> {
        let snapshot = self.rate_tables.snapshot()?;
        let rule = self.rule_store.lookup(hospital, physician);
        let outcome = filter_eligible(&self.policy, procedures);

        tracing::debug!(
            "calculating payment: physician '{}', {} billed, {} eligible, {} excluded, physician rule: {}",
            physician,
            procedures.len(),
            outcome.eligible.len(),
            outcome.excluded.len(),
            rule.is_some()
        );

        let result = resolver::resolve(rule.as_deref(), &snapshot, &outcome);
        tracing::info!(
            "payment calculated: physician '{}', total {}, rule '{}'",
            physician,
            result.total_payment,
            result.applied_rule
        );
        Ok(result)
    }

    /// Batch entry point for dashboard aggregation: the calculations are
    /// independent over read-only stores, so they fan out across the rayon
    /// pool. The readiness guard runs once up front.
    pub fn calculate_batch(
        &self,
        requests: &[PaymentRequest],
    ) -> Result<Vec<CalculatedPaymentResult>, EngineError> {
        self.rate_tables.snapshot()?;
        requests
            .par_iter()
            .map(|req| self.calculate(&req.physician, req.hospital.as_deref(), &req.procedures))
            .collect()
    }
}
