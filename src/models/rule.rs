use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::procedure::normalize_procedure_code;

/// Fixed monthly/contract salary: the whole calculation collapses to this
/// amount, no matter what was billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPaymentRule {
    pub amount: BigDecimal,
    pub description: String,
}

/// Pays a percentage of the gross value of every eligible procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageRule {
    pub percentage: BigDecimal,
    pub description: String,
}

/// Which procedure counts as "main" when only one is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainProcedureBasis {
    #[default]
    HighestGrossValue,
    HighestCalculatedPayment,
}

/// When a patient has several payable procedures, pay only the main one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlyMainProcedureRule {
    pub enabled: bool,
    #[serde(default)]
    pub basis: MainProcedureBasis,
    pub description: String,
}

/// Per-procedure rate with up to four occurrence tiers. Values apply by
/// occurrence order of the code within one patient's procedure set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureRateRule {
    pub procedure_code: String,
    pub standard_value: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_value: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quaternary_value: Option<BigDecimal>,
    pub description: String,
}

impl ProcedureRateRule {
    /// Value for the 1-based occurrence of this code. A missing tier falls
    /// back to the previous defined one.
    pub fn value_for_occurrence(&self, occurrence: usize) -> &BigDecimal {
        let second = self.secondary_value.as_ref().unwrap_or(&self.standard_value);
        let third = self.tertiary_value.as_ref().unwrap_or(second);
        let fourth = self.quaternary_value.as_ref().unwrap_or(third);
        match occurrence {
            0 | 1 => &self.standard_value,
            2 => second,
            3 => third,
            _ => fourth,
        }
    }
}

/// Fixed total for a specific co-occurring set of procedure codes,
/// replacing the individual rates of every listed code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboRule {
    pub codes: Vec<String>,
    pub total_value: BigDecimal,
    pub description: String,
}

/// Payment contract of one physician at one hospital.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPaymentRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_payment_rule: Option<FixedPaymentRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_rule: Option<PercentageRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_main_procedure_rule: Option<OnlyMainProcedureRule>,
    #[serde(default)]
    pub rules: Vec<ProcedureRateRule>,
    /// Legacy form carrying a single combination rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_rule: Option<ComboRule>,
    #[serde(default)]
    pub multiple_rules: Vec<ComboRule>,
}

impl DoctorPaymentRule {
    /// All combination rules in declaration order, legacy single form first.
    pub fn combo_rules(&self) -> impl Iterator<Item = &ComboRule> {
        self.multiple_rule.iter().chain(self.multiple_rules.iter())
    }

    /// Per-procedure rule for an already-normalized code.
    pub fn rule_for_code(&self, normalized_code: &str) -> Option<&ProcedureRateRule> {
        self.rules.iter().find(|r| r.procedure_code == normalized_code)
    }

    /// Normalizes every procedure code the rule mentions. Called once when
    /// the rule enters the store, so lookups never re-normalize.
    pub fn normalize_codes(&mut self) {
        for rule in &mut self.rules {
            rule.procedure_code = normalize_procedure_code(&rule.procedure_code);
        }
        for combo in self
            .multiple_rule
            .iter_mut()
            .chain(self.multiple_rules.iter_mut())
        {
            for code in &mut combo.codes {
                *code = normalize_procedure_code(code);
            }
        }
    }
}
