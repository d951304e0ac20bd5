use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Five-tier rate vector from a hospital-supplied rate source: the Nth
/// payable procedure in a patient's set pays the Nth tier when no
/// physician-specific rule covers the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub hon1: BigDecimal,
    pub hon2: BigDecimal,
    pub hon3: BigDecimal,
    pub hon4: BigDecimal,
    pub hon5: BigDecimal,
}

impl RateTableEntry {
    /// Rate for a 0-based global position; positions past the fourth
    /// saturate at `hon5`.
    pub fn value_for_position(&self, position: usize) -> &BigDecimal {
        match position {
            0 => &self.hon1,
            1 => &self.hon2,
            2 => &self.hon3,
            3 => &self.hon4,
            _ => &self.hon5,
        }
    }
}

/// One specialty family's table, keyed by normalized procedure code.
pub type RateTable = HashMap<String, RateTableEntry>;
