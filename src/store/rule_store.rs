use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::EngineError;
use crate::models::{normalize_physician_name, DoctorPaymentRule};

/// Payment rules keyed by hospital, then by normalized physician name.
/// Built once at startup and read-only afterwards; there is no blanket
/// default rule, so a miss sends the caller to the rate-table fallback.
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: HashMap<String, HashMap<String, Arc<DoctorPaymentRule>>>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from the raw nested map, normalizing physician
    /// names and every procedure code the rules mention.
    pub fn from_hospital_map(raw: HashMap<String, HashMap<String, DoctorPaymentRule>>) -> Self {
        let mut rules: HashMap<String, HashMap<String, Arc<DoctorPaymentRule>>> = HashMap::new();
        for (hospital, doctors) in raw {
            let normalized: HashMap<String, Arc<DoctorPaymentRule>> = doctors
                .into_iter()
                .map(|(name, mut rule)| {
                    rule.normalize_codes();
                    (normalize_physician_name(&name), Arc::new(rule))
                })
                .collect();
            rules.insert(hospital, normalized);
        }
        Self { rules }
    }

    /// JSON shape: `{ "hospitalId": { "PHYSICIAN NAME": { ...rule } } }`.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let raw: HashMap<String, HashMap<String, DoctorPaymentRule>> =
            serde_json::from_str(text)?;
        Ok(Self::from_hospital_map(raw))
    }

    /// Reads the rule file at startup. A missing or malformed file is a
    /// data gap, not a crash: it degrades to an empty store with a warning
    /// and every physician falls back to the rate tables.
    pub async fn load_from_file(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => match Self::from_json(&text) {
                Ok(store) => {
                    tracing::info!(
                        "loaded payment rules for {} hospitals from {}",
                        store.rules.len(),
                        path.display()
                    );
                    store
                }
                Err(e) => {
                    tracing::warn!("rule file {} failed to parse ({}), using empty rule store", path.display(), e);
                    Self::new()
                }
            },
            Err(e) => {
                tracing::warn!("rule file {} unreadable ({}), using empty rule store", path.display(), e);
                Self::new()
            }
        }
    }

    /// Construction helper for tests and embedded setups.
    pub fn insert(
        &mut self,
        hospital: impl Into<String>,
        physician: &str,
        mut rule: DoctorPaymentRule,
    ) {
        rule.normalize_codes();
        self.rules
            .entry(hospital.into())
            .or_default()
            .insert(normalize_physician_name(physician), Arc::new(rule));
    }

    /// Pure lookup. Hospital `None` searches all hospitals in sorted order
    /// so the answer does not depend on map iteration order.
    pub fn lookup(
        &self,
        hospital: Option<&str>,
        physician: &str,
    ) -> Option<Arc<DoctorPaymentRule>> {
        let name = normalize_physician_name(physician);
        match hospital {
            Some(h) => self.rules.get(h)?.get(&name).cloned(),
            None => {
                let mut hospitals: Vec<&String> = self.rules.keys().collect();
                hospitals.sort();
                hospitals
                    .into_iter()
                    .find_map(|h| self.rules[h].get(&name).cloned())
            }
        }
    }
}
