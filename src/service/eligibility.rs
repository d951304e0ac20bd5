use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{normalize_procedure_code, ProcedureBillingEntry};

/// Who counts as an anesthetist and which of their procedures are payable
/// anyway. Kept as data rather than hard-coded checks so hospital-specific
/// deployments can override the defaults.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    /// CBO codes treated as anesthetist roles (exact match).
    pub anesthetist_role_codes: Vec<String>,
    /// Code family payable even when performed by an anesthetist
    /// (clinical anesthesia, as opposed to the surgical family).
    pub clinical_anesthesia_prefix: String,
    /// Whitelisted codes inside the otherwise-excluded family, e.g. the
    /// caesarean anesthesia codes.
    pub anesthetist_code_exceptions: Vec<String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            anesthetist_role_codes: vec!["225151".into()],
            clinical_anesthesia_prefix: "0417".into(),
            anesthetist_code_exceptions: vec![
                // caesarean delivery, billed by the anesthetist
                "0411010034".into(),
                "0411010026".into(),
                "0409060135".into(),
            ],
        }
    }
}

impl EligibilityPolicy {
    pub fn is_anesthetist(&self, role_code: Option<&str>) -> bool {
        // missing role code -> not an anesthetist, conservative toward payment
        role_code.map_or(false, |r| {
            let r = r.trim();
            self.anesthetist_role_codes.iter().any(|c| c == r)
        })
    }

    /// Whether an anesthetist-performed procedure with this normalized code
    /// is payable anyway.
    pub fn anesthetist_payable(&self, normalized_code: &str) -> bool {
        normalized_code.starts_with(&self.clinical_anesthesia_prefix)
            || self
                .anesthetist_code_exceptions
                .iter()
                .any(|c| normalize_procedure_code(c) == normalized_code)
    }
}

/// Why a procedure was dropped before rule resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    AnesthetistExcluded,
    Duplicate,
    MalformedCode,
}

impl ExclusionReason {
    /// Audit label carried into the calculated result.
    pub fn label(&self) -> &'static str {
        match self {
            ExclusionReason::AnesthetistExcluded => "Anesthetist procedure (not paid)",
            ExclusionReason::Duplicate => "Duplicated (not paid)",
            ExclusionReason::MalformedCode => "Malformed procedure code (not paid)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedProcedure {
    pub entry: ProcedureBillingEntry,
    pub reason: ExclusionReason,
}

/// Ordered, deduplicated payable procedures plus the parallel record of
/// everything that was dropped and why.
#[derive(Debug, Clone, Default)]
pub struct EligibilityOutcome {
    pub eligible: Vec<ProcedureBillingEntry>,
    pub excluded: Vec<ExcludedProcedure>,
}

/// Decides which of a patient's billed procedures are payable at all.
///
/// Order of rules: malformed codes out first, then anesthetist exclusion,
/// then a deterministic sort (sequence ascending with missing last, gross
/// value descending as tie-break), then duplicate suppression per
/// (admission, code) preferring a non-anesthetist instance.
pub fn filter_eligible(
    policy: &EligibilityPolicy,
    procedures: &[ProcedureBillingEntry],
) -> EligibilityOutcome {
    let mut candidates: Vec<ProcedureBillingEntry> = Vec::with_capacity(procedures.len());
    let mut excluded: Vec<ExcludedProcedure> = Vec::new();

    // 1. role and code screening
    for proc in procedures {
        let code = proc.normalized_code();
        if code.is_empty() {
            excluded.push(ExcludedProcedure {
                entry: proc.clone(),
                reason: ExclusionReason::MalformedCode,
            });
            continue;
        }
        if policy.is_anesthetist(proc.professional_role_code.as_deref())
            && !policy.anesthetist_payable(&code)
        {
            excluded.push(ExcludedProcedure {
                entry: proc.clone(),
                reason: ExclusionReason::AnesthetistExcluded,
            });
            continue;
        }
        candidates.push(proc.clone());
    }

    // 2. deterministic position order
    sort_for_position(&mut candidates);

    // 3. duplicate suppression within one admission; the winner prefers a
    // non-anesthetist instance, otherwise the first in sorted order
    let mut groups: IndexMap<(String, String), Vec<usize>> = IndexMap::new();
    for (idx, proc) in candidates.iter().enumerate() {
        let key = (
            proc.admission_id.clone().unwrap_or_default(),
            proc.normalized_code(),
        );
        groups.entry(key).or_default().push(idx);
    }

    let mut winners: HashSet<usize> = HashSet::new();
    for indices in groups.values() {
        let winner = indices
            .iter()
            .copied()
            .find(|&i| !policy.is_anesthetist(candidates[i].professional_role_code.as_deref()))
            .unwrap_or(indices[0]);
        winners.insert(winner);
    }

    let mut eligible = Vec::with_capacity(winners.len());
    for (idx, proc) in candidates.into_iter().enumerate() {
        if winners.contains(&idx) {
            eligible.push(proc);
        } else {
            excluded.push(ExcludedProcedure {
                entry: proc,
                reason: ExclusionReason::Duplicate,
            });
        }
    }

    EligibilityOutcome { eligible, excluded }
}

/// Sorts by explicit billing sequence ascending (missing sequence last),
/// then by gross value descending. Stable, so equal keys keep input order.
pub fn sort_for_position(procedures: &mut [ProcedureBillingEntry]) {
    procedures.sort_by(|a, b| match (a.sequence, b.sequence) {
        (Some(x), Some(y)) => x
            .cmp(&y)
            .then_with(|| b.gross_value.cmp(&a.gross_value)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.gross_value.cmp(&a.gross_value),
    });
}

/// Explicit occurrence assignment: the 1-based index of each procedure's
/// code within the sorted eligible sequence. Feeds the tiered per-procedure
/// rules, which pay by occurrence order rather than by code alone.
pub fn assign_occurrences(eligible: &[ProcedureBillingEntry]) -> Vec<usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    eligible
        .iter()
        .map(|proc| {
            let count = counts.entry(proc.normalized_code()).or_insert(0);
            *count += 1;
            *count
        })
        .collect()
}
