use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use indexmap::IndexSet;

use crate::models::{
    CalculatedPaymentResult, CalculatedProcedure, ComboRule, DoctorPaymentRule,
    MainProcedureBasis,
};
use crate::store::RateTableSnapshot;

use super::eligibility::{assign_occurrences, EligibilityOutcome, ExcludedProcedure};

const FIXED_COVERED_LABEL: &str = "Covered by fixed payment";
const SUPERSEDED_LABEL: &str = "Superseded by main procedure";
const NO_RULE_LABEL: &str = "No rule for code";

/// Resolves one patient's eligible procedure set against a physician's
/// payment rule and the rate-table fallback, in strict precedence:
///
/// 1. fixed salary (collapses the whole calculation)
/// 2. percentage of gross revenue
/// 3. multi-procedure combination overrides
/// 4. only-main-procedure supersession
/// 5. per-procedure tiered rules
/// 6. rate-table occurrence-position fallback
///
/// Pure function of its inputs: no I/O, inputs never mutated, and business
/// data gaps never raise. Whatever happens, every procedure comes back with
/// a non-empty `payment_rule` explaining its amount.
pub fn resolve(
    rule: Option<&DoctorPaymentRule>,
    rates: &RateTableSnapshot,
    outcome: &EligibilityOutcome,
) -> CalculatedPaymentResult {
    let eligible = &outcome.eligible;

    // 1. fixed salary: nothing else matters, not even an empty list
    if let Some(fixed) = rule.and_then(|r| r.fixed_payment_rule.as_ref()) {
        let mut procedures: Vec<CalculatedProcedure> = eligible
            .iter()
            .map(|p| CalculatedProcedure {
                entry: p.clone(),
                calculated_payment: BigDecimal::zero(),
                payment_rule: FIXED_COVERED_LABEL.to_string(),
                is_special_rule: false,
            })
            .collect();
        append_excluded(&mut procedures, &outcome.excluded);
        return CalculatedPaymentResult {
            procedures,
            total_payment: fixed.amount.clone(),
            applied_rule: fixed.description.clone(),
            calculated_at: Utc::now(),
        };
    }

    // 2. percentage of the eligible gross revenue
    if let Some(pct) = rule.and_then(|r| r.percentage_rule.as_ref()) {
        let mut total = BigDecimal::zero();
        let mut procedures: Vec<CalculatedProcedure> = Vec::with_capacity(eligible.len());
        for p in eligible {
            let payment = &p.gross_value * &pct.percentage / BigDecimal::from(100);
            total += &payment;
            procedures.push(CalculatedProcedure {
                entry: p.clone(),
                calculated_payment: payment,
                payment_rule: format!("{} ({}% of gross value)", pct.description, pct.percentage),
                is_special_rule: false,
            });
        }
        append_excluded(&mut procedures, &outcome.excluded);
        return CalculatedPaymentResult {
            procedures,
            total_payment: total,
            applied_rule: pct.description.clone(),
            calculated_at: Utc::now(),
        };
    }

    let occurrences = assign_occurrences(eligible);
    let count = eligible.len();
    // (value, label, is_special_rule) per eligible procedure
    let mut payments: Vec<Option<(BigDecimal, String, bool)>> = vec![None; count];
    let mut consumed = vec![false; count];
    let mut combo_labels: Vec<String> = Vec::new();

    // 3. combination overrides, applied greedily until none matches the
    // remaining code set; the first consumed procedure carries the total
    if let Some(rule) = rule {
        loop {
            let available: IndexSet<String> = eligible
                .iter()
                .enumerate()
                .filter(|(i, _)| !consumed[*i])
                .map(|(_, p)| p.normalized_code())
                .collect();
            if available.is_empty() {
                break;
            }
            let Some(combo) = select_combo(rule.combo_rules(), &available) else {
                break;
            };
            let mut carrier_assigned = false;
            for (i, p) in eligible.iter().enumerate() {
                if consumed[i] {
                    continue;
                }
                let code = p.normalized_code();
                if combo.codes.iter().any(|c| c == &code) {
                    consumed[i] = true;
                    let (value, label) = if carrier_assigned {
                        (
                            BigDecimal::zero(),
                            format!("Part of combination \"{}\"", combo.description),
                        )
                    } else {
                        carrier_assigned = true;
                        (combo.total_value.clone(), combo.description.clone())
                    };
                    payments[i] = Some((value, label, true));
                }
            }
            combo_labels.push(combo.description.clone());
        }
    }

    // 5/6. per-procedure tiered rules, then rate-table fallback; the table
    // position is global across every procedure that falls through to it
    let mut rate_position = 0usize;
    let mut used_procedure_rule = false;
    let mut used_rate_table = false;
    for (i, p) in eligible.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let code = p.normalized_code();
        let (value, label) = match rule.and_then(|r| r.rule_for_code(&code)) {
            Some(proc_rule) => {
                used_procedure_rule = true;
                let occurrence = occurrences[i];
                let value = proc_rule.value_for_occurrence(occurrence).clone();
                let label = if occurrence == 1 {
                    proc_rule.description.clone()
                } else {
                    format!("{} (occurrence {})", proc_rule.description, occurrence)
                };
                (value, label)
            }
            None => {
                let position = rate_position;
                rate_position += 1;
                match rates.lookup(&code) {
                    Some(entry) => {
                        used_rate_table = true;
                        let value = entry.value_for_position(position).clone();
                        (value, format!("Rate table tier {}", position.min(4) + 1))
                    }
                    None => (BigDecimal::zero(), NO_RULE_LABEL.to_string()),
                }
            }
        };
        payments[i] = Some((value, label, false));
    }

    // 4. only-main-procedure: keep the main procedure's value, zero the rest
    let mut only_main_applied: Option<String> = None;
    if let Some(omp) = rule
        .and_then(|r| r.only_main_procedure_rule.as_ref())
        .filter(|r| r.enabled)
    {
        let remaining: Vec<usize> = (0..count).filter(|&i| !consumed[i]).collect();
        if remaining.len() > 1 {
            let mut main = remaining[0];
            for &i in &remaining[1..] {
                let better = match omp.basis {
                    MainProcedureBasis::HighestGrossValue => {
                        eligible[i].gross_value > eligible[main].gross_value
                    }
                    MainProcedureBasis::HighestCalculatedPayment => {
                        payment_value(&payments, i) > payment_value(&payments, main)
                    }
                };
                if better {
                    main = i;
                }
            }
            for &i in &remaining {
                if i != main {
                    payments[i] = Some((BigDecimal::zero(), SUPERSEDED_LABEL.to_string(), false));
                }
            }
            only_main_applied = Some(omp.description.clone());
        }
    }

    // topmost branch that actually fired names the aggregate applied rule
    let applied_rule = if !combo_labels.is_empty() {
        combo_labels.join(" + ")
    } else if let Some(desc) = only_main_applied {
        desc
    } else if used_procedure_rule {
        "Per-procedure rules".to_string()
    } else if used_rate_table {
        "Rate table".to_string()
    } else {
        "No applicable rule".to_string()
    };

    let mut total = BigDecimal::zero();
    let mut procedures: Vec<CalculatedProcedure> =
        Vec::with_capacity(count + outcome.excluded.len());
    for (i, p) in eligible.iter().enumerate() {
        let (value, label, special) = payments[i]
            .take()
            .unwrap_or_else(|| (BigDecimal::zero(), NO_RULE_LABEL.to_string(), false));
        total += &value;
        procedures.push(CalculatedProcedure {
            entry: p.clone(),
            calculated_payment: value,
            payment_rule: label,
            is_special_rule: special,
        });
    }
    append_excluded(&mut procedures, &outcome.excluded);

    CalculatedPaymentResult {
        procedures,
        total_payment: total,
        applied_rule,
        calculated_at: Utc::now(),
    }
}

fn payment_value(payments: &[Option<(BigDecimal, String, bool)>], index: usize) -> BigDecimal {
    payments[index]
        .as_ref()
        .map(|(value, _, _)| value.clone())
        .unwrap_or_else(BigDecimal::zero)
}

/// Picks the matching combo with the largest code set; equal-specificity
/// ties keep the first declared and are flagged as a data ambiguity.
fn select_combo<'a>(
    combos: impl Iterator<Item = &'a ComboRule>,
    available: &IndexSet<String>,
) -> Option<&'a ComboRule> {
    let mut best: Option<&ComboRule> = None;
    for combo in combos {
        if combo.codes.is_empty() || !combo.codes.iter().all(|c| available.contains(c.as_str())) {
            continue;
        }
        match best {
            None => best = Some(combo),
            Some(current) if combo.codes.len() > current.codes.len() => best = Some(combo),
            Some(current) if combo.codes.len() == current.codes.len() => {
                tracing::warn!(
                    "combination rules \"{}\" and \"{}\" both match with equal specificity; keeping the first declared",
                    current.description,
                    combo.description
                );
            }
            _ => {}
        }
    }
    best
}

fn append_excluded(procedures: &mut Vec<CalculatedProcedure>, excluded: &[ExcludedProcedure]) {
    for ex in excluded {
        procedures.push(CalculatedProcedure {
            entry: ex.entry.clone(),
            calculated_payment: BigDecimal::zero(),
            payment_rule: ex.reason.label().to_string(),
            is_special_rule: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FixedPaymentRule, OnlyMainProcedureRule, PercentageRule, ProcedureBillingEntry,
        ProcedureRateRule, RateTableEntry,
    };
    use crate::service::eligibility::{filter_eligible, EligibilityPolicy};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn entry(code: &str, gross: &str, sequence: u32, admission: &str) -> ProcedureBillingEntry {
        ProcedureBillingEntry {
            procedure_code: code.into(),
            description: None,
            gross_value: dec(gross),
            professional_role_code: None,
            sequence: Some(sequence),
            admission_id: Some(admission.into()),
        }
    }

    fn outcome_of(procedures: Vec<ProcedureBillingEntry>) -> EligibilityOutcome {
        filter_eligible(&EligibilityPolicy::default(), &procedures)
    }

    fn proc_rule(code: &str, standard: &str, secondary: Option<&str>) -> ProcedureRateRule {
        ProcedureRateRule {
            procedure_code: code.into(),
            standard_value: dec(standard),
            secondary_value: secondary.map(dec),
            tertiary_value: None,
            quaternary_value: None,
            description: format!("Agreed rate for {}", code),
        }
    }

    fn rate_entry(values: [&str; 5]) -> RateTableEntry {
        RateTableEntry {
            hon1: dec(values[0]),
            hon2: dec(values[1]),
            hon3: dec(values[2]),
            hon4: dec(values[3]),
            hon5: dec(values[4]),
        }
    }

    fn snapshot_with(code: &str, values: [&str; 5]) -> RateTableSnapshot {
        let mut table = crate::models::RateTable::new();
        table.insert(code.into(), rate_entry(values));
        RateTableSnapshot::from_table(table)
    }

    #[test]
    fn fixed_rule_collapses_the_whole_calculation() {
        let rule = DoctorPaymentRule {
            fixed_payment_rule: Some(FixedPaymentRule {
                amount: dec("35000"),
                description: "Monthly fixed salary".into(),
            }),
            rules: vec![proc_rule("0000000011", "700", None)],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
            entry("0000000033", "300", 3, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("35000"));
        assert_eq!(result.applied_rule, "Monthly fixed salary");
        assert_eq!(result.procedures.len(), 3);
        for p in &result.procedures {
            assert_eq!(p.calculated_payment, BigDecimal::zero());
            assert_eq!(p.payment_rule, "Covered by fixed payment");
        }
    }

    #[test]
    fn fixed_rule_holds_for_an_empty_procedure_list() {
        let rule = DoctorPaymentRule {
            fixed_payment_rule: Some(FixedPaymentRule {
                amount: dec("35000"),
                description: "Monthly fixed salary".into(),
            }),
            ..Default::default()
        };
        let result = resolve(
            Some(&rule),
            &RateTableSnapshot::empty(),
            &EligibilityOutcome::default(),
        );
        assert_eq!(result.total_payment, dec("35000"));
        assert!(result.procedures.is_empty());
    }

    #[test]
    fn percentage_rule_pays_share_of_eligible_gross() {
        let rule = DoctorPaymentRule {
            percentage_rule: Some(PercentageRule {
                percentage: dec("30"),
                description: "30% of production".into(),
            }),
            rules: vec![proc_rule("0000000011", "700", None)],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
            entry("0000000033", "300", 3, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("495")); // 30% of 1650
        assert_eq!(result.applied_rule, "30% of production");
        assert_eq!(result.procedures[0].calculated_payment, dec("270"));
    }

    #[test]
    fn tiered_rule_pays_by_occurrence_order() {
        let rule = DoctorPaymentRule {
            rules: vec![proc_rule("0000000011", "700", Some("300"))],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000011", "900", 2, "a2"),
            entry("0000000011", "900", 3, "a3"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        let payouts: Vec<_> = result
            .procedures
            .iter()
            .map(|p| p.calculated_payment.clone())
            .collect();
        assert_eq!(payouts, vec![dec("700"), dec("300"), dec("300")]);
        assert_eq!(result.total_payment, dec("1300"));
        assert_eq!(result.applied_rule, "Per-procedure rules");
    }

    #[test]
    fn combo_pays_its_total_instead_of_individual_rates() {
        let rule = DoctorPaymentRule {
            rules: vec![
                proc_rule("0000000011", "700", None),
                proc_rule("0000000022", "650", None),
            ],
            multiple_rules: vec![ComboRule {
                codes: vec!["0000000011".into(), "0000000022".into()],
                total_value: dec("1100"),
                description: "A+B package".into(),
            }],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("1100"));
        assert_eq!(result.applied_rule, "A+B package");
        assert_eq!(result.procedures[0].calculated_payment, dec("1100"));
        assert!(result.procedures[0].is_special_rule);
        assert_eq!(result.procedures[1].calculated_payment, BigDecimal::zero());
        assert!(result.procedures[1].is_special_rule);
    }

    #[test]
    fn combo_never_fires_on_a_partial_match() {
        let rule = DoctorPaymentRule {
            rules: vec![proc_rule("0000000011", "700", None)],
            multiple_rules: vec![ComboRule {
                codes: vec!["0000000011".into(), "0000000022".into()],
                total_value: dec("1100"),
                description: "A+B package".into(),
            }],
            ..Default::default()
        };
        let outcome = outcome_of(vec![entry("0000000011", "900", 1, "a1")]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("700"));
        assert_eq!(result.applied_rule, "Per-procedure rules");
    }

    #[test]
    fn larger_combo_wins_over_a_smaller_one() {
        let rule = DoctorPaymentRule {
            multiple_rules: vec![
                ComboRule {
                    codes: vec!["0000000011".into(), "0000000022".into()],
                    total_value: dec("1100"),
                    description: "A+B package".into(),
                },
                ComboRule {
                    codes: vec![
                        "0000000011".into(),
                        "0000000022".into(),
                        "0000000033".into(),
                    ],
                    total_value: dec("1500"),
                    description: "A+B+C package".into(),
                },
            ],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
            entry("0000000033", "300", 3, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("1500"));
        assert_eq!(result.applied_rule, "A+B+C package");
    }

    #[test]
    fn equal_specificity_tie_keeps_the_first_declared_combo() {
        // data-entry ambiguity rather than a business rule; pinned here so a
        // behavior change is noticed
        let rule = DoctorPaymentRule {
            multiple_rules: vec![
                ComboRule {
                    codes: vec!["0000000011".into(), "0000000022".into()],
                    total_value: dec("1100"),
                    description: "first declared".into(),
                },
                ComboRule {
                    codes: vec!["0000000011".into(), "0000000022".into()],
                    total_value: dec("2000"),
                    description: "second declared".into(),
                },
            ],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("1100"));
        assert_eq!(result.applied_rule, "first declared");
    }

    #[test]
    fn legacy_single_combo_form_still_fires() {
        let rule = DoctorPaymentRule {
            multiple_rule: Some(ComboRule {
                codes: vec!["0000000011".into(), "0000000022".into()],
                total_value: dec("1100"),
                description: "legacy package".into(),
            }),
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("1100"));
        assert_eq!(result.applied_rule, "legacy package");
    }

    #[test]
    fn only_main_procedure_zeroes_everything_else() {
        let rule = DoctorPaymentRule {
            only_main_procedure_rule: Some(OnlyMainProcedureRule {
                enabled: true,
                basis: MainProcedureBasis::HighestGrossValue,
                description: "Pays only the main procedure".into(),
            }),
            rules: vec![
                proc_rule("0000000011", "700", None),
                proc_rule("0000000022", "650", None),
            ],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "1200", 2, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("650"));
        assert_eq!(result.applied_rule, "Pays only the main procedure");
        let superseded = result
            .procedures
            .iter()
            .find(|p| p.entry.procedure_code == "0000000011")
            .unwrap();
        assert_eq!(superseded.calculated_payment, BigDecimal::zero());
        assert_eq!(superseded.payment_rule, "Superseded by main procedure");
    }

    #[test]
    fn rate_table_fallback_pays_by_global_position() {
        let rule = DoctorPaymentRule::default();
        let rates = snapshot_with("0000000011", ["250", "187.5", "150", "125", "100"]);
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000011", "900", 2, "a2"),
            entry("0000000011", "900", 3, "a3"),
        ]);
        let result = resolve(Some(&rule), &rates, &outcome);
        let payouts: Vec<_> = result
            .procedures
            .iter()
            .map(|p| p.calculated_payment.clone())
            .collect();
        assert_eq!(payouts, vec![dec("250"), dec("187.5"), dec("150")]);
        assert_eq!(result.total_payment, dec("587.5"));
        assert_eq!(result.applied_rule, "Rate table");
    }

    #[test]
    fn rate_table_saturates_at_hon5() {
        let rates = snapshot_with("0000000011", ["250", "187.5", "150", "125", "100"]);
        let procedures: Vec<_> = (1..=6)
            .map(|i| entry("0000000011", "900", i, &format!("a{}", i)))
            .collect();
        let outcome = outcome_of(procedures);
        let result = resolve(None, &rates, &outcome);
        assert_eq!(
            result.procedures[5].calculated_payment,
            dec("100") // 6th position stays at hon5
        );
        assert_eq!(result.procedures[5].payment_rule, "Rate table tier 5");
    }

    #[test]
    fn code_without_any_rule_pays_zero_with_label() {
        let outcome = outcome_of(vec![entry("0000000099", "900", 1, "a1")]);
        let result = resolve(None, &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, BigDecimal::zero());
        assert_eq!(result.procedures[0].payment_rule, "No rule for code");
        assert_eq!(result.applied_rule, "No applicable rule");
    }

    #[test]
    fn anesthetist_exclusion_beats_a_per_procedure_rule() {
        let rule = DoctorPaymentRule {
            rules: vec![proc_rule("0409060143", "700", None)],
            ..Default::default()
        };
        let mut proc = entry("04.09.06.014-3", "900", 1, "a1");
        proc.professional_role_code = Some("225151".into());
        let outcome = outcome_of(vec![proc]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, BigDecimal::zero());
        assert_eq!(
            result.procedures[0].payment_rule,
            "Anesthetist procedure (not paid)"
        );
    }

    #[test]
    fn duplicate_suppression_leaves_one_paid_instance() {
        let rule = DoctorPaymentRule {
            rules: vec![proc_rule("0000000011", "700", None)],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000011", "900", 2, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("700"));
        let paid: Vec<_> = result
            .procedures
            .iter()
            .filter(|p| p.calculated_payment > BigDecimal::zero())
            .collect();
        assert_eq!(paid.len(), 1);
        let duplicated = result
            .procedures
            .iter()
            .find(|p| p.payment_rule == "Duplicated (not paid)")
            .unwrap();
        assert_eq!(duplicated.calculated_payment, BigDecimal::zero());
    }

    #[test]
    fn combo_leftovers_still_resolve_through_remaining_rules() {
        let rule = DoctorPaymentRule {
            rules: vec![proc_rule("0000000033", "400", None)],
            multiple_rules: vec![ComboRule {
                codes: vec!["0000000011".into(), "0000000022".into()],
                total_value: dec("1100"),
                description: "A+B package".into(),
            }],
            ..Default::default()
        };
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
            entry("0000000033", "300", 3, "a1"),
        ]);
        let result = resolve(Some(&rule), &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.total_payment, dec("1500"));
        assert_eq!(result.applied_rule, "A+B package");
    }

    #[test]
    fn calculation_is_deterministic() {
        let rule = DoctorPaymentRule {
            rules: vec![proc_rule("0000000011", "700", Some("300"))],
            ..Default::default()
        };
        let rates = snapshot_with("0000000022", ["250", "187.5", "150", "125", "100"]);
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000022", "450", 2, "a1"),
            entry("0000000011", "900", 3, "a2"),
        ]);
        let first = resolve(Some(&rule), &rates, &outcome);
        let second = resolve(Some(&rule), &rates, &outcome);
        assert_eq!(first.total_payment, second.total_payment);
        assert_eq!(first.procedures, second.procedures);
        assert_eq!(first.applied_rule, second.applied_rule);
    }

    #[test]
    fn every_procedure_carries_a_non_empty_label() {
        let mut anesthetist = entry("04.09.06.014-3", "900", 3, "a1");
        anesthetist.professional_role_code = Some("225151".into());
        let outcome = outcome_of(vec![
            entry("0000000011", "900", 1, "a1"),
            entry("0000000011", "900", 2, "a1"),
            anesthetist,
            entry("", "100", 4, "a1"),
        ]);
        let result = resolve(None, &RateTableSnapshot::empty(), &outcome);
        assert_eq!(result.procedures.len(), 4);
        for p in &result.procedures {
            assert!(!p.payment_rule.is_empty());
        }
    }
}
