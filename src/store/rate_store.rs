use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use dashmap::DashMap;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;

use crate::error::EngineError;
use crate::models::{normalize_procedure_code, RateTable, RateTableEntry};

/// In-memory rate tables, one per medical-specialty family, loaded once at
/// cold start and replaced wholesale on reload. Calculations read through
/// `snapshot()`, so an in-flight calculation keeps the tables it started
/// with even while a reload swaps them underneath.
#[derive(Debug, Default)]
pub struct RateTableStore {
    tables: DashMap<String, Arc<RateTable>>,
    initialized: AtomicBool,
}

impl RateTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous readiness accessor so callers can gate calculation
    /// during the cold-start load.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }

    /// Inserts or atomically replaces one family's table.
    pub fn replace(&self, family: impl Into<String>, table: RateTable) {
        self.tables.insert(family.into(), Arc::new(table));
    }

    /// Stable view for one calculation. Erroring here is deliberate:
    /// calculating before the load finished is caller misuse, the one
    /// condition the engine surfaces instead of absorbing.
    pub fn snapshot(&self) -> Result<RateTableSnapshot, EngineError> {
        if !self.is_initialized() {
            return Err(EngineError::RateTablesNotLoaded);
        }
        let mut tables: Vec<(String, Arc<RateTable>)> = self
            .tables
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        // family order fixed so lookups stay deterministic
        tables.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(RateTableSnapshot { tables })
    }

    /// Loads every `*.json` table under `dir` concurrently, one file per
    /// specialty family (named after the file stem). A file that cannot be
    /// read or parsed degrades to an empty table: the engine then reports
    /// "no rule for code" instead of failing. Returns the number of tables
    /// loaded and always leaves the store initialized.
    pub async fn load_from_dir(&self, dir: &Path) -> usize {
        let files = list_json_files(dir).await;
        let reads = files.iter().map(|path| async move {
            (path.clone(), tokio::fs::read_to_string(path).await)
        });

        let mut loaded = 0usize;
        for (path, contents) in join_all(reads).await {
            let family = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "default".to_string());
            let table = match contents {
                Ok(text) => parse_rate_table(&text, &family),
                Err(e) => {
                    tracing::warn!("rate table {} unreadable ({}), using empty table", path.display(), e);
                    RateTable::new()
                }
            };
            if !table.is_empty() {
                loaded += 1;
            }
            self.replace(family, table);
        }

        self.mark_initialized();
        tracing::info!("rate table load complete: {} non-empty tables from {}", loaded, dir.display());
        loaded
    }

    /// Idempotent reload: same contract as the cold-start load, swapping
    /// each family's table atomically.
    pub async fn reload_from_dir(&self, dir: &Path) -> usize {
        self.load_from_dir(dir).await
    }
}

async fn list_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    match tokio::fs::read_dir(dir).await {
        Ok(mut entries) => {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                if path.extension().map_or(false, |ext| ext == "json") {
                    files.push(path);
                }
            }
        }
        Err(e) => {
            tracing::warn!("rate table directory {} unreadable: {}", dir.display(), e);
        }
    }
    files.sort();
    files
}

/// Raw shape of one rate file: normalized-or-dotted code to a 5-tier rate
/// object whose cells may be numbers or locale-formatted strings.
#[derive(Debug, Deserialize)]
struct RawRateEntry {
    #[serde(default)]
    hon1: Value,
    #[serde(default)]
    hon2: Value,
    #[serde(default)]
    hon3: Value,
    #[serde(default)]
    hon4: Value,
    #[serde(default)]
    hon5: Value,
}

fn parse_rate_table(text: &str, family: &str) -> RateTable {
    let raw: std::collections::HashMap<String, RawRateEntry> = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("rate table '{}' failed to parse ({}), using empty table", family, e);
            return RateTable::new();
        }
    };

    let mut table = RateTable::with_capacity(raw.len());
    for (code, entry) in raw {
        let normalized = normalize_procedure_code(&code);
        if normalized.is_empty() {
            tracing::warn!("rate table '{}' has entry with malformed code '{}', skipped", family, code);
            continue;
        }
        table.insert(
            normalized,
            RateTableEntry {
                hon1: lenient_decimal(&entry.hon1, family),
                hon2: lenient_decimal(&entry.hon2, family),
                hon3: lenient_decimal(&entry.hon3, family),
                hon4: lenient_decimal(&entry.hon4, family),
                hon5: lenient_decimal(&entry.hon5, family),
            },
        );
    }
    table
}

/// Imported rate cells arrive as JSON numbers or as strings in Brazilian
/// currency formatting ("1.234,56"). Anything unparseable becomes zero:
/// bad source data must never abort a calculation run.
fn lenient_decimal(value: &Value, family: &str) -> BigDecimal {
    let parsed = match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => parse_money_string(s),
        Value::Null => Some(BigDecimal::zero()),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        tracing::warn!("rate table '{}' has unparseable rate cell {:?}, treated as 0", family, value);
        BigDecimal::zero()
    })
}

fn parse_money_string(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return Some(BigDecimal::zero());
    }
    // "1.234,56" -> "1234.56"; plain "250.00" passes through
    let canonical = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    BigDecimal::from_str(&canonical).ok()
}

/// Family-sorted, reference-counted view of the loaded tables; cheap to
/// build per calculation and immune to concurrent reloads.
#[derive(Debug, Clone, Default)]
pub struct RateTableSnapshot {
    tables: Vec<(String, Arc<RateTable>)>,
}

impl RateTableSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-table convenience for callers and tests.
    pub fn from_table(table: RateTable) -> Self {
        Self {
            tables: vec![("default".to_string(), Arc::new(table))],
        }
    }

    /// First entry for the code across family-sorted tables.
    pub fn lookup(&self, normalized_code: &str) -> Option<&RateTableEntry> {
        self.tables
            .iter()
            .find_map(|(_, table)| table.get(normalized_code))
    }
}
