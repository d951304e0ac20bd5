use thiserror::Error;

/// Engine-level errors. Business-data gaps (missing rule, missing rate
/// entry, unparseable cell) are never errors: they resolve to zero payments
/// with explanatory labels so an audit can see why nothing was paid.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Calculation was requested before the cold-start rate table load
    /// finished. This is an orchestration bug in the caller, so it is the
    /// one condition surfaced upward instead of absorbed.
    #[error("rate tables are not loaded yet; retry after initialization")]
    RateTablesNotLoaded,

    /// Rule data that cannot be deserialized at all.
    #[error("invalid rule data: {0}")]
    RuleData(#[from] serde_json::Error),
}
