/// Aggregation errors. `Empty` is always intercepted by the rule-based fallback.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AggregationError {
    #[error("no provider produced a suggestion ({providers_failed} failed, {providers_skipped} skipped)")]
    Empty {
        providers_failed: usize,
        providers_skipped: usize,
    },
}
