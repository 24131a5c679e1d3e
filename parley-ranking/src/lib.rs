//! # parley-ranking
//!
//! Merges per-provider suggestion lists into one ranked, deduplicated list.
//! Pipeline: provider weighting → consensus dedup → blended scoring →
//! deterministic sort → truncation, with a rule-based fallback that
//! guarantees a non-empty result.

pub mod aggregator;
pub mod fallback;
pub mod ranking;

pub use aggregator::{Aggregator, ProviderContribution, RankingInput};
pub use fallback::{FallbackIntent, RuleBasedFallback};
pub use ranking::{RankedSuggestion, RankingPipeline};
