//! RankingPipeline: weight → merge → score → sort → truncate.

pub mod consensus;
pub mod scorer;
pub mod weighting;

use std::cmp::Ordering;

use parley_core::config::RankingConfig;
use parley_core::models::{AlignmentScore, ContextSnapshot, Suggestion, UserProfile};

use crate::aggregator::ProviderContribution;

/// A suggestion with its final score and the providers that produced it.
#[derive(Debug, Clone)]
pub struct RankedSuggestion {
    pub suggestion: Suggestion,
    /// Blended score used for ordering. May exceed 1.0.
    pub score: f64,
    /// Distinct providers that produced this text, in priority order.
    pub providers: Vec<String>,
    /// Best (lowest) priority rank among `providers`.
    pub rank: usize,
}

/// Full ranking pipeline over provider contributions.
pub struct RankingPipeline {
    config: RankingConfig,
    max_suggestions: usize,
}

impl RankingPipeline {
    pub fn new(config: RankingConfig, max_suggestions: usize) -> Self {
        Self {
            config,
            max_suggestions: max_suggestions.max(1),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Rank every contributed suggestion. May return an empty list.
    pub fn rank(
        &self,
        contributions: &[ProviderContribution],
        context: &ContextSnapshot,
        profile: &UserProfile,
        alignment: &AlignmentScore,
        default_weight: f64,
    ) -> Vec<RankedSuggestion> {
        // Stage 1: Scale confidence by learned provider reliability.
        let weighted = weighting::apply_weights(contributions, profile, default_weight);

        // Stage 2: Merge duplicates across providers with a consensus boost.
        let merged = consensus::merge(weighted, self.config.consensus_boost);

        // Stage 3: Blended score.
        let mut ranked = scorer::score(merged, context, alignment, &self.config);

        // Stage 4: Deterministic order.
        ranked.sort_by(compare);

        // Stage 5: Truncate.
        ranked.truncate(self.max_suggestions);
        ranked
    }
}

/// Score descending, then provider priority, then text.
pub fn compare(a: &RankedSuggestion, b: &RankedSuggestion) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.rank.cmp(&b.rank))
        .then_with(|| a.suggestion.text.cmp(&b.suggestion.text))
}
