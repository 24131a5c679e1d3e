//! Aggregator: runs the ranking pipeline and assembles the final
//! [`AggregatedResult`], substituting the rule-based fallback when nothing
//! survived.

use std::time::Duration;

use chrono::Utc;
use parley_core::config::RankingConfig;
use parley_core::constants::FALLBACK_PROVIDER_ID;
use parley_core::errors::AggregationError;
use parley_core::models::{
    AggregatedResult, AlignmentScore, ContextSnapshot, Suggestion, UserProfile,
};
use parley_observability::ranking_span;
use parley_observability::tracing_setup::events;
use tracing::debug;

use crate::fallback::RuleBasedFallback;
use crate::ranking::{RankedSuggestion, RankingPipeline};

/// Suggestions returned by one provider, with its priority rank.
#[derive(Debug, Clone)]
pub struct ProviderContribution {
    pub provider_id: String,
    pub rank: usize,
    pub suggestions: Vec<Suggestion>,
}

impl ProviderContribution {
    pub fn new(provider_id: impl Into<String>, rank: usize, suggestions: Vec<Suggestion>) -> Self {
        Self {
            provider_id: provider_id.into(),
            rank,
            suggestions,
        }
    }
}

/// Everything the aggregator needs for one request.
#[derive(Debug, Clone, Copy)]
pub struct RankingInput<'a> {
    pub contributions: &'a [ProviderContribution],
    pub context: &'a ContextSnapshot,
    pub profile: &'a UserProfile,
    pub alignment: &'a AlignmentScore,
    pub input: &'a str,
    pub target_language: &'a str,
    pub providers_failed: usize,
    pub providers_skipped: usize,
}

pub struct Aggregator {
    pipeline: RankingPipeline,
    fallback: RuleBasedFallback,
    default_weight: f64,
}

impl Aggregator {
    pub fn new(config: &RankingConfig, max_suggestions: usize) -> Self {
        Self {
            fallback: RuleBasedFallback::new(config.fallback_confidence),
            pipeline: RankingPipeline::new(config.clone(), max_suggestions),
            default_weight: parley_core::config::defaults::DEFAULT_PROVIDER_WEIGHT,
        }
    }

    /// Weight applied to providers the user has no history with.
    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn max_suggestions(&self) -> usize {
        self.pipeline.max_suggestions()
    }

    /// Rank contributions. Fails with [`AggregationError::Empty`] when
    /// nothing survived.
    pub fn rank(
        &self,
        input: &RankingInput<'_>,
    ) -> Result<Vec<RankedSuggestion>, AggregationError> {
        let candidates: usize = input.contributions.iter().map(|c| c.suggestions.len()).sum();
        let span = ranking_span!(candidates);
        let _guard = span.enter();

        let ranked = self.pipeline.rank(
            input.contributions,
            input.context,
            input.profile,
            input.alignment,
            self.default_weight,
        );
        if ranked.is_empty() {
            return Err(AggregationError::Empty {
                providers_failed: input.providers_failed,
                providers_skipped: input.providers_skipped,
            });
        }
        debug!(kept = ranked.len(), "ranking complete");
        Ok(ranked)
    }

    /// Produce the final result. Never empty.
    pub fn aggregate(
        &self,
        input: &RankingInput<'_>,
        cache_key: &str,
        ttl: Duration,
    ) -> AggregatedResult {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());

        match self.rank(input) {
            Ok(ranked) => {
                let suggestions: Vec<Suggestion> =
                    ranked.into_iter().map(|r| r.suggestion).collect();
                let overall = suggestions.iter().map(|s| s.confidence.value()).sum::<f64>()
                    / suggestions.len() as f64;
                AggregatedResult {
                    suggestions,
                    overall_confidence: overall,
                    low_confidence: false,
                    cache_key: cache_key.to_string(),
                    expires_at,
                }
            }
            Err(AggregationError::Empty { providers_failed, .. }) => {
                events::fallback_activated(&input.context.conversation_id, providers_failed);
                let suggestion = self.fallback.suggest(input.input, input.target_language);
                debug!(provider = FALLBACK_PROVIDER_ID, text = %suggestion.text, "fallback reply");
                AggregatedResult {
                    suggestions: vec![suggestion],
                    overall_confidence: 0.0,
                    low_confidence: true,
                    cache_key: cache_key.to_string(),
                    expires_at,
                }
            }
        }
    }
}
