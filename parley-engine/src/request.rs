//! The uncached request path: profile → alignment → prompt → fan-out →
//! aggregation, plus metrics and degradation bookkeeping.

use parley_cache::CacheKey;
use parley_core::constants::FALLBACK_PROVIDER_ID;
use parley_core::models::{
    AggregatedResult, ContextSnapshot, DegradationEvent, SuggestionRequest,
};
use parley_gateway::{build_prompt, FanOutReport};
use parley_ranking::{ProviderContribution, RankingInput};
use tokio::time::Instant;

use crate::engine::SuggestionEngine;

/// Component name used in degradation events for a provider.
pub(crate) fn provider_component(provider_id: &str) -> String {
    format!("provider:{provider_id}")
}

const RANKING_COMPONENT: &str = "ranking";

impl SuggestionEngine {
    pub(crate) async fn compute(
        &self,
        request: &SuggestionRequest,
        snapshot: &ContextSnapshot,
        key: &CacheKey,
    ) -> AggregatedResult {
        let deadline = Instant::now() + self.config.global_deadline();

        let profile = self.profiles.get(&request.user_id).await;
        let alignment = self.alignment.align(&profile, snapshot);
        let prompt = build_prompt(
            &request.input,
            snapshot,
            request.source_language.as_deref(),
            &request.target_language,
        );

        let report = self.gateway.fan_out(&prompt, snapshot, deadline).await;
        self.record_fan_out(&report);

        let contributions = contributions(&report);
        let input = RankingInput {
            contributions: &contributions,
            context: snapshot,
            profile: &profile,
            alignment: &alignment,
            input: &request.input,
            target_language: &request.target_language,
            providers_failed: report.failed().count(),
            providers_skipped: report.skipped.len(),
        };
        let result = self.aggregator.aggregate(&input, key.as_str(), self.cache.ttl());

        if result.low_confidence {
            self.metrics.record_fallback();
            self.tracker().record(DegradationEvent::now(
                RANKING_COMPONENT,
                "no provider produced a suggestion",
                FALLBACK_PROVIDER_ID,
            ));
        } else {
            self.tracker().mark_recovered(RANKING_COMPONENT);
        }
        result
    }

    fn record_fan_out(&self, report: &FanOutReport) {
        if report.deadline_hit {
            self.metrics.record_deadline_hit();
        }
        self.metrics.record_skipped(report.skipped.len());

        let mut tracker = self.tracker();
        for outcome in &report.outcomes {
            self.metrics.record_provider_call();
            let component = provider_component(&outcome.provider_id);
            match &outcome.error {
                Some(error) => {
                    self.metrics.record_provider_error(error.kind());
                    tracker.record(DegradationEvent::now(
                        component,
                        error.kind().as_str(),
                        "excluded from ranking",
                    ));
                }
                None => {
                    tracker.mark_recovered(&component);
                }
            }
        }
    }
}

/// Successful outcomes as ranking input, in priority order.
fn contributions(report: &FanOutReport) -> Vec<ProviderContribution> {
    report
        .successful()
        .filter(|o| !o.suggestions.is_empty())
        .map(|o| ProviderContribution::new(o.provider_id.clone(), o.rank, o.suggestions.clone()))
        .collect()
}
