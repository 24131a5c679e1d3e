//! SuggestionEngine: the request entry point.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use parley_alignment::AlignmentAnalyzer;
use parley_cache::{CacheHitTier, CacheKey, ResultCache};
use parley_context::{ContextWindowManager, GenerationTracker};
use parley_core::models::{
    AggregatedResult, ContextSnapshot, Feedback, PersonalityType, SuggestionRequest, UserProfile,
};
use parley_core::ParleyConfig;
use parley_gateway::ProviderGateway;
use parley_learning::{FeedbackOutcome, ProfileStore};
use parley_observability::degradation::TrackedDegradation;
use parley_observability::tracing_setup::events;
use parley_observability::{
    evaluate_alerts, suggest_span, DegradationAlert, DegradationTracker, EngineMetrics,
    MetricsSnapshot,
};
use parley_ranking::Aggregator;
use tracing::{debug, Instrument};

use crate::builder::SuggestionEngineBuilder;

/// Result of [`SuggestionEngine::suggest`].
#[derive(Debug, Clone)]
pub enum SuggestionOutcome {
    /// Ranked suggestions for the newest request of the conversation.
    Ready(Arc<AggregatedResult>),
    /// A newer request for the same conversation started before this one
    /// finished; its result was discarded.
    Superseded { generation: u64, latest: u64 },
}

impl SuggestionOutcome {
    pub fn result(&self) -> Option<&AggregatedResult> {
        match self {
            Self::Ready(result) => Some(result),
            Self::Superseded { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<Arc<AggregatedResult>> {
        match self {
            Self::Ready(result) => Some(result),
            Self::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

/// Context-aware multi-provider suggestion engine.
pub struct SuggestionEngine {
    pub(crate) config: ParleyConfig,
    pub(crate) contexts: Arc<ContextWindowManager>,
    pub(crate) generations: Arc<GenerationTracker>,
    pub(crate) gateway: ProviderGateway,
    pub(crate) profiles: ProfileStore,
    pub(crate) alignment: AlignmentAnalyzer,
    pub(crate) aggregator: Aggregator,
    pub(crate) cache: Arc<ResultCache>,
    pub(crate) metrics: EngineMetrics,
    pub(crate) degradations: Mutex<DegradationTracker>,
}

impl SuggestionEngine {
    pub fn builder(config: ParleyConfig) -> SuggestionEngineBuilder {
        SuggestionEngineBuilder::new(config)
    }

    pub fn config(&self) -> &ParleyConfig {
        &self.config
    }

    /// Produce ranked suggestions for `request`.
    ///
    /// The input is appended to the conversation before providers are
    /// consulted. Never fails: provider and cache failures degrade to fewer
    /// suggestions or the rule-based fallback.
    pub async fn suggest(&self, request: SuggestionRequest) -> SuggestionOutcome {
        let started = Instant::now();
        let generation = self.generations.begin(&request.conversation_id);
        let span = suggest_span!(request.user_id, request.conversation_id, generation);

        async {
            let (snapshot, evicted) = self
                .contexts
                .append_tracked(&request.conversation_id, request.to_message());
            if let Some(evicted) = evicted {
                self.generations.forget(&evicted);
            }
            let key = CacheKey::new(
                &request.user_id,
                &request.conversation_id,
                &request.input,
                &request.target_language,
            );

            let lookup = self
                .cache
                .get_or_compute(&key, || self.compute(&request, &snapshot, &key))
                .await;
            match lookup.tier {
                CacheHitTier::L1 | CacheHitTier::L2 => self.metrics.record_cache_hit(),
                CacheHitTier::Computed => self.metrics.record_cache_miss(),
            }
            if lookup.bypassed {
                self.metrics.record_cache_bypass();
            }
            self.metrics.record_request(started.elapsed());

            let latest = self.generations.current(&request.conversation_id);
            if !self
                .generations
                .is_current(&request.conversation_id, generation)
            {
                events::result_superseded(&request.conversation_id, generation, latest);
                self.metrics.record_superseded();
                return SuggestionOutcome::Superseded { generation, latest };
            }

            debug!(
                suggestions = lookup.result.suggestions.len(),
                tier = ?lookup.tier,
                low_confidence = lookup.result.low_confidence,
                "suggestions ready"
            );
            SuggestionOutcome::Ready(lookup.result)
        }
        .instrument(span)
        .await
    }

    /// Fold an accept/reject signal into the user's profile.
    pub async fn record_feedback(&self, feedback: Feedback) -> FeedbackOutcome {
        self.metrics.record_feedback();
        self.profiles.apply_feedback(&feedback).await
    }

    pub async fn profile(&self, user_id: &str) -> UserProfile {
        self.profiles.get(user_id).await
    }

    pub async fn upsert_profile(&self, profile: UserProfile) {
        self.profiles.upsert(profile).await;
    }

    pub async fn set_personality(&self, user_id: &str, personality: PersonalityType) {
        self.profiles.set_personality(user_id, personality).await;
    }

    pub fn context_snapshot(&self, conversation_id: &str) -> Option<ContextSnapshot> {
        self.contexts.snapshot(conversation_id)
    }

    /// Drop a conversation's window and generation counter.
    pub fn end_conversation(&self, conversation_id: &str) -> bool {
        self.generations.forget(conversation_id);
        self.contexts.remove(conversation_id).is_some()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.tracker().snapshot()
    }

    pub fn alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&self.tracker())
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub(crate) fn tracker(&self) -> MutexGuard<'_, DegradationTracker> {
        // A panic while recording cannot leave the log inconsistent.
        self.degradations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn evicted_conversations_release_their_generation() {
        let mut config = ParleyConfig::default();
        config.context.max_conversations = 2;
        let engine = SuggestionEngine::builder(config).build().unwrap();

        for i in 0..20 {
            let request = SuggestionRequest::new("u1", format!("c{i}"), "Hello", "en");
            assert!(!engine.suggest(request).await.is_superseded());
        }

        assert_eq!(engine.contexts.conversation_count(), 2);
        assert_eq!(engine.generations.len(), 2);
    }
}
