//! Concurrent provider fan-out.
//!
//! Every provider call runs as its own task under a per-call timeout; the
//! whole fan-out is bounded by the request's global deadline. Failures are
//! classified, logged, and reduced to an empty contribution. Sibling calls
//! and the request itself are never aborted by one provider failing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parley_core::config::{GatewayConfig, ShortCircuitConfig};
use parley_core::errors::ProviderError;
use parley_core::models::{ContextSnapshot, Suggestion, SuggestionSource};
use parley_core::traits::ISuggestionProvider;
use parley_observability::tracing_setup::events;
use parley_observability::{fanout_span, provider_span};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn, Instrument};

use crate::tiers::ProviderTiers;

/// What one provider contributed to a fan-out.
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider_id: String,
    pub source: SuggestionSource,
    /// Flat priority rank, 0 = highest.
    pub rank: usize,
    /// Empty when `error` is set.
    pub suggestions: Vec<Suggestion>,
    pub error: Option<ProviderError>,
    pub latency_ms: u64,
}

impl ProviderOutcome {
    fn from_result(
        provider_id: String,
        source: SuggestionSource,
        rank: usize,
        result: Result<Vec<Suggestion>, ProviderError>,
        latency: Duration,
    ) -> Self {
        let latency_ms = latency.as_millis() as u64;
        match result {
            Ok(suggestions) => {
                let before = suggestions.len();
                let suggestions: Vec<_> = suggestions
                    .into_iter()
                    .filter(|s| !s.text.trim().is_empty())
                    .collect();
                if suggestions.len() < before {
                    debug!(
                        provider = %provider_id,
                        dropped = before - suggestions.len(),
                        "dropped suggestions with empty text"
                    );
                }
                Self {
                    provider_id,
                    source,
                    rank,
                    suggestions,
                    error: None,
                    latency_ms,
                }
            }
            Err(error) => Self::failed(provider_id, source, rank, error, latency_ms),
        }
    }

    fn failed(
        provider_id: String,
        source: SuggestionSource,
        rank: usize,
        error: ProviderError,
        latency_ms: u64,
    ) -> Self {
        events::provider_failed(&provider_id, error.kind().as_str(), &error);
        Self {
            provider_id,
            source,
            rank,
            suggestions: Vec::new(),
            error: Some(error),
            latency_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a fan-out produced, in provider priority order.
#[derive(Debug, Clone, Default)]
pub struct FanOutReport {
    pub outcomes: Vec<ProviderOutcome>,
    /// Providers never invoked: short-circuited tiers, unavailable providers.
    pub skipped: Vec<String>,
    /// The global deadline expired before every invoked provider resolved.
    pub deadline_hit: bool,
}

impl FanOutReport {
    /// Total suggestions collected across providers.
    pub fn suggestion_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.suggestions.len()).sum()
    }

    /// Per-provider result map: suggestions or the classified error.
    pub fn results(&self) -> HashMap<String, Result<Vec<Suggestion>, ProviderError>> {
        self.outcomes
            .iter()
            .map(|o| {
                let result = match &o.error {
                    Some(e) => Err(e.clone()),
                    None => Ok(o.suggestions.clone()),
                };
                (o.provider_id.clone(), result)
            })
            .collect()
    }

    pub fn successful(&self) -> impl Iterator<Item = &ProviderOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ProviderOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when every invoked provider failed or returned nothing.
    pub fn is_empty(&self) -> bool {
        self.suggestion_count() == 0
    }
}

/// Invokes registered providers for a prompt.
pub struct ProviderGateway {
    tiers: ProviderTiers,
    per_call_timeout: Duration,
    short_circuit: ShortCircuitConfig,
}

impl ProviderGateway {
    pub fn new(providers: Vec<Arc<dyn ISuggestionProvider>>, config: &GatewayConfig) -> Self {
        Self {
            tiers: ProviderTiers::arrange(providers, &config.provider_priority_tiers),
            per_call_timeout: Duration::from_millis(config.per_provider_timeout_ms),
            short_circuit: config.short_circuit.clone(),
        }
    }

    pub fn tiers(&self) -> &ProviderTiers {
        &self.tiers
    }

    pub fn per_call_timeout(&self) -> Duration {
        self.per_call_timeout
    }

    /// Call every provider and collect their outcomes before `deadline`.
    ///
    /// With short-circuiting disabled all providers run concurrently. When
    /// enabled, tiers run one after another (providers within a tier still
    /// run concurrently) and lower tiers are skipped once the collected
    /// suggestion count reaches the threshold.
    pub async fn fan_out(
        &self,
        prompt: &str,
        context: &ContextSnapshot,
        deadline: Instant,
    ) -> FanOutReport {
        let span = fanout_span!(self.tiers.provider_count(), self.short_circuit.enabled);
        self.fan_out_inner(prompt, context, deadline)
            .instrument(span)
            .await
    }

    async fn fan_out_inner(
        &self,
        prompt: &str,
        context: &ContextSnapshot,
        deadline: Instant,
    ) -> FanOutReport {
        let groups: Vec<Vec<Arc<dyn ISuggestionProvider>>> = if self.short_circuit.enabled {
            self.tiers.tiers().to_vec()
        } else {
            vec![self.tiers.tiers().iter().flatten().cloned().collect()]
        };

        let prompt: Arc<str> = Arc::from(prompt);
        let context = Arc::new(context.clone());
        let mut report = FanOutReport::default();

        for group in groups {
            let short_circuited = self.short_circuit.enabled
                && report.suggestion_count() >= self.short_circuit.threshold;
            if short_circuited || report.deadline_hit {
                let ids: Vec<_> = group.iter().map(|p| p.id().to_string()).collect();
                debug!(
                    skipped = ?ids,
                    collected = report.suggestion_count(),
                    deadline_hit = report.deadline_hit,
                    "skipping lower-priority tier"
                );
                report.skipped.extend(ids);
                continue;
            }
            self.run_group(group, &prompt, &context, deadline, &mut report)
                .await;
        }

        report
            .outcomes
            .sort_by_key(|o| self.tiers.rank(&o.provider_id));
        report
    }

    async fn run_group(
        &self,
        group: Vec<Arc<dyn ISuggestionProvider>>,
        prompt: &Arc<str>,
        context: &Arc<ContextSnapshot>,
        deadline: Instant,
        report: &mut FanOutReport,
    ) {
        let mut set = JoinSet::new();
        let mut pending: HashMap<String, SuggestionSource> = HashMap::new();

        for provider in group {
            let id = provider.id().to_string();
            if !provider.is_available() {
                debug!(provider = %id, "provider unavailable, skipping");
                report.skipped.push(id);
                continue;
            }
            pending.insert(id.clone(), provider.source());

            let rank = self.tiers.rank(&id);
            let per_call = self.per_call_timeout;
            let prompt = Arc::clone(prompt);
            let context = Arc::clone(context);
            let span = provider_span!(id);
            set.spawn(
                async move {
                    let started = std::time::Instant::now();
                    let source = provider.source();
                    let result = match tokio::time::timeout(
                        per_call,
                        provider.call(&prompt, &context, per_call),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(ProviderError::Timeout {
                            provider: id.clone(),
                            timeout_ms: per_call.as_millis() as u64,
                        }),
                    };
                    ProviderOutcome::from_result(id, source, rank, result, started.elapsed())
                }
                .instrument(span),
            );
        }

        let started = Instant::now();
        let mut resolved = HashSet::new();
        loop {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok(outcome))) => {
                    resolved.insert(outcome.provider_id.clone());
                    report.outcomes.push(outcome);
                }
                Ok(Some(Err(join_error))) => {
                    warn!(error = %join_error, "provider task did not complete");
                }
                Ok(None) => break,
                Err(_) => {
                    report.deadline_hit = true;
                    set.abort_all();
                    break;
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        for (id, source) in pending {
            if resolved.contains(&id) {
                continue;
            }
            let rank = self.tiers.rank(&id);
            let error = if report.deadline_hit {
                ProviderError::Timeout {
                    provider: id.clone(),
                    timeout_ms: elapsed_ms,
                }
            } else {
                ProviderError::NetworkError {
                    provider: id.clone(),
                    reason: "provider task panicked".to_string(),
                }
            };
            report
                .outcomes
                .push(ProviderOutcome::failed(id, source, rank, error, elapsed_ms));
        }
    }
}
