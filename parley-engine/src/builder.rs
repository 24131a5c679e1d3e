//! Engine construction.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use parley_alignment::{AlignmentAnalyzer, AlignmentMatrix};
use parley_cache::ResultCache;
use parley_context::{ContextWindowManager, GenerationTracker};
use parley_core::errors::{ParleyError, ParleyResult};
use parley_core::traits::{IKeyValueStore, ISuggestionProvider};
use parley_core::ParleyConfig;
use parley_gateway::ProviderGateway;
use parley_learning::ProfileStore;
use parley_observability::{DegradationTracker, EngineMetrics};
use parley_ranking::Aggregator;
use tracing::{info, warn};

use crate::engine::SuggestionEngine;

/// Collects providers and an optional persistence store, then builds a
/// [`SuggestionEngine`].
pub struct SuggestionEngineBuilder {
    config: ParleyConfig,
    providers: Vec<Arc<dyn ISuggestionProvider>>,
    store: Option<Arc<dyn IKeyValueStore>>,
    matrix: Option<AlignmentMatrix>,
    init_tracing: bool,
}

impl SuggestionEngineBuilder {
    pub(crate) fn new(config: ParleyConfig) -> Self {
        Self {
            config,
            providers: Vec::new(),
            store: None,
            matrix: None,
            init_tracing: false,
        }
    }

    /// Register a provider. Registration order breaks ties between
    /// providers missing from every priority tier.
    pub fn provider(mut self, provider: Arc<dyn ISuggestionProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers(
        mut self,
        providers: impl IntoIterator<Item = Arc<dyn ISuggestionProvider>>,
    ) -> Self {
        self.providers.extend(providers);
        self
    }

    /// External key-value store for profile durability and, when
    /// `cache.l2_enabled`, result write-through.
    pub fn store(mut self, store: Arc<dyn IKeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn alignment_matrix(mut self, matrix: AlignmentMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Install the global tracing subscriber from `config.observability`.
    pub fn with_tracing(mut self) -> Self {
        self.init_tracing = true;
        self
    }

    pub fn build(self) -> ParleyResult<SuggestionEngine> {
        self.config.validate()?;

        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.id().to_string()) {
                return Err(ParleyError::ConfigError(format!(
                    "provider '{}' registered twice",
                    provider.id()
                )));
            }
        }
        if self.providers.is_empty() {
            warn!("no providers registered, every request will use the rule-based fallback");
        }

        if self.init_tracing {
            parley_observability::init_from_config(&self.config.observability);
        }

        let config = self.config;
        let profiles = match &self.store {
            Some(store) => ProfileStore::new(&config.learning).with_backing(Arc::clone(store)),
            None => ProfileStore::new(&config.learning),
        };
        let cache = match &self.store {
            Some(store) => ResultCache::with_store(&config.cache, Arc::clone(store)),
            None => ResultCache::new(&config.cache),
        };
        let alignment = match self.matrix {
            Some(matrix) => AlignmentAnalyzer::with_matrix(matrix),
            None => AlignmentAnalyzer::new(),
        };
        let aggregator = Aggregator::new(&config.ranking, config.engine.max_suggestions)
            .with_default_weight(config.learning.default_weight);
        let gateway = ProviderGateway::new(self.providers, &config.gateway);

        info!(
            providers = gateway.tiers().provider_count(),
            tiers = gateway.tiers().tiers().len(),
            l2 = cache.has_l2(),
            persistence = self.store.is_some(),
            "suggestion engine built"
        );

        Ok(SuggestionEngine {
            contexts: Arc::new(ContextWindowManager::new(&config.context)),
            generations: Arc::new(GenerationTracker::new()),
            gateway,
            profiles,
            alignment,
            aggregator,
            cache: Arc::new(cache),
            metrics: EngineMetrics::new(),
            degradations: Mutex::new(DegradationTracker::new()),
            config,
        })
    }
}
