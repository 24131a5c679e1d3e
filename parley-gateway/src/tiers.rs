//! Priority tiers: grouping of registered providers by configured priority.

use std::collections::HashMap;
use std::sync::Arc;

use parley_core::traits::ISuggestionProvider;
use tracing::warn;

/// Providers grouped by priority, highest tier first.
#[derive(Clone)]
pub struct ProviderTiers {
    tiers: Vec<Vec<Arc<dyn ISuggestionProvider>>>,
    /// Provider id → flat priority rank (0 = highest).
    ranks: HashMap<String, usize>,
}

impl ProviderTiers {
    /// Arrange `providers` according to `configured` tiers.
    ///
    /// Configured ids with no registered provider are ignored. Registered
    /// providers missing from every tier form one implicit last tier, in
    /// registration order.
    pub fn arrange(
        providers: Vec<Arc<dyn ISuggestionProvider>>,
        configured: &[Vec<String>],
    ) -> Self {
        let mut by_id: HashMap<String, Arc<dyn ISuggestionProvider>> = HashMap::new();
        let mut registration_order = Vec::new();
        for provider in providers {
            let id = provider.id().to_string();
            if by_id.insert(id.clone(), provider).is_some() {
                warn!(provider = %id, "duplicate provider id, keeping the last registration");
            } else {
                registration_order.push(id);
            }
        }

        let mut tiers = Vec::new();
        for tier in configured {
            let group: Vec<_> = tier.iter().filter_map(|id| by_id.remove(id)).collect();
            if !group.is_empty() {
                tiers.push(group);
            }
        }
        let rest: Vec<_> = registration_order
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        if !rest.is_empty() {
            tiers.push(rest);
        }

        let ranks = tiers
            .iter()
            .flatten()
            .enumerate()
            .map(|(rank, p)| (p.id().to_string(), rank))
            .collect();

        Self { tiers, ranks }
    }

    pub fn tiers(&self) -> &[Vec<Arc<dyn ISuggestionProvider>>] {
        &self.tiers
    }

    /// Flat priority rank of `provider_id`; unknown ids rank last.
    pub fn rank(&self, provider_id: &str) -> usize {
        self.ranks.get(provider_id).copied().unwrap_or(usize::MAX)
    }

    /// Provider ids in priority order.
    pub fn order(&self) -> Vec<String> {
        self.tiers
            .iter()
            .flatten()
            .map(|p| p.id().to_string())
            .collect()
    }

    pub fn provider_count(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
