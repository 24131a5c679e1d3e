use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{ContextSnapshot, Suggestion, SuggestionSource};

/// A suggestion-generating backend.
///
/// Implementations should honour `timeout` themselves where they can; the
/// gateway enforces it regardless and drops calls that overrun.
#[async_trait]
pub trait ISuggestionProvider: Send + Sync {
    /// Stable identifier used for priority tiers and learned weights.
    fn id(&self) -> &str;

    /// Source tag attached to this provider's suggestions.
    fn source(&self) -> SuggestionSource;

    /// Produce suggestions for `prompt` in the given conversation context.
    async fn call(
        &self,
        prompt: &str,
        context: &ContextSnapshot,
        timeout: Duration,
    ) -> Result<Vec<Suggestion>, ProviderError>;

    /// Whether the provider should be invoked at all.
    fn is_available(&self) -> bool {
        true
    }
}
