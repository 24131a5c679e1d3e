use serde::{Deserialize, Serialize};

use super::defaults;

/// Context window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Messages retained per conversation.
    pub window_capacity: usize,
    /// Conversations held in memory before the least recently updated is evicted.
    pub max_conversations: usize,
    /// Idle time after which a conversation is eligible for cleanup (seconds).
    pub idle_timeout_secs: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window_capacity: defaults::DEFAULT_WINDOW_CAPACITY,
            max_conversations: defaults::DEFAULT_MAX_CONVERSATIONS,
            idle_timeout_secs: defaults::DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}
