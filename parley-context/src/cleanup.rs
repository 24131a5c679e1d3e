//! Conversation lifecycle: removal of idle conversations.

use chrono::Duration;

use crate::manager::ContextWindowManager;

/// Default inactivity timeout: 1 hour.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::hours(1);

/// Remove conversations with no append for longer than `idle_timeout`.
///
/// Returns the number of conversations removed.
pub fn cleanup_idle(manager: &ContextWindowManager, idle_timeout: Duration) -> usize {
    let mut removed = 0;
    for id in manager.conversation_ids() {
        let idle = manager
            .get(&id)
            .map(|ctx| ctx.idle_duration() > idle_timeout)
            .unwrap_or(false);
        if idle && manager.remove(&id).is_some() {
            removed += 1;
        }
    }
    removed
}
