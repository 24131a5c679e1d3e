//! Background housekeeping: result-cache sweeps and idle conversation
//! cleanup.

use std::sync::Arc;
use std::time::Duration;

use parley_context::{cleanup_idle, ContextWindowManager, GenerationTracker};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::engine::SuggestionEngine;

/// Handles to the maintenance tasks. Dropping the handle stops them.
pub struct MaintenanceHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl MaintenanceHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }
}

impl Drop for MaintenanceHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl SuggestionEngine {
    /// Start the cache sweeper and the idle-conversation cleaner on the
    /// current tokio runtime.
    pub fn start_maintenance(&self) -> MaintenanceHandle {
        let sweep_every = Duration::from_millis(self.config.cache.sweep_interval_ms.max(1));
        let idle_timeout = Duration::from_secs(self.config.context.idle_timeout_secs);
        // Check a few times per timeout window, at most once a minute.
        let cleanup_every =
            (idle_timeout / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));

        let sweeper = self.cache.spawn_sweeper(sweep_every);
        let cleaner = spawn_cleaner(
            Arc::clone(&self.contexts),
            Arc::clone(&self.generations),
            idle_timeout,
            cleanup_every,
        );
        MaintenanceHandle {
            tasks: vec![sweeper, cleaner],
        }
    }
}

fn spawn_cleaner(
    contexts: Arc<ContextWindowManager>,
    generations: Arc<GenerationTracker>,
    idle_timeout: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = sweep_idle(&contexts, &generations, idle_timeout);
            if removed > 0 {
                debug!(removed, "idle conversations removed");
            }
        }
    })
}

/// Remove idle conversations, then drop every generation counter whose
/// conversation no longer exists.
pub(crate) fn sweep_idle(
    contexts: &ContextWindowManager,
    generations: &GenerationTracker,
    idle_timeout: Duration,
) -> usize {
    let timeout = chrono::Duration::from_std(idle_timeout)
        .unwrap_or_else(|_| chrono::Duration::days(36_500));
    let removed = cleanup_idle(contexts, timeout);
    let released = generations.retain(|id| contexts.contains(id));
    if released > 0 {
        debug!(released, "generation counters released");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::config::ContextConfig;
    use parley_core::models::Message;

    #[test]
    fn zero_timeout_sweeps_everything() {
        let contexts = ContextWindowManager::new(&ContextConfig::default());
        let generations = GenerationTracker::new();
        contexts.append("c1", Message::user("hi"));
        generations.begin("c1");
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(sweep_idle(&contexts, &generations, Duration::ZERO), 1);
        assert_eq!(contexts.conversation_count(), 0);
        assert_eq!(generations.current("c1"), 0);
    }

    #[test]
    fn active_conversations_are_kept() {
        let contexts = ContextWindowManager::new(&ContextConfig::default());
        let generations = GenerationTracker::new();
        contexts.append("c1", Message::user("hi"));
        assert_eq!(
            sweep_idle(&contexts, &generations, Duration::from_secs(3600)),
            0
        );
        assert_eq!(contexts.conversation_count(), 1);
    }

    #[test]
    fn counters_of_evicted_conversations_are_released() {
        let contexts = ContextWindowManager::new(&ContextConfig {
            max_conversations: 2,
            ..ContextConfig::default()
        });
        let generations = GenerationTracker::new();
        for i in 0..100 {
            let id = format!("c{i}");
            generations.begin(&id);
            contexts.append(&id, Message::user("hi"));
        }
        assert_eq!(contexts.conversation_count(), 2);

        sweep_idle(&contexts, &generations, Duration::from_secs(3600));
        assert_eq!(generations.len(), 2);

        std::thread::sleep(Duration::from_millis(5));
        sweep_idle(&contexts, &generations, Duration::ZERO);
        assert_eq!(contexts.conversation_count(), 0);
        assert!(generations.is_empty());
    }
}
