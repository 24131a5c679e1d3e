//! ContextWindowManager: per-conversation windows behind per-key locks.
//!
//! The `DashMap` only hands out `Arc`s to per-conversation slots; appends
//! lock the slot's own mutex, so appends to one conversation are serialized
//! while different conversations proceed in parallel.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use dashmap::DashMap;
use parley_core::config::ContextConfig;
use parley_core::models::{ContextSnapshot, Message};
use tracing::debug;

use crate::window::ConversationContext;

struct Slot {
    context: Mutex<ConversationContext>,
    /// Last append, in epoch milliseconds. Read without taking the lock.
    touched_ms: AtomicI64,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, ConversationContext> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe owner of all conversation windows.
pub struct ContextWindowManager {
    conversations: DashMap<String, Arc<Slot>>,
    window_capacity: usize,
    max_conversations: usize,
}

impl ContextWindowManager {
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            conversations: DashMap::new(),
            window_capacity: config.window_capacity.max(1),
            max_conversations: config.max_conversations.max(1),
        }
    }

    /// Slot for `conversation_id`, created on first use. Also returns the id
    /// of a conversation evicted to make room, if any.
    fn slot(&self, conversation_id: &str) -> (Arc<Slot>, Option<String>) {
        if let Some(slot) = self.conversations.get(conversation_id) {
            return (slot.clone(), None);
        }
        let evicted = if self.conversations.len() >= self.max_conversations {
            self.evict_least_recent()
        } else {
            None
        };
        let slot = self
            .conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                Arc::new(Slot {
                    context: Mutex::new(ConversationContext::new(
                        conversation_id,
                        self.window_capacity,
                    )),
                    touched_ms: AtomicI64::new(Utc::now().timestamp_millis()),
                })
            })
            .clone();
        (slot, evicted)
    }

    /// Evict the least recently updated conversation that nobody is using.
    ///
    /// A slot is in use while any caller holds a clone of its `Arc`; the
    /// count is checked under the shard write lock, so a concurrent lookup
    /// cannot pick the slot up halfway through its removal.
    fn evict_least_recent(&self) -> Option<String> {
        let mut candidates: Vec<(i64, String)> = self
            .conversations
            .iter()
            .filter(|entry| Arc::strong_count(entry.value()) == 1)
            .map(|entry| {
                (
                    entry.value().touched_ms.load(Ordering::Relaxed),
                    entry.key().clone(),
                )
            })
            .collect();
        candidates.sort_unstable();

        for (_, id) in candidates {
            if self
                .conversations
                .remove_if(&id, |_, slot| Arc::strong_count(slot) == 1)
                .is_some()
            {
                debug!(conversation = %id, "evicting least recently updated conversation");
                return Some(id);
            }
        }
        None
    }

    fn holds(&self, conversation_id: &str, slot: &Arc<Slot>) -> bool {
        self.conversations
            .get(conversation_id)
            .is_some_and(|current| Arc::ptr_eq(current.value(), slot))
    }

    /// Append `message` to the conversation and return the resulting snapshot.
    ///
    /// Creates the conversation on first use.
    pub fn append(&self, conversation_id: &str, message: Message) -> ContextSnapshot {
        self.append_tracked(conversation_id, message).0
    }

    /// Like [`append`](Self::append), but also reports the conversation
    /// evicted to stay within `max_conversations`, so callers can release
    /// state they keep per conversation.
    pub fn append_tracked(
        &self,
        conversation_id: &str,
        message: Message,
    ) -> (ContextSnapshot, Option<String>) {
        let mut evicted = None;
        loop {
            let (slot, dropped) = self.slot(conversation_id);
            evicted = evicted.or(dropped);
            let mut ctx = slot.lock();
            // Removed (by `remove` or idle cleanup) while we waited: retry
            // on the live slot instead of writing into an orphan.
            if !self.holds(conversation_id, &slot) {
                continue;
            }
            ctx.push(message);
            slot.touched_ms
                .store(ctx.updated_at.timestamp_millis(), Ordering::Relaxed);
            return (ctx.snapshot(), evicted);
        }
    }

    /// Current snapshot, if the conversation exists.
    pub fn snapshot(&self, conversation_id: &str) -> Option<ContextSnapshot> {
        let slot = self.conversations.get(conversation_id)?.clone();
        let ctx = slot.lock();
        Some(ctx.snapshot())
    }

    /// Cloned conversation state, if the conversation exists.
    pub fn get(&self, conversation_id: &str) -> Option<ConversationContext> {
        let slot = self.conversations.get(conversation_id)?.clone();
        let ctx = slot.lock();
        Some(ctx.clone())
    }

    pub fn remove(&self, conversation_id: &str) -> Option<ConversationContext> {
        self.conversations
            .remove(conversation_id)
            .map(|(_, slot)| {
                let ctx = slot.lock().clone();
                ctx
            })
    }

    pub fn contains(&self, conversation_id: &str) -> bool {
        self.conversations.contains_key(conversation_id)
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    pub fn conversation_ids(&self) -> Vec<String> {
        self.conversations.iter().map(|r| r.key().clone()).collect()
    }

    pub fn window_capacity(&self) -> usize {
        self.window_capacity
    }
}

impl Default for ContextWindowManager {
    fn default() -> Self {
        Self::new(&ContextConfig::default())
    }
}
