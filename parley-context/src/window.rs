//! ConversationContext: a bounded rolling window of recent messages.

use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use parley_core::models::{ContextSnapshot, Message, Tone, Topic};

use crate::analysis;

/// Per-conversation state. Mutated only through [`ContextWindowManager`].
///
/// [`ContextWindowManager`]: crate::ContextWindowManager
#[derive(Debug, Clone)]
pub struct ConversationContext {
    pub conversation_id: String,
    capacity: usize,
    messages: VecDeque<Message>,
    pub topic: Topic,
    pub tone: Tone,
    pub languages_used: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Messages appended over the conversation's lifetime, including evicted ones.
    pub total_messages: u64,
}

impl ConversationContext {
    pub fn new(conversation_id: impl Into<String>, capacity: usize) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: conversation_id.into(),
            capacity: capacity.max(1),
            messages: VecDeque::with_capacity(capacity.max(1)),
            topic: Topic::default(),
            tone: Tone::default(),
            languages_used: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            total_messages: 0,
        }
    }

    /// Append a message, evicting the oldest ones beyond capacity, and
    /// refresh tone, topic, and languages.
    pub fn push(&mut self, mut message: Message) {
        if message.language.is_none() {
            message.language = analysis::detect_language(&message.text).map(str::to_string);
        }
        if let Some(lang) = &message.language {
            self.languages_used.insert(lang.to_lowercase());
        }

        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }

        let window: Vec<Message> = self.messages.iter().cloned().collect();
        self.tone = analysis::detect_tone(&window);
        self.topic = analysis::detect_topic(&window);
        self.total_messages += 1;
        self.updated_at = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Idle time since the last append.
    pub fn idle_duration(&self) -> chrono::Duration {
        Utc::now() - self.updated_at
    }

    /// Immutable copy of the current state.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            conversation_id: self.conversation_id.clone(),
            recent_messages: self.messages.iter().cloned().collect(),
            topic: self.topic,
            tone: self.tone,
            languages_used: self.languages_used.clone(),
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_trims_to_capacity_dropping_oldest() {
        let mut ctx = ConversationContext::new("c1", 3);
        for i in 0..5 {
            ctx.push(Message::user(format!("message {i}")));
        }
        assert_eq!(ctx.len(), 3);
        let texts: Vec<_> = ctx.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["message 2", "message 3", "message 4"]);
        assert_eq!(ctx.total_messages, 5);
    }

    #[test]
    fn explicit_language_wins_over_detection() {
        let mut ctx = ConversationContext::new("c1", 10);
        ctx.push(Message::user("Hello, how are you").with_language("EN"));
        ctx.push(Message::partner("Hola, ¿cómo estás?"));
        let langs: Vec<_> = ctx.languages_used.iter().cloned().collect();
        assert_eq!(langs, vec!["en".to_string(), "es".to_string()]);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut ctx = ConversationContext::new("c1", 10);
        ctx.push(Message::user("first"));
        let snap = ctx.snapshot();
        ctx.push(Message::user("second"));
        assert_eq!(snap.recent_messages.len(), 1);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let mut ctx = ConversationContext::new("c1", 0);
        ctx.push(Message::user("a"));
        ctx.push(Message::user("b"));
        assert_eq!(ctx.len(), 1);
    }
}
