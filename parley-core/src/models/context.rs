use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The user the suggestions are for.
    User,
    /// The other side of the conversation.
    Partner,
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub speaker: Speaker,
    /// Explicit language tag (ISO 639-1). Detected when absent.
    pub language: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, speaker: Speaker) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            speaker,
            language: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Speaker::User)
    }

    pub fn partner(text: impl Into<String>) -> Self {
        Self::new(text, Speaker::Partner)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Conversation mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Professional,
    #[default]
    Neutral,
    Friendly,
    Excited,
    Casual,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Self::Formal,
        Self::Professional,
        Self::Neutral,
        Self::Friendly,
        Self::Excited,
        Self::Casual,
    ];

    /// Position on the formality axis, 1.0 = most formal.
    pub fn formality(self) -> f64 {
        match self {
            Self::Formal => 1.0,
            Self::Professional => 0.85,
            Self::Neutral => 0.5,
            Self::Friendly => 0.35,
            Self::Excited => 0.25,
            Self::Casual => 0.15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Professional => "professional",
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
            Self::Excited => "excited",
            Self::Casual => "casual",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse conversation topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Greeting,
    Travel,
    Work,
    Food,
    Health,
    Shopping,
    #[default]
    General,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Travel => "travel",
            Self::Work => "work",
            Self::Food => "food",
            Self::Health => "health",
            Self::Shopping => "shopping",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable view of a conversation window, handed to providers and the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub conversation_id: String,
    /// Oldest first.
    pub recent_messages: Vec<Message>,
    pub topic: Topic,
    pub tone: Tone,
    pub languages_used: BTreeSet<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContextSnapshot {
    /// A snapshot with no history.
    pub fn empty(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            recent_messages: Vec::new(),
            topic: Topic::default(),
            tone: Tone::default(),
            languages_used: BTreeSet::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.recent_messages.last()
    }

    /// Lower-cased text of every message in the window, space separated.
    pub fn transcript(&self) -> String {
        self.recent_messages
            .iter()
            .map(|m| m.text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
