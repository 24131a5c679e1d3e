use serde::{Deserialize, Serialize};

use super::{Message, SuggestionSource};

/// One user-facing suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub user_id: String,
    pub conversation_id: String,
    /// Partial or complete input text.
    pub input: String,
    /// Language of `input`. Detected when absent.
    #[serde(default)]
    pub source_language: Option<String>,
    /// Language suggestions should be produced in.
    pub target_language: String,
}

impl SuggestionRequest {
    pub fn new(
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
        input: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
            input: input.into(),
            source_language: None,
            target_language: target_language.into(),
        }
    }

    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    /// The conversation message this request appends.
    pub fn to_message(&self) -> Message {
        let message = Message::user(self.input.clone());
        match &self.source_language {
            Some(lang) => message.with_language(lang.clone()),
            None => message,
        }
    }
}

/// Whether the user accepted a suggestion from a given provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub user_id: String,
    pub provider_id: String,
    pub accepted: bool,
    /// Source of the suggestion the feedback is about.
    #[serde(default)]
    pub source: Option<SuggestionSource>,
    /// Language the suggestion was in.
    #[serde(default)]
    pub language: Option<String>,
}

impl Feedback {
    pub fn accepted(user_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            provider_id: provider_id.into(),
            accepted: true,
            source: None,
            language: None,
        }
    }

    pub fn rejected(user_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            accepted: false,
            ..Self::accepted(user_id, provider_id)
        }
    }

    pub fn with_source(mut self, source: SuggestionSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
