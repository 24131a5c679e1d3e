use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Confidence;
use crate::errors::ParseError;

/// Which kind of backend produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionSource {
    Neural,
    Personality,
    Pattern,
    Predictive,
    RuleBased,
}

impl SuggestionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neural => "neural",
            Self::Personality => "personality",
            Self::Pattern => "pattern",
            Self::Predictive => "predictive",
            Self::RuleBased => "rule-based",
        }
    }
}

impl fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neural" => Ok(Self::Neural),
            "personality" => Ok(Self::Personality),
            "pattern" => Ok(Self::Pattern),
            "predictive" => Ok(Self::Predictive),
            "rule-based" | "rule_based" | "rulebased" => Ok(Self::RuleBased),
            other => Err(ParseError::UnknownSource {
                tag: other.to_string(),
            }),
        }
    }
}

/// A single candidate reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub confidence: Confidence,
    pub source: SuggestionSource,
    pub reasoning: String,
    /// How well the suggestion fits the conversation so far, in [0, 1].
    pub context_relevance: f64,
    pub alternatives: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, confidence: f64, source: SuggestionSource) -> Self {
        Self {
            text: text.into(),
            confidence: Confidence::new(confidence),
            source,
            reasoning: String::new(),
            context_relevance: 0.0,
            alternatives: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.context_relevance = if relevance.is_nan() {
            0.0
        } else {
            relevance.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Deduplication key: lower-cased with whitespace runs collapsed.
    pub fn normalized_text(&self) -> String {
        normalize_text(&self.text)
    }
}

/// Lower-case `text`, trim it, and collapse internal whitespace to single spaces.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        assert_eq!(normalize_text("  Hola,   ¿Cómo ESTÁS? "), "hola, ¿cómo estás?");
        assert_eq!(normalize_text("a\tb\nc"), "a b c");
    }

    #[test]
    fn source_round_trips_through_str() {
        for source in [
            SuggestionSource::Neural,
            SuggestionSource::Personality,
            SuggestionSource::Pattern,
            SuggestionSource::Predictive,
            SuggestionSource::RuleBased,
        ] {
            assert_eq!(source.as_str().parse::<SuggestionSource>().unwrap(), source);
        }
        assert!("oracle".parse::<SuggestionSource>().is_err());
    }

    #[test]
    fn rule_based_serializes_kebab_case() {
        let json = serde_json::to_string(&SuggestionSource::RuleBased).unwrap();
        assert_eq!(json, "\"rule-based\"");
    }
}
