use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse personality classification of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    Professional,
    Analytical,
    #[default]
    Balanced,
    Friendly,
    Expressive,
    Casual,
}

impl PersonalityType {
    pub const ALL: [PersonalityType; 6] = [
        Self::Professional,
        Self::Analytical,
        Self::Balanced,
        Self::Friendly,
        Self::Expressive,
        Self::Casual,
    ];

    /// Formality assumed for this personality when the profile has no
    /// learned value.
    pub fn default_formality(self) -> f64 {
        match self {
            Self::Professional => 0.9,
            Self::Analytical => 0.75,
            Self::Balanced => 0.5,
            Self::Friendly => 0.35,
            Self::Expressive => 0.25,
            Self::Casual => 0.15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Analytical => "analytical",
            Self::Balanced => "balanced",
            Self::Friendly => "friendly",
            Self::Expressive => "expressive",
            Self::Casual => "casual",
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learned per-user state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    /// Provider id → reliability weight in [0, 1].
    pub provider_weights: HashMap<String, f64>,
    /// How often pattern-bank suggestions are accepted, in [0, 1].
    pub pattern_affinity: f64,
    pub personality: PersonalityType,
    /// Preferred formality in [0, 1]. Falls back to the personality default.
    #[serde(default)]
    pub formality: Option<f64>,
    /// Language → proficiency in [0, 1].
    pub proficiency: HashMap<String, f64>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            provider_weights: HashMap::new(),
            pattern_affinity: crate::config::defaults::DEFAULT_PATTERN_AFFINITY,
            personality: PersonalityType::default(),
            formality: None,
            proficiency: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_personality(mut self, personality: PersonalityType) -> Self {
        self.personality = personality;
        self
    }

    /// Learned weight for `provider_id`, or `default` if never updated.
    pub fn weight_for(&self, provider_id: &str, default: f64) -> f64 {
        self.provider_weights
            .get(provider_id)
            .copied()
            .unwrap_or(default)
    }

    pub fn effective_formality(&self) -> f64 {
        self.formality
            .unwrap_or_else(|| self.personality.default_formality())
            .clamp(0.0, 1.0)
    }
}
