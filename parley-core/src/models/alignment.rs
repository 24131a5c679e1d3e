use serde::{Deserialize, Serialize};

/// One contributing factor of an alignment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentFactor {
    pub name: String,
    pub score: f64,
}

/// Fit between a user's personality profile and the current conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentScore {
    /// Mean of all factor scores, in [0, 1].
    pub score: f64,
    pub factors: Vec<AlignmentFactor>,
    /// Advice surfaced when alignment is low. Never blocks a request.
    pub recommendation: Option<String>,
}

impl AlignmentScore {
    /// Neutral alignment used when no profile information is available.
    pub fn neutral() -> Self {
        Self {
            score: 0.5,
            factors: Vec::new(),
            recommendation: None,
        }
    }

    pub fn from_factors(factors: Vec<AlignmentFactor>) -> Self {
        let score = if factors.is_empty() {
            0.5
        } else {
            factors.iter().map(|f| f.score).sum::<f64>() / factors.len() as f64
        };
        Self {
            score: score.clamp(0.0, 1.0),
            factors,
            recommendation: None,
        }
    }
}
