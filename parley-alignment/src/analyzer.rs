//! AlignmentAnalyzer: mood lookup, formality distance, language comfort.

use parley_core::models::{AlignmentFactor, AlignmentScore, ContextSnapshot, UserProfile};
use tracing::debug;

use crate::matrix::AlignmentMatrix;

/// Scores below this surface a recommendation.
pub const LOW_ALIGNMENT: f64 = 0.4;

#[derive(Default)]
pub struct AlignmentAnalyzer {
    matrix: AlignmentMatrix,
}

impl AlignmentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrix(matrix: AlignmentMatrix) -> Self {
        Self { matrix }
    }

    /// Fit between `profile` and the conversation in `context`, in [0, 1].
    ///
    /// Factors: `mood` (lookup table), `formality` (`1 - |context - profile|`),
    /// and `proficiency` when the profile knows any language used in the
    /// conversation. The score is their mean.
    pub fn align(&self, profile: &UserProfile, context: &ContextSnapshot) -> AlignmentScore {
        let mut factors = vec![
            AlignmentFactor {
                name: "mood".to_string(),
                score: self.matrix.score(profile.personality, context.tone),
            },
            AlignmentFactor {
                name: "formality".to_string(),
                score: formality_alignment(
                    context.tone.formality(),
                    profile.effective_formality(),
                ),
            },
        ];

        let known: Vec<f64> = context
            .languages_used
            .iter()
            .filter_map(|lang| profile.proficiency.get(lang).copied())
            .collect();
        if !known.is_empty() {
            factors.push(AlignmentFactor {
                name: "proficiency".to_string(),
                score: (known.iter().sum::<f64>() / known.len() as f64).clamp(0.0, 1.0),
            });
        }

        let mut alignment = AlignmentScore::from_factors(factors);
        if alignment.score < LOW_ALIGNMENT {
            alignment.recommendation = Some(recommend(profile, context));
            debug!(
                user_id = %profile.user_id,
                score = alignment.score,
                "low personality alignment"
            );
        }
        alignment
    }
}

/// `1 - |context - profile|`, clamped to [0, 1].
pub fn formality_alignment(context_formality: f64, profile_formality: f64) -> f64 {
    (1.0 - (context_formality - profile_formality).abs()).clamp(0.0, 1.0)
}

fn recommend(profile: &UserProfile, context: &ContextSnapshot) -> String {
    let direction = if context.tone.formality() > profile.effective_formality() {
        "more formal"
    } else {
        "more relaxed"
    };
    format!(
        "conversation is {} while the user is {}; prefer {} phrasing",
        context.tone, profile.personality, direction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formality_distance() {
        assert_eq!(formality_alignment(0.5, 0.5), 1.0);
        assert!((formality_alignment(1.0, 0.15) - 0.15).abs() < 1e-12);
        assert_eq!(formality_alignment(0.0, 1.0), 0.0);
    }
}
