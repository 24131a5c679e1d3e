//! Stage 1: multiply each suggestion's confidence by its provider's learned
//! reliability weight.

use parley_core::models::{Confidence, Suggestion, UserProfile};

use crate::aggregator::ProviderContribution;

/// A suggestion tagged with where it came from.
#[derive(Debug, Clone)]
pub struct WeightedSuggestion {
    pub suggestion: Suggestion,
    pub provider_id: String,
    pub rank: usize,
}

pub fn apply_weights(
    contributions: &[ProviderContribution],
    profile: &UserProfile,
    default_weight: f64,
) -> Vec<WeightedSuggestion> {
    contributions
        .iter()
        .flat_map(|c| {
            let weight = profile
                .weight_for(&c.provider_id, default_weight)
                .clamp(0.0, 1.0);
            c.suggestions.iter().map(move |s| {
                let mut suggestion = s.clone();
                suggestion.confidence = Confidence::new(s.confidence.value() * weight);
                WeightedSuggestion {
                    suggestion,
                    provider_id: c.provider_id.clone(),
                    rank: c.rank,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::models::SuggestionSource;

    #[test]
    fn weights_default_when_unlearned() {
        let mut profile = UserProfile::new("u");
        profile.provider_weights.insert("neural".into(), 0.5);
        let contributions = vec![
            ProviderContribution::new(
                "neural",
                0,
                vec![Suggestion::new("a", 0.8, SuggestionSource::Neural)],
            ),
            ProviderContribution::new(
                "pattern",
                1,
                vec![Suggestion::new("b", 0.8, SuggestionSource::Pattern)],
            ),
        ];
        let out = apply_weights(&contributions, &profile, 1.0);
        assert!((out[0].suggestion.confidence.value() - 0.4).abs() < 1e-12);
        assert!((out[1].suggestion.confidence.value() - 0.8).abs() < 1e-12);
        assert_eq!(out[1].rank, 1);
    }
}
