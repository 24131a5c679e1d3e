//! Apply one piece of feedback to a profile: provider weight, pattern
//! affinity, language proficiency.

use chrono::Utc;
use parley_core::models::{Feedback, SuggestionSource, UserProfile};

use crate::ema::{ema_step, signal};

/// Proficiency assumed for a language the user has never accepted text in.
const INITIAL_PROFICIENCY: f64 = 0.5;

/// Result of applying feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    pub user_id: String,
    pub provider_id: String,
    pub old_weight: f64,
    pub new_weight: f64,
    pub pattern_affinity: f64,
    /// Language whose proficiency moved, with the new value.
    pub proficiency: Option<(String, f64)>,
}

/// Update `profile` in place from `feedback`.
///
/// - the provider's weight always moves toward the feedback signal;
/// - pattern affinity moves when the suggestion came from the pattern bank;
/// - proficiency in the suggestion's language rises on acceptance.
pub fn apply_feedback(
    profile: &mut UserProfile,
    feedback: &Feedback,
    learning_rate: f64,
    default_weight: f64,
) -> FeedbackOutcome {
    let s = signal(feedback.accepted);

    let old_weight = profile.weight_for(&feedback.provider_id, default_weight);
    let new_weight = ema_step(old_weight, s, learning_rate);
    profile
        .provider_weights
        .insert(feedback.provider_id.clone(), new_weight);

    if feedback.source == Some(SuggestionSource::Pattern) {
        profile.pattern_affinity = ema_step(profile.pattern_affinity, s, learning_rate);
    }

    let proficiency = match (&feedback.language, feedback.accepted) {
        (Some(language), true) => {
            let key = language.to_lowercase();
            let current = profile
                .proficiency
                .get(&key)
                .copied()
                .unwrap_or(INITIAL_PROFICIENCY);
            let updated = ema_step(current, 1.0, learning_rate);
            profile.proficiency.insert(key.clone(), updated);
            Some((key, updated))
        }
        _ => None,
    };

    profile.updated_at = Utc::now();

    FeedbackOutcome {
        user_id: profile.user_id.clone(),
        provider_id: feedback.provider_id.clone(),
        old_weight,
        new_weight,
        pattern_affinity: profile.pattern_affinity,
        proficiency,
    }
}
