//! Alignment scoring across personalities, tones, and proficiency.

use parley_alignment::{AlignmentAnalyzer, LOW_ALIGNMENT};
use parley_core::models::{ContextSnapshot, PersonalityType, Tone, UserProfile};
use proptest::prelude::*;

fn snapshot(tone: Tone) -> ContextSnapshot {
    let mut s = ContextSnapshot::empty("conv");
    s.tone = tone;
    s
}

#[test]
fn professional_user_in_professional_conversation_aligns_high() {
    let analyzer = AlignmentAnalyzer::new();
    let profile = UserProfile::new("u").with_personality(PersonalityType::Professional);
    let score = analyzer.align(&profile, &snapshot(Tone::Professional));
    // mood 0.95, formality 1 - |0.85 - 0.9| = 0.95
    assert!((score.score - 0.95).abs() < 1e-9);
    assert_eq!(score.factors.len(), 2);
    assert!(score.recommendation.is_none());
}

#[test]
fn mismatch_surfaces_recommendation() {
    let analyzer = AlignmentAnalyzer::new();
    let profile = UserProfile::new("u").with_personality(PersonalityType::Professional);
    let score = analyzer.align(&profile, &snapshot(Tone::Casual));
    assert!(score.score < LOW_ALIGNMENT);
    let advice = score.recommendation.unwrap();
    assert!(advice.contains("more relaxed"), "{advice}");
}

#[test]
fn learned_formality_overrides_personality_default() {
    let analyzer = AlignmentAnalyzer::new();
    let mut profile = UserProfile::new("u").with_personality(PersonalityType::Balanced);
    let before = analyzer.align(&profile, &snapshot(Tone::Formal)).score;
    profile.formality = Some(1.0);
    let after = analyzer.align(&profile, &snapshot(Tone::Formal)).score;
    assert!(after > before);
}

#[test]
fn proficiency_factor_only_when_known() {
    let analyzer = AlignmentAnalyzer::new();
    let mut profile = UserProfile::new("u");
    let mut ctx = snapshot(Tone::Neutral);
    ctx.languages_used.insert("es".to_string());

    assert_eq!(analyzer.align(&profile, &ctx).factors.len(), 2);

    profile.proficiency.insert("es".to_string(), 0.2);
    let score = analyzer.align(&profile, &ctx);
    assert_eq!(score.factors.len(), 3);
    assert_eq!(score.factors[2].name, "proficiency");
}

proptest! {
    #[test]
    fn score_is_always_a_unit_value(
        p in 0usize..6,
        t in 0usize..6,
        formality in proptest::option::of(-1.0f64..2.0),
        proficiency in proptest::option::of(0.0f64..1.0),
    ) {
        let analyzer = AlignmentAnalyzer::new();
        let mut profile = UserProfile::new("u").with_personality(PersonalityType::ALL[p]);
        profile.formality = formality;
        let mut ctx = snapshot(Tone::ALL[t]);
        if let Some(level) = proficiency {
            profile.proficiency.insert("en".to_string(), level);
            ctx.languages_used.insert("en".to_string());
        }
        let score = analyzer.align(&profile, &ctx);
        prop_assert!((0.0..=1.0).contains(&score.score));
        for f in &score.factors {
            prop_assert!((0.0..=1.0).contains(&f.score));
        }
    }
}
