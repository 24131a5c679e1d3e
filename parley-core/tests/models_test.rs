use parley_core::models::*;
use proptest::prelude::*;

#[test]
fn suggestion_builder_sets_all_fields() {
    let s = Suggestion::new("Sounds good", 0.8, SuggestionSource::Neural)
        .with_reasoning("mirrors partner tone")
        .with_relevance(0.6)
        .with_alternatives(vec!["Sure".into()]);
    assert_eq!(s.text, "Sounds good");
    assert_eq!(s.confidence.value(), 0.8);
    assert_eq!(s.reasoning, "mirrors partner tone");
    assert_eq!(s.context_relevance, 0.6);
    assert_eq!(s.alternatives, vec!["Sure".to_string()]);
}

#[test]
fn suggestion_serializes_confidence_as_number() {
    let s = Suggestion::new("Hi", 0.4, SuggestionSource::Pattern);
    let value = serde_json::to_value(&s).unwrap();
    assert_eq!(value["confidence"], serde_json::json!(0.4));
    assert_eq!(value["source"], serde_json::json!("pattern"));
}

#[test]
fn profile_weight_defaults_when_unknown() {
    let mut profile = UserProfile::new("u1");
    assert_eq!(profile.weight_for("neural", 1.0), 1.0);
    profile.provider_weights.insert("neural".into(), 0.7);
    assert_eq!(profile.weight_for("neural", 1.0), 0.7);
}

#[test]
fn profile_formality_falls_back_to_personality() {
    let profile = UserProfile::new("u1").with_personality(PersonalityType::Professional);
    assert_eq!(profile.effective_formality(), 0.9);
    let mut tuned = profile.clone();
    tuned.formality = Some(0.2);
    assert_eq!(tuned.effective_formality(), 0.2);
}

#[test]
fn profile_roundtrips_through_json() {
    let mut profile = UserProfile::new("u1").with_personality(PersonalityType::Friendly);
    profile.provider_weights.insert("neural".into(), 0.75);
    profile.proficiency.insert("es".into(), 0.4);
    let json = serde_json::to_vec(&profile).unwrap();
    let back: UserProfile = serde_json::from_slice(&json).unwrap();
    assert_eq!(back, profile);
}

#[test]
fn alignment_score_is_mean_of_factors() {
    let score = AlignmentScore::from_factors(vec![
        AlignmentFactor { name: "mood".into(), score: 0.9 },
        AlignmentFactor { name: "formality".into(), score: 0.5 },
    ]);
    assert!((score.score - 0.7).abs() < 1e-12);
    assert_eq!(AlignmentScore::from_factors(vec![]).score, 0.5);
}

#[test]
fn request_message_carries_source_language() {
    let req = SuggestionRequest::new("u1", "c1", "Hello", "es").with_source_language("en");
    let msg = req.to_message();
    assert_eq!(msg.speaker, Speaker::User);
    assert_eq!(msg.language.as_deref(), Some("en"));
}

#[test]
fn feedback_constructors() {
    let yes = Feedback::accepted("u1", "neural").with_source(SuggestionSource::Neural);
    let no = Feedback::rejected("u1", "neural");
    assert!(yes.accepted);
    assert!(!no.accepted);
    assert_eq!(no.provider_id, "neural");
}

proptest! {
    #[test]
    fn confidence_always_in_unit_interval(v in proptest::num::f64::ANY) {
        let c = Confidence::new(v).value();
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn relevance_always_in_unit_interval(v in -10.0f64..10.0) {
        let s = Suggestion::new("x", 0.5, SuggestionSource::Neural).with_relevance(v);
        prop_assert!((0.0..=1.0).contains(&s.context_relevance));
    }

    #[test]
    fn normalization_is_idempotent(s in ".{0,60}") {
        let once = normalize_text(&s);
        prop_assert_eq!(normalize_text(&once), once);
    }
}
