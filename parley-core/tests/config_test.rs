use parley_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = ParleyConfig::from_toml("").unwrap();

    // Engine defaults
    assert_eq!(config.engine.max_suggestions, 5);
    assert_eq!(config.engine.global_deadline_ms, 2_000);

    // Gateway defaults
    assert_eq!(config.gateway.per_provider_timeout_ms, 800);
    assert_eq!(config.gateway.provider_priority_tiers.len(), 3);
    assert_eq!(config.gateway.provider_priority_tiers[0], vec!["neural"]);
    assert!(!config.gateway.short_circuit.enabled);

    // Ranking defaults
    assert_eq!(config.ranking.consensus_boost, 0.1);
    assert_eq!(config.ranking.fallback_confidence, 0.5);

    // Learning defaults
    assert_eq!(config.learning.learning_rate, 0.05);
    assert_eq!(config.learning.default_weight, 1.0);

    // Cache defaults
    assert_eq!(config.cache.capacity, 1_000);
    assert_eq!(config.cache.ttl_ms, 300_000);

    // Context defaults
    assert_eq!(config.context.window_capacity, 10);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");

    assert!(config.validate().is_ok());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[engine]
max_suggestions = 3

[gateway]
per_provider_timeout_ms = 250
provider_priority_tiers = [["neural", "predictive"], ["pattern"]]

[gateway.short_circuit]
enabled = true
threshold = 4
"#;
    let config = ParleyConfig::from_toml(toml).unwrap();
    assert_eq!(config.engine.max_suggestions, 3);
    // Non-overridden fields keep defaults
    assert_eq!(config.engine.global_deadline_ms, 2_000);
    assert_eq!(config.gateway.per_provider_timeout_ms, 250);
    assert_eq!(config.gateway.provider_priority_tiers[0], vec!["neural", "predictive"]);
    assert!(config.gateway.short_circuit.enabled);
    assert_eq!(config.gateway.short_circuit.threshold, 4);
    assert_eq!(config.cache.capacity, 1_000);
}

#[test]
fn config_serde_roundtrip() {
    let config = ParleyConfig::default();
    let toml_str = config.to_toml().unwrap();
    let roundtripped = ParleyConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.engine.max_suggestions, config.engine.max_suggestions);
    assert_eq!(
        roundtripped.gateway.provider_priority_tiers,
        config.gateway.provider_priority_tiers
    );
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = ParleyConfig::from_toml("[engine\nmax_suggestions = ").unwrap_err();
    assert!(matches!(err, parley_core::ParleyError::ConfigError(_)));
}

#[test]
fn validate_rejects_zero_max_suggestions() {
    let mut config = ParleyConfig::default();
    config.engine.max_suggestions = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_duplicate_provider_across_tiers() {
    let mut config = ParleyConfig::default();
    config.gateway.provider_priority_tiers =
        vec![vec!["neural".into()], vec!["pattern".into(), "neural".into()]];
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("neural"));
}

#[test]
fn validate_rejects_learning_rate_out_of_range() {
    let mut config = ParleyConfig::default();
    config.learning.learning_rate = 0.0;
    assert!(config.validate().is_err());
    config.learning.learning_rate = 1.5;
    assert!(config.validate().is_err());
    config.learning.learning_rate = 1.0;
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_consensus_boost_above_one() {
    let mut config = ParleyConfig::default();
    config.ranking.consensus_boost = 1.2;
    assert!(config.validate().is_err());
}

#[test]
fn duration_helpers_match_millisecond_fields() {
    let config = ParleyConfig::default();
    assert_eq!(config.per_provider_timeout().as_millis(), 800);
    assert_eq!(config.global_deadline().as_millis(), 2_000);
    assert_eq!(config.cache_ttl().as_millis(), 300_000);
}
