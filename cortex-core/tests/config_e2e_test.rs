use cortex_core::config::{CortexConfig, DuplicateEdgePolicy, ResolutionStrategy, VectorStrategyMode};

#[test]
fn default_config_matches_documented_defaults() {
    let config = CortexConfig::default();

    assert_eq!(config.similarity.threshold, 0.7);
    assert_eq!(config.similarity.max_results, 10_000);
    assert_eq!(config.similarity.vector_strategy, VectorStrategyMode::Auto);

    assert_eq!(config.belief.reinforce_threshold, 0.75);
    assert_eq!(config.belief.reinforce_alpha, 0.3);
    assert_eq!(config.belief.weaken_beta, 0.2);
    assert_eq!(config.belief.default_resolution, ResolutionStrategy::NewerWins);

    assert!(config.forgetting.weights.is_normalized());
    assert_eq!(config.forgetting.recency_tau_days, 30.0);

    assert_eq!(config.graph.snapshot_cap, 1000);
    assert_eq!(config.graph.max_traversal_nodes, 10_000);
    assert_eq!(config.graph.duplicate_edge_policy, DuplicateEdgePolicy::UpgradeStrength);
}

#[test]
fn toml_round_trip_fills_in_missing_fields_with_defaults() {
    let toml_str = r#"
        [belief]
        reinforce_threshold = 0.9

        [belief.resolution]
        preference = "keep_both_flag"
    "#;

    let config = CortexConfig::from_toml(toml_str).expect("valid toml");
    assert_eq!(config.belief.reinforce_threshold, 0.9);
    assert_eq!(
        config.belief.resolution_for("preference"),
        ResolutionStrategy::KeepBothFlag
    );
    // Untouched category falls back to the configured default.
    assert_eq!(
        config.belief.resolution_for("other"),
        ResolutionStrategy::NewerWins
    );
    // Subsystems not mentioned in the TOML still get their defaults.
    assert_eq!(config.similarity.threshold, 0.7);
    assert_eq!(config.graph.snapshot_cap, 1000);
}

#[test]
fn empty_toml_is_equivalent_to_default() {
    let config = CortexConfig::from_toml("").expect("empty toml is valid");
    assert_eq!(config.similarity.threshold, CortexConfig::default().similarity.threshold);
}
