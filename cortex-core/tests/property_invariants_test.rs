use chrono::Utc;
use proptest::prelude::*;
use std::collections::HashMap;

use cortex_core::models::{Belief, BeliefRelationship, CategoryLabel, RelationshipType};

fn category_strategy() -> impl Strategy<Value = CategoryLabel> {
    ("[a-zA-Z]{3,10}", 0.0f64..=1.0).prop_map(|(primary, confidence)| CategoryLabel {
        primary,
        secondary: None,
        tags: Default::default(),
        confidence,
    })
}

proptest! {
    /// For all beliefs, confidence stays in [0,1] no matter how many
    /// reinforcements or weakenings are applied.
    #[test]
    fn belief_confidence_always_in_unit_interval(
        initial in 0.0f64..=1.0,
        ops in prop::collection::vec((prop::bool::ANY, 0.0f64..=1.0, 0.0f64..=1.0), 0..50),
        category in category_strategy(),
    ) {
        let now = Utc::now();
        let mut belief = Belief::new(
            "b".into(),
            "agent".into(),
            "statement".into(),
            initial,
            Some(category),
            now,
            "m0".into(),
        );
        let before_count = belief.reinforcement_count;
        let mut reinforcements = 0u64;
        for (reinforce, evidence_confidence, rate) in ops {
            if reinforce {
                belief.reinforce(evidence_confidence, rate.max(0.01), now);
                reinforcements += 1;
            } else {
                belief.weaken(evidence_confidence, rate.max(0.01), now);
            }
            prop_assert!(belief.confidence >= 0.0 && belief.confidence <= 1.0);
        }
        prop_assert_eq!(belief.reinforcement_count, before_count + reinforcements);
    }

    /// Relationship strength stays in [0,1] even for out-of-range input.
    #[test]
    fn relationship_strength_is_clamped(strength in -5.0f64..5.0) {
        let now = Utc::now();
        let relationship = BeliefRelationship::new(
            "r".into(),
            "b1".into(),
            "b2".into(),
            "agent".into(),
            RelationshipType::Supports,
            strength,
            HashMap::new(),
            now,
        )
        .unwrap();
        prop_assert!(relationship.strength >= 0.0 && relationship.strength <= 1.0);
    }

    /// source == target is always rejected, for any pair of equal ids.
    #[test]
    fn relationship_self_loop_always_rejected(id in "[a-zA-Z0-9]{1,12}") {
        let now = Utc::now();
        let result = BeliefRelationship::new(
            "r".into(),
            id.clone(),
            id,
            "agent".into(),
            RelationshipType::RelatesTo,
            0.5,
            HashMap::new(),
            now,
        );
        prop_assert!(result.is_err());
    }
}
