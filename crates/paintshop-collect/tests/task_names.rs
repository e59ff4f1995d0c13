//! Property-based tests for task naming.

use std::collections::{BTreeMap, BTreeSet};

use paintshop_collect::{Task, experiment_of};
use proptest::prelude::*;

proptest! {
    #[test]
    fn names_are_path_safe(
        params in prop::collection::btree_map("[a-z]{1,6}", any::<String>(), 0..5)
    ) {
        let name = Task::new("exp", params).unwrap().name().unwrap();
        prop_assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '=' | '-')));
        prop_assert_eq!(experiment_of(&name), "exp");
    }

    #[test]
    fn names_ignore_insertion_order(
        pairs in prop::collection::vec(("[a-z]{1,6}", -1e6_f64..1e6), 1..6)
    ) {
        let unique: BTreeSet<&String> = pairs.iter().map(|(k, _)| k).collect();
        prop_assume!(unique.len() == pairs.len());

        let forward: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::json!(v)))
            .collect();
        let backward: BTreeMap<String, f64> = pairs.iter().rev().cloned().collect();

        prop_assert_eq!(
            Task::new("exp", forward).unwrap().name().unwrap(),
            Task::new("exp", backward).unwrap().name().unwrap()
        );
    }
}
