//! Property-based tests for interaction extraction and scoring.

use paintshop_core::{
    Coloring, Interaction, IsingModel, Sequence, interactions, paint_changes, solver,
};
use proptest::prelude::*;

/// Random valid sequence with 1-10 cars.
fn arb_sequence() -> impl Strategy<Value = Sequence> {
    (1_u32..=10, any::<u64>()).prop_map(|(cars, seed)| Sequence::random(cars, seed))
}

/// Sequence together with a coloring of matching width.
fn arb_colored_sequence() -> impl Strategy<Value = (Sequence, Coloring)> {
    arb_sequence().prop_flat_map(|seq| {
        let n = seq.num_cars();
        (
            Just(seq),
            prop::collection::vec(0_u8..=1, n)
                .prop_map(|colors| Coloring::from_colors(colors).unwrap()),
        )
    })
}

proptest! {
    #[test]
    fn one_interaction_per_boundary_between_distinct_cars(seq in arb_sequence()) {
        let count = seq.interactions().count();
        prop_assert_eq!(count, seq.len() - 1 - seq.adjacent_pairs());
    }

    #[test]
    fn every_interaction_joins_distinct_known_cars(seq in arb_sequence()) {
        for interaction in seq.interactions() {
            prop_assert_ne!(interaction.a, interaction.b);
            prop_assert!(seq.car_index(interaction.a).is_some());
            prop_assert!(seq.car_index(interaction.b).is_some());
        }
    }

    #[test]
    fn size_hint_bounds_actual_count(seq in arb_sequence()) {
        let iter = interactions(seq.as_slice());
        let (lower, upper) = iter.size_hint();
        let count = iter.count();
        prop_assert!(lower <= count);
        prop_assert!(upper.is_none_or(|u| count <= u));
    }

    #[test]
    fn reversal_mirrors_interactions(seq in arb_sequence()) {
        let mut expected: Vec<Interaction> = seq
            .interactions()
            .map(|i| Interaction { a: i.b, b: i.a, coupling: i.coupling })
            .collect();
        expected.reverse();
        let backward: Vec<Interaction> = seq.reversed().interactions().collect();
        prop_assert_eq!(backward, expected);
    }

    #[test]
    fn reversal_preserves_ising_model(seq in arb_sequence()) {
        let forward = IsingModel::from_sequence(&seq);
        let backward = IsingModel::from_sequence(&seq.reversed());
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn energy_identity_matches_direct_count((seq, coloring) in arb_colored_sequence()) {
        let model = IsingModel::from_sequence(&seq);
        prop_assert_eq!(
            model.color_changes(&coloring).unwrap(),
            paint_changes(&seq, &coloring).unwrap()
        );
    }

    #[test]
    fn flipping_all_colors_preserves_score((seq, coloring) in arb_colored_sequence()) {
        prop_assert_eq!(
            paint_changes(&seq, &coloring).unwrap(),
            paint_changes(&seq, &coloring.flipped()).unwrap()
        );
    }

    #[test]
    fn exhaustive_never_worse_than_greedy(seq in arb_sequence()) {
        let greedy = solver::greedy(&seq).unwrap();
        let best = solver::exhaustive(&seq).unwrap();
        prop_assert!(best.changes <= greedy.changes);
        prop_assert_eq!(best.changes, paint_changes(&seq, &best.coloring).unwrap());
    }

    #[test]
    fn bitstring_roundtrip((seq, coloring) in arb_colored_sequence()) {
        let bits = coloring.to_bitstring();
        prop_assert_eq!(Coloring::from_bitstring(&bits, seq.num_cars()).unwrap(), coloring);
    }
}
