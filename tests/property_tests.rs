//! Property-based tests for neighborhood components.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Distance metrics satisfy metric space properties
//! - Cached distances agree with direct evaluation
//! - Sparse and dense representations measure the same
//! - Top-k and co-sorting helpers agree with a full sort
//! - Recall is always in [0, 1]

use proptest::prelude::*;

use neighborhood::{
    ChebyshevDistance, CosineDistance, DistanceMetric, EuclideanDistance, ManhattanDistance,
    MinkowskiDistance, Vector,
};

prop_compose! {
    fn arb_dense(dim: usize)(values in prop::collection::vec(-10.0f64..10.0, dim)) -> Vector {
        Vector::dense(values)
    }
}

prop_compose! {
    /// A sparse vector together with the dense vector it encodes.
    fn arb_sparse(dim: usize)(
        entries in prop::collection::btree_map(0..dim, -10.0f64..10.0, 0..dim)
    ) -> (Vector, Vector) {
        let mut dense = vec![0.0; dim];
        for (&i, &x) in &entries {
            dense[i] = x;
        }
        let indices: Vec<usize> = entries.keys().copied().collect();
        let values: Vec<f64> = entries.values().copied().collect();
        let sparse = Vector::sparse(dim, indices, values).expect("btree keys are sorted");
        (sparse, Vector::dense(dense))
    }
}

fn metrics() -> Vec<Box<dyn DistanceMetric>> {
    vec![
        Box::new(EuclideanDistance),
        Box::new(CosineDistance),
        Box::new(ManhattanDistance),
        Box::new(ChebyshevDistance),
        Box::new(MinkowskiDistance::new(1.5).expect("valid p")),
    ]
}

mod metric_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn non_negative_and_symmetric(a in arb_dense(24), b in arb_dense(24)) {
            for m in metrics() {
                let ab = m.distance(&a, &b);
                let ba = m.distance(&b, &a);
                prop_assert!(ab >= 0.0, "{} gave {}", m.name(), ab);
                prop_assert!((ab - ba).abs() < 1e-9, "{}: {} vs {}", m.name(), ab, ba);
            }
        }

        #[test]
        fn identity_is_zero(a in arb_dense(16)) {
            for m in metrics() {
                prop_assert!(m.distance(&a, &a) < 1e-6, "{}", m.name());
            }
        }

        #[test]
        fn triangle_inequality(a in arb_dense(8), b in arb_dense(8), c in arb_dense(8)) {
            for m in metrics() {
                let ac = m.distance(&a, &c);
                let ab = m.distance(&a, &b);
                let bc = m.distance(&b, &c);
                prop_assert!(ac <= ab + bc + 1e-9, "{}: {} > {} + {}", m.name(), ac, ab, bc);
            }
        }

        #[test]
        fn cosine_distance_is_bounded(a in arb_dense(12), b in arb_dense(12)) {
            let d = CosineDistance.distance(&a, &b);
            prop_assert!((0.0..=1.0).contains(&d));
        }

        #[test]
        fn sparse_matches_dense((sa, da) in arb_sparse(20), (sb, db) in arb_sparse(20)) {
            for m in metrics() {
                let s = m.distance(&sa, &sb);
                let mixed = m.distance(&sa, &db);
                let d = m.distance(&da, &db);
                prop_assert!((s - d).abs() < 1e-9, "{}: sparse {} dense {}", m.name(), s, d);
                prop_assert!((mixed - d).abs() < 1e-9, "{}: mixed {} dense {}", m.name(), mixed, d);
            }
        }
    }
}

mod acceleration_props {
    use super::*;

    prop_compose! {
        /// A copy of `v` moved by at most `10^-exponent` per coordinate.
        fn near_copy(dim: usize)(
            base in arb_dense(dim),
            offsets in prop::collection::vec(-1.0f64..1.0, dim),
            exponent in 3i32..14,
        ) -> (Vector, Vector) {
            let scale = 10f64.powi(-exponent);
            let moved: Vec<f64> = base
                .to_dense()
                .iter()
                .zip(&offsets)
                .map(|(x, o)| x + o * scale)
                .collect();
            (base, Vector::dense(moved))
        }
    }

    fn assert_cached_matches_direct(
        data: &[Vector],
        query: &Vector,
        parallel: bool,
    ) -> Result<(), TestCaseError> {
        let metrics: Vec<Box<dyn DistanceMetric>> =
            vec![Box::new(EuclideanDistance), Box::new(CosineDistance)];
        for m in metrics {
            prop_assert!(m.supports_acceleration());
            let cache = m.build_cache(data, parallel);
            prop_assert_eq!(cache.len(), data.len());
            let info = m.query_info(query);
            for (i, v) in data.iter().enumerate() {
                let cached = m.distance_cached(i, query, &info, data, &cache);
                let direct = m.distance(v, query);
                prop_assert!(
                    (cached - direct).abs() < 1e-9,
                    "{}: cached {} direct {}", m.name(), cached, direct
                );
            }
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn cached_matches_direct(
            data in prop::collection::vec(arb_dense(10), 1..20),
            query in arb_dense(10),
            parallel in any::<bool>(),
        ) {
            assert_cached_matches_direct(&data, &query, parallel)?;
            // Every stored vector queried against itself.
            for v in &data {
                assert_cached_matches_direct(&data, v, parallel)?;
            }
        }

        #[test]
        fn cached_matches_direct_for_near_duplicates(
            (stored, query) in near_copy(10),
            others in prop::collection::vec(arb_dense(10), 0..5),
        ) {
            let mut data = others;
            data.push(stored);
            assert_cached_matches_direct(&data, &query, false)?;
        }
    }
}

mod structure_props {
    use super::*;
    use neighborhood::structures::{BoundedSortedList, IndexTable};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn bounded_list_keeps_smallest(
            items in prop::collection::vec(0u32..50, 0..100),
            capacity in 1usize..20,
        ) {
            let mut list = BoundedSortedList::new(capacity);
            for (i, &x) in items.iter().enumerate() {
                list.push((x, i));
            }
            let mut expected: Vec<(u32, usize)> =
                items.iter().copied().enumerate().map(|(i, x)| (x, i)).collect();
            expected.sort();
            expected.truncate(capacity);
            prop_assert_eq!(list.into_vec(), expected);
        }

        #[test]
        fn index_table_sorts_stably(keys in prop::collection::vec(0i32..10, 0..60)) {
            let table = IndexTable::new(&keys);
            prop_assert_eq!(table.len(), keys.len());
            let sorted = table.apply(&keys);
            prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
            for w in 0..table.len().saturating_sub(1) {
                let (i, j) = (table.index(w), table.index(w + 1));
                if keys[i] == keys[j] {
                    prop_assert!(i < j, "equal keys must keep input order");
                }
            }

            let mut in_place = keys.clone();
            table.apply_in_place(&mut in_place);
            prop_assert_eq!(in_place, sorted);
        }

        #[test]
        fn index_table_from_floats(keys in prop::collection::vec(-1e6f64..1e6, 0..60)) {
            let table = IndexTable::from_f64(&keys);
            let sorted = table.apply(&keys);
            prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

mod recall_props {
    use super::*;
    use neighborhood::eval::recall_at_k;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn recall_in_unit_interval(
            gt in prop::collection::vec(0usize..100, 0..20),
            found in prop::collection::vec(0usize..100, 0..20),
            k in 0usize..25,
        ) {
            let r = recall_at_k(&gt, &found, k);
            prop_assert!((0.0..=1.0).contains(&r), "recall {}", r);
        }

        #[test]
        fn self_recall_is_perfect(
            gt in prop::collection::btree_set(0usize..1000, 1..30),
        ) {
            let gt: Vec<usize> = gt.into_iter().collect();
            prop_assert_eq!(recall_at_k(&gt, &gt, gt.len()), 1.0);
        }
    }
}
