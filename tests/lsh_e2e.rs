//! End-to-end tests validating Random Projection LSH actually works.
//!
//! LSH distances are approximate, so quality is measured as recall against
//! exact cosine search, never as exact equality.

mod common;

use common::{sparse_vectors, unit_vectors};
use neighborhood::eval::{indices, mean_recall};
use neighborhood::{
    CosineDistance, EuclideanDistance, LshParams, ManhattanDistance, ProjectionStorage,
    RandomProjectionLsh, SearchError, Vector, VectorArray, VectorCollection,
};

const K: usize = 10;

fn recall_against_exact(params: LshParams, data: Vec<Vector>) -> f64 {
    let exact = VectorArray::with_vectors(data.clone(), Box::new(CosineDistance), false)
        .expect("build exact");
    let lsh = RandomProjectionLsh::with_vectors(params, data.clone(), true).expect("build lsh");

    let mut truths = Vec::new();
    let mut found = Vec::new();
    for q in &data {
        truths.push(indices(&exact.search_knn(q, K).expect("exact search")));
        found.push(indices(&lsh.search_knn(q, K).expect("lsh search")));
    }
    mean_recall(&truths, &found, K)
}

#[test]
fn recall_exceeds_floor_with_512_bit_signatures() {
    let params = LshParams {
        signature_bits: 512,
        ..LshParams::default()
    };
    let recall = recall_against_exact(params, unit_vectors(300, 16, 11));
    assert!(recall > 0.5, "mean recall@{K} = {recall:.3}");
}

#[test]
fn pooled_projection_recall_exceeds_floor() {
    let params = LshParams {
        signature_bits: 512,
        projection: ProjectionStorage::Pooled { pool_size: 1000 },
        seed: 7,
    };
    let recall = recall_against_exact(params, unit_vectors(300, 16, 12));
    assert!(recall > 0.5, "mean recall@{K} = {recall:.3}");
}

#[test]
fn longer_signatures_do_not_hurt_recall_much() {
    let data = unit_vectors(200, 16, 13);
    let short = recall_against_exact(
        LshParams {
            signature_bits: 64,
            ..LshParams::default()
        },
        data.clone(),
    );
    let long = recall_against_exact(
        LshParams {
            signature_bits: 1024,
            ..LshParams::default()
        },
        data,
    );
    assert!(long + 0.05 >= short, "64 bits: {short:.3}, 1024 bits: {long:.3}");
}

#[test]
fn non_cosine_metrics_are_configuration_errors() {
    let mut lsh = RandomProjectionLsh::new(LshParams::default()).expect("params");
    for metric in [
        Box::new(EuclideanDistance) as Box<dyn neighborhood::DistanceMetric>,
        Box::new(ManhattanDistance),
    ] {
        let err = lsh
            .build(unit_vectors(10, 4, 1), metric, false)
            .expect_err("must reject");
        assert!(matches!(err, SearchError::IncompatibleMetric { .. }), "{err}");
    }
}

#[test]
fn reprojection_yields_identical_signatures() {
    let data = unit_vectors(50, 24, 14);
    let lsh = RandomProjectionLsh::with_vectors(LshParams::default(), data.clone(), false)
        .expect("build");
    let rebuilt = RandomProjectionLsh::with_vectors(LshParams::default(), data.clone(), true)
        .expect("build");
    for (i, v) in data.iter().enumerate() {
        let again = lsh.signature_of(v).expect("query").expect("built");
        assert_eq!(lsh.signature(i), Some(again.as_slice()));
        assert_eq!(lsh.signature(i), rebuilt.signature(i));
    }
}

#[test]
fn reported_distances_approximate_cosine_distance() {
    let data = unit_vectors(100, 16, 15);
    let params = LshParams {
        signature_bits: 1024,
        ..LshParams::default()
    };
    let lsh = RandomProjectionLsh::with_vectors(params, data.clone(), false).expect("build");
    let exact = VectorArray::with_vectors(data.clone(), Box::new(CosineDistance), false)
        .expect("build");

    let mut total_error = 0.0;
    let mut count = 0;
    for q in data.iter().take(10) {
        let approx = lsh.search_knn(q, 100).expect("search");
        let truth = exact.search_knn(q, 100).expect("search");
        for n in &approx {
            let t = truth.iter().find(|t| t.index == n.index).expect("same set");
            total_error += (n.distance - t.distance).abs();
            count += 1;
        }
    }
    let mean_error = total_error / f64::from(count);
    assert!(mean_error < 0.05, "mean absolute error {mean_error:.4}");
}

#[test]
fn radius_search_is_sorted_and_bounded() {
    let data = unit_vectors(200, 16, 16);
    let lsh = RandomProjectionLsh::with_vectors(LshParams::default(), data.clone(), false)
        .expect("build");
    for q in data.iter().take(20) {
        let hits = lsh.search_radius(q, 0.5).expect("search");
        assert!(!hits.is_empty(), "a stored vector is within any radius of itself");
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(hits.iter().all(|n| n.distance <= 0.5 + 1e-9));
    }
}

#[test]
fn sparse_and_dense_inputs_share_signatures() {
    let sparse = sparse_vectors(40, 64, 0.1, 17);
    let dense: Vec<Vector> = sparse.iter().map(|v| Vector::dense(v.to_dense())).collect();
    for projection in [
        ProjectionStorage::Materialized,
        ProjectionStorage::Pooled { pool_size: 256 },
    ] {
        let params = LshParams {
            projection,
            ..LshParams::default()
        };
        let a = RandomProjectionLsh::with_vectors(params, sparse.clone(), false).expect("build");
        let b = RandomProjectionLsh::with_vectors(params, dense.clone(), false).expect("build");
        for i in 0..sparse.len() {
            assert_eq!(a.signature(i), b.signature(i));
        }
    }
}

#[test]
fn invalid_queries_are_rejected() {
    let lsh = RandomProjectionLsh::with_vectors(LshParams::default(), unit_vectors(10, 8, 18), false)
        .expect("build");
    let q = Vector::dense(vec![1.0; 8]);
    assert!(matches!(lsh.search_knn(&q, 0), Err(SearchError::InvalidParameter(_))));
    assert!(matches!(lsh.search_radius(&q, -0.1), Err(SearchError::InvalidParameter(_))));
    assert!(matches!(
        lsh.search_knn(&Vector::dense(vec![1.0; 9]), 1),
        Err(SearchError::DimensionMismatch { expected: 8, actual: 9 })
    ));
}
