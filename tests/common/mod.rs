//! Shared data generators for integration tests.

#![allow(dead_code)]

use neighborhood::{DistanceMetric, Neighbor, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// `n` vectors with coordinates uniform in [-1, 1).
pub fn random_vectors(n: usize, dim: usize, seed: u64) -> Vec<Vector> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Vector::dense((0..dim).map(|_| rng.random_range(-1.0..1.0)).collect()))
        .collect()
}

/// `n` vectors drawn uniformly from the unit sphere.
pub fn unit_vectors(n: usize, dim: usize, seed: u64) -> Vec<Vector> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let v: Vec<f64> = (0..dim).map(|_| rng.sample(StandardNormal)).collect();
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            Vector::dense(v.into_iter().map(|x| x / norm).collect())
        })
        .collect()
}

/// `n` sparse vectors with roughly `density` of their coordinates set.
pub fn sparse_vectors(n: usize, dim: usize, density: f64, seed: u64) -> Vec<Vector> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut indices = Vec::new();
            let mut values = Vec::new();
            for i in 0..dim {
                if rng.random_bool(density) {
                    indices.push(i);
                    values.push(rng.random_range(-1.0..1.0));
                }
            }
            Vector::sparse(dim, indices, values).expect("indices are sorted")
        })
        .collect()
}

/// Exact neighbours by linear scan with `metric.distance`, ties by index.
pub fn linear_scan(metric: &dyn DistanceMetric, data: &[Vector], query: &Vector) -> Vec<Neighbor> {
    let mut all: Vec<Neighbor> = data
        .iter()
        .enumerate()
        .map(|(i, v)| Neighbor::new(i, metric.distance(v, query)))
        .collect();
    all.sort();
    all
}
