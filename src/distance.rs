//! Distance metrics and their acceleration caches.
//!
//! A [`DistanceMetric`] computes a distance between two [`Vector`]s. Metrics
//! whose cost is dominated by a dot product can also precompute per-vector
//! scalars (an *acceleration cache*) so that repeated evaluations against the
//! same collection only pay for the dot product:
//!
//! 1. [`DistanceMetric::build_cache`] runs once when a collection is built.
//! 2. [`DistanceMetric::query_info`] runs once per query.
//! 3. [`DistanceMetric::distance_cached`] runs once per (query, stored vector)
//!    pair and must return the same value as [`DistanceMetric::distance`].
//!
//! ## Cosine scaling
//!
//! [`CosineDistance`] is `sqrt((1 - cos(a,b)) / 2)`, which lies in `[0, 1]`
//! and satisfies the triangle inequality (it is half the chord length between
//! the normalized vectors). Use [`cosine_to_distance`] and
//! [`distance_to_cosine`] to move between the two scales.

use rayon::prelude::*;

use crate::error::{Result, SearchError};
use crate::simd;
use crate::vector::Vector;

/// A distance function over vectors of equal length.
///
/// Implementations are shared read-only across query threads.
pub trait DistanceMetric: std::fmt::Debug + Send + Sync {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &Vector, b: &Vector) -> f64;

    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Whether this metric belongs to the cosine family.
    fn is_cosine(&self) -> bool {
        false
    }

    /// Whether the cache methods below do anything useful.
    fn supports_acceleration(&self) -> bool {
        false
    }

    /// Precompute per-vector values, aligned with `vectors`.
    fn build_cache(&self, _vectors: &[Vector], _parallel: bool) -> Vec<f64> {
        Vec::new()
    }

    /// Precompute values for a single query vector.
    fn query_info(&self, _query: &Vector) -> Vec<f64> {
        Vec::new()
    }

    /// Distance between `vectors[index]` and `query` using the cached values.
    fn distance_cached(
        &self,
        index: usize,
        query: &Vector,
        _query_info: &[f64],
        vectors: &[Vector],
        _cache: &[f64],
    ) -> f64 {
        self.distance(&vectors[index], query)
    }
}

/// Map each vector to one cached scalar, optionally on the rayon pool.
fn per_vector_cache(vectors: &[Vector], parallel: bool, f: impl Fn(&Vector) -> f64 + Sync) -> Vec<f64> {
    if parallel {
        vectors.par_iter().map(&f).collect()
    } else {
        vectors.iter().map(f).collect()
    }
}

/// Cosine similarities this close to 1 are rounding noise from
/// `a·b / (||a|| ||b||)` on parallel vectors and map to distance 0.
const COSINE_ONE_TOLERANCE: f64 = 8.0 * f64::EPSILON;

/// Convert a cosine similarity to a [`CosineDistance`] value.
///
/// The square root would turn a few ulps of error in `cos` into distances
/// near 1e-8, so `cos` within a few ulps of 1 yields exactly 0.
#[inline]
#[must_use]
pub fn cosine_to_distance(cos: f64) -> f64 {
    let cos = cos.clamp(-1.0, 1.0);
    if cos >= 1.0 - COSINE_ONE_TOLERANCE {
        return 0.0;
    }
    (0.5 * (1.0 - cos)).sqrt()
}

/// Convert a [`CosineDistance`] value back to a cosine similarity.
#[inline]
#[must_use]
pub fn distance_to_cosine(distance: f64) -> f64 {
    (1.0 - 2.0 * distance * distance).clamp(-1.0, 1.0)
}

/// Euclidean (L2) distance.
///
/// Caches `||v||²` so that `||a - b||² = ||a||² + ||b||² - 2 a·b`. That
/// identity cancels badly for near-duplicates, so when the cached result is
/// tiny relative to the norms the distance is recomputed directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

/// Cached squared distances below this fraction of `||a||² + ||b||²` are
/// dominated by cancellation error.
const EUCLIDEAN_CANCELLATION_RATIO: f64 = 1e-6;

impl DistanceMetric for EuclideanDistance {
    fn distance(&self, a: &Vector, b: &Vector) -> f64 {
        if let (Vector::Dense(a), Vector::Dense(b)) = (a, b) {
            return simd::l2_distance_squared(a, b).sqrt();
        }
        let mut sum = 0.0;
        a.for_each_diff(b, |d| sum += d * d);
        sum.sqrt()
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn supports_acceleration(&self) -> bool {
        true
    }

    fn build_cache(&self, vectors: &[Vector], parallel: bool) -> Vec<f64> {
        per_vector_cache(vectors, parallel, Vector::norm_squared)
    }

    fn query_info(&self, query: &Vector) -> Vec<f64> {
        vec![query.norm_squared()]
    }

    fn distance_cached(
        &self,
        index: usize,
        query: &Vector,
        query_info: &[f64],
        vectors: &[Vector],
        cache: &[f64],
    ) -> f64 {
        let norms = cache[index] + query_info[0];
        let squared = norms - 2.0 * vectors[index].dot(query);
        if squared <= EUCLIDEAN_CANCELLATION_RATIO * norms {
            return self.distance(&vectors[index], query);
        }
        squared.sqrt()
    }
}

/// Cosine distance `sqrt((1 - cos(a,b)) / 2)`.
///
/// Norms are computed, so inputs need not be normalized. A zero vector has
/// cosine similarity 0 with everything. Caches `||v||`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineDistance;

impl CosineDistance {
    fn from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
        let denom = norm_a * norm_b;
        let cos = if denom > 0.0 { dot / denom } else { 0.0 };
        cosine_to_distance(cos)
    }
}

impl DistanceMetric for CosineDistance {
    fn distance(&self, a: &Vector, b: &Vector) -> f64 {
        Self::from_parts(a.dot(b), a.norm(), b.norm())
    }

    fn name(&self) -> &'static str {
        "cosine"
    }

    fn is_cosine(&self) -> bool {
        true
    }

    fn supports_acceleration(&self) -> bool {
        true
    }

    fn build_cache(&self, vectors: &[Vector], parallel: bool) -> Vec<f64> {
        per_vector_cache(vectors, parallel, Vector::norm)
    }

    fn query_info(&self, query: &Vector) -> Vec<f64> {
        vec![query.norm()]
    }

    fn distance_cached(
        &self,
        index: usize,
        query: &Vector,
        query_info: &[f64],
        vectors: &[Vector],
        cache: &[f64],
    ) -> f64 {
        Self::from_parts(vectors[index].dot(query), cache[index], query_info[0])
    }
}

/// Cosine distance for **L2-normalized** vectors.
///
/// Same scale as [`CosineDistance`] but skips the norms, so it returns
/// nonsense if inputs are not unit length.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedCosineDistance;

impl DistanceMetric for NormalizedCosineDistance {
    fn distance(&self, a: &Vector, b: &Vector) -> f64 {
        cosine_to_distance(a.dot(b))
    }

    fn name(&self) -> &'static str {
        "normalized-cosine"
    }

    fn is_cosine(&self) -> bool {
        true
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl DistanceMetric for ManhattanDistance {
    fn distance(&self, a: &Vector, b: &Vector) -> f64 {
        let mut sum = 0.0;
        a.for_each_diff(b, |d| sum += d.abs());
        sum
    }

    fn name(&self) -> &'static str {
        "manhattan"
    }
}

/// Chebyshev (L∞) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevDistance;

impl DistanceMetric for ChebyshevDistance {
    fn distance(&self, a: &Vector, b: &Vector) -> f64 {
        let mut max = 0.0f64;
        a.for_each_diff(b, |d| max = max.max(d.abs()));
        max
    }

    fn name(&self) -> &'static str {
        "chebyshev"
    }
}

/// Minkowski (Lp) distance for `p >= 1`.
#[derive(Debug, Clone, Copy)]
pub struct MinkowskiDistance {
    p: f64,
}

impl MinkowskiDistance {
    /// Create an Lp distance. `p` below 1 is not a metric and is rejected.
    pub fn new(p: f64) -> Result<Self> {
        if p.is_nan() || p < 1.0 || p.is_infinite() {
            return Err(SearchError::InvalidParameter(format!(
                "minkowski p must be a finite value >= 1, got {p}"
            )));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl DistanceMetric for MinkowskiDistance {
    fn distance(&self, a: &Vector, b: &Vector) -> f64 {
        let mut sum = 0.0;
        a.for_each_diff(b, |d| sum += d.abs().powf(self.p));
        sum.powf(1.0 / self.p)
    }

    fn name(&self) -> &'static str {
        "minkowski"
    }
}
