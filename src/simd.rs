//! Dense and sparse kernels over `f64` slices.
//!
//! Every distance in the crate bottoms out in one of these loops. They are
//! written so the compiler can auto-vectorize the dense paths.
//!
//! ```rust
//! use neighborhood::simd::{dot, norm};
//!
//! let a = [3.0, 4.0];
//! assert_eq!(dot(&a, &a), 25.0);
//! assert_eq!(norm(&a), 5.0);
//! ```

/// Dot product of two dense vectors.
#[inline]
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    // Four independent accumulators break the add dependency chain.
    let mut acc = [0.0f64; 4];
    let chunks_a = a.chunks_exact(4);
    let chunks_b = b.chunks_exact(4);
    let tail: f64 = chunks_a
        .remainder()
        .iter()
        .zip(chunks_b.remainder())
        .map(|(x, y)| x * y)
        .sum();
    for (ca, cb) in chunks_a.zip(chunks_b) {
        acc[0] += ca[0] * cb[0];
        acc[1] += ca[1] * cb[1];
        acc[2] += ca[2] * cb[2];
        acc[3] += ca[3] * cb[3];
    }
    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

/// L2 norm of a vector.
#[inline]
#[must_use]
pub fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// L2 distance squared.
#[inline]
#[must_use]
pub fn l2_distance_squared(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

// ─────────────────────────────────────────────────────────────────────────────
// Sparse operations
// ─────────────────────────────────────────────────────────────────────────────

/// Sparse dot product using sorted index arrays.
///
/// Indices must be strictly increasing on both sides.
#[inline]
#[must_use]
pub fn sparse_dot(a_indices: &[usize], a_values: &[f64], b_indices: &[usize], b_values: &[f64]) -> f64 {
    let mut i = 0;
    let mut j = 0;
    let mut result = 0.0;

    while i < a_indices.len() && j < b_indices.len() {
        if a_indices[i] < b_indices[j] {
            i += 1;
        } else if a_indices[i] > b_indices[j] {
            j += 1;
        } else {
            result += a_values[i] * b_values[j];
            i += 1;
            j += 1;
        }
    }

    result
}

/// Dot product of a sparse vector against a dense one.
#[inline]
#[must_use]
pub fn sparse_dense_dot(indices: &[usize], values: &[f64], dense: &[f64]) -> f64 {
    indices
        .iter()
        .zip(values)
        .map(|(&i, &v)| v * dense[i])
        .sum()
}
