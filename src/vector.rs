//! Dense and sparse vectors.
//!
//! A [`Vector`] has a fixed logical length. Dense vectors materialize every
//! coordinate; sparse vectors keep only the non-zero `(index, value)` pairs,
//! sorted by index so lookups can binary search.

use std::iter::Peekable;

use crate::error::{Result, SearchError};
use crate::simd;

/// A vector of `f64` coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Dense(Vec<f64>),
    Sparse(SparseVector),
}

/// Sparse storage: sorted indices with their values.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    len: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Create a sparse vector of logical length `len`.
    ///
    /// `indices` must be strictly increasing and below `len`, and must pair
    /// up with `values`.
    pub fn new(len: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(SearchError::InvalidSparseVector(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some(w) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SearchError::InvalidSparseVector(format!(
                "indices not strictly increasing at {} -> {}",
                w[0], w[1]
            )));
        }
        if let Some(&last) = indices.last() {
            if last >= len {
                return Err(SearchError::InvalidSparseVector(format!(
                    "index {last} out of range for length {len}"
                )));
            }
        }
        Ok(Self {
            len,
            indices,
            values,
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Vector {
    /// Wrap a dense coordinate buffer.
    pub fn dense(values: Vec<f64>) -> Self {
        Vector::Dense(values)
    }

    /// Build a sparse vector; see [`SparseVector::new`].
    pub fn sparse(len: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        SparseVector::new(len, indices, values).map(Vector::Sparse)
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        match self {
            Vector::Dense(v) => v.len(),
            Vector::Sparse(s) => s.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Vector::Sparse(_))
    }

    /// Coordinate `i`, or `None` past the end.
    pub fn get(&self, i: usize) -> Option<f64> {
        match self {
            Vector::Dense(v) => v.get(i).copied(),
            Vector::Sparse(s) if i < s.len => Some(
                s.indices
                    .binary_search(&i)
                    .map_or(0.0, |pos| s.values[pos]),
            ),
            Vector::Sparse(_) => None,
        }
    }

    /// Number of stored non-zero coordinates.
    pub fn nnz(&self) -> usize {
        match self {
            Vector::Dense(v) => v.iter().filter(|x| **x != 0.0).count(),
            Vector::Sparse(s) => s.values.iter().filter(|x| **x != 0.0).count(),
        }
    }

    /// Iterate `(index, value)` over non-zero coordinates in index order.
    pub fn iter_nonzero(&self) -> Box<dyn Iterator<Item = (usize, f64)> + '_> {
        match self {
            Vector::Dense(v) => Box::new(
                v.iter()
                    .copied()
                    .enumerate()
                    .filter(|(_, x)| *x != 0.0),
            ),
            Vector::Sparse(s) => Box::new(
                s.indices
                    .iter()
                    .copied()
                    .zip(s.values.iter().copied())
                    .filter(|(_, x)| *x != 0.0),
            ),
        }
    }

    /// Inner product. Lengths must match.
    pub fn dot(&self, other: &Vector) -> f64 {
        debug_assert_eq!(self.len(), other.len());
        match (self, other) {
            (Vector::Dense(a), Vector::Dense(b)) => simd::dot(a, b),
            (Vector::Dense(d), Vector::Sparse(s)) | (Vector::Sparse(s), Vector::Dense(d)) => {
                simd::sparse_dense_dot(&s.indices, &s.values, d)
            }
            (Vector::Sparse(a), Vector::Sparse(b)) => {
                simd::sparse_dot(&a.indices, &a.values, &b.indices, &b.values)
            }
        }
    }

    pub fn norm_squared(&self) -> f64 {
        match self {
            Vector::Dense(v) => simd::dot(v, v),
            Vector::Sparse(s) => simd::dot(&s.values, &s.values),
        }
    }

    pub fn norm(&self) -> f64 {
        match self {
            Vector::Dense(v) => simd::norm(v),
            Vector::Sparse(s) => simd::norm(&s.values),
        }
    }

    /// Call `f(a_i - b_i)` for every position where either vector may be
    /// non-zero. Positions where both are zero are skipped, so `f` must
    /// treat a difference of zero as contributing nothing.
    pub fn for_each_diff(&self, other: &Vector, mut f: impl FnMut(f64)) {
        debug_assert_eq!(self.len(), other.len());
        match (self, other) {
            (Vector::Dense(a), Vector::Dense(b)) => {
                a.iter().zip(b).for_each(|(x, y)| f(x - y));
            }
            _ => {
                let mut a = self.iter_nonzero().peekable();
                let mut b = other.iter_nonzero().peekable();
                merge_diff(&mut a, &mut b, &mut f);
            }
        }
    }

    /// Materialize every coordinate.
    pub fn to_dense(&self) -> Vec<f64> {
        match self {
            Vector::Dense(v) => v.clone(),
            Vector::Sparse(s) => {
                let mut out = vec![0.0; s.len];
                for (&i, &v) in s.indices.iter().zip(&s.values) {
                    out[i] = v;
                }
                out
            }
        }
    }
}

fn merge_diff<A, B>(a: &mut Peekable<A>, b: &mut Peekable<B>, f: &mut impl FnMut(f64))
where
    A: Iterator<Item = (usize, f64)>,
    B: Iterator<Item = (usize, f64)>,
{
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (Some((ia, va)), Some((ib, vb))) => {
                if ia < ib {
                    f(va);
                    a.next();
                } else if ib < ia {
                    f(-vb);
                    b.next();
                } else {
                    f(va - vb);
                    a.next();
                    b.next();
                }
            }
            (Some((_, va)), None) => {
                f(va);
                a.next();
            }
            (None, Some((_, vb))) => {
                f(-vb);
                b.next();
            }
            (None, None) => break,
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::Dense(values)
    }
}

impl From<SparseVector> for Vector {
    fn from(sparse: SparseVector) -> Self {
        Vector::Sparse(sparse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_example() -> Vector {
        Vector::sparse(6, vec![1, 4], vec![2.0, -3.0]).unwrap()
    }

    #[test]
    fn sparse_rejects_unsorted_indices() {
        let err = Vector::sparse(5, vec![3, 1], vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidSparseVector(_)));
    }

    #[test]
    fn sparse_rejects_out_of_range_index() {
        assert!(Vector::sparse(3, vec![0, 3], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn sparse_rejects_length_mismatch() {
        assert!(Vector::sparse(3, vec![0, 1], vec![1.0]).is_err());
    }

    #[test]
    fn sparse_get_binary_searches() {
        let v = sparse_example();
        assert_eq!(v.len(), 6);
        assert_eq!(v.get(1), Some(2.0));
        assert_eq!(v.get(2), Some(0.0));
        assert_eq!(v.get(4), Some(-3.0));
        assert_eq!(v.get(6), None);
    }

    #[test]
    fn dot_agrees_across_representations() {
        let s = sparse_example();
        let d = Vector::dense(s.to_dense());
        let other = Vector::dense(vec![1.0, 1.0, 1.0, 1.0, 2.0, 1.0]);
        assert_eq!(s.dot(&other), -4.0);
        assert_eq!(d.dot(&other), -4.0);
        assert_eq!(s.dot(&s), 13.0);
        assert_eq!(s.norm_squared(), 13.0);
    }

    #[test]
    fn for_each_diff_visits_union() {
        let a = Vector::sparse(5, vec![0, 2], vec![1.0, 5.0]).unwrap();
        let b = Vector::sparse(5, vec![2, 3], vec![4.0, 2.0]).unwrap();
        let mut diffs = Vec::new();
        a.for_each_diff(&b, |d| diffs.push(d));
        assert_eq!(diffs, vec![1.0, 1.0, -2.0]);
    }

    #[test]
    fn nnz_counts_nonzero() {
        assert_eq!(Vector::dense(vec![0.0, 1.0, 0.0, 2.0]).nnz(), 2);
        assert_eq!(sparse_example().nnz(), 2);
    }
}
