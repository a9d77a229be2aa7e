//! Error types for neighborhood.

use thiserror::Error;

/// Errors that can occur while building or querying a vector collection.
///
/// All of these are configuration or input errors detected at the boundary
/// of a public operation. Searching an empty collection is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Invalid parameter value (k of zero, negative radius, bad signature length, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The collection cannot work with the supplied distance metric.
    #[error("incompatible distance metric: {collection} requires {required}, got {metric}")]
    IncompatibleMetric {
        collection: &'static str,
        required: &'static str,
        metric: String,
    },

    /// Dimension mismatch between two vectors.
    #[error("dimension mismatch: expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid sparse vector (unsorted, duplicated or out of range indices).
    #[error("invalid sparse vector: {0}")]
    InvalidSparseVector(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Reject `k == 0`.
pub(crate) fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(SearchError::InvalidParameter(
            "k must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Reject negative or NaN radii.
pub(crate) fn check_radius(radius: f64) -> Result<()> {
    if radius.is_nan() || radius < 0.0 {
        return Err(SearchError::InvalidParameter(format!(
            "radius must be non-negative, got {radius}"
        )));
    }
    Ok(())
}
