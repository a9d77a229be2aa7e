//! Vector collections: indexes over a fixed set of vectors.
//!
//! A collection is built once from a list of vectors and a distance metric,
//! then queried any number of times:
//!
//! - [`VectorCollection::search_radius`]: every stored vector within a radius.
//! - [`VectorCollection::search_knn`]: the `k` closest stored vectors.
//!
//! Both return [`Neighbor`]s ascending by distance. Ties are broken by the
//! stored vector's position, so results are deterministic.
//!
//! Building takes `&mut self` and replaces all internal state; queries take
//! `&self`. The borrow checker therefore keeps a rebuild from overlapping
//! any in-flight query, and a built collection can be shared across threads
//! without locks.
//!
//! ```rust
//! use neighborhood::{EuclideanDistance, Vector, VectorArray, VectorCollection};
//!
//! let vectors = vec![
//!     Vector::dense(vec![0.0, 0.0]),
//!     Vector::dense(vec![1.0, 0.0]),
//!     Vector::dense(vec![5.0, 5.0]),
//! ];
//! let array = VectorArray::with_vectors(vectors, Box::new(EuclideanDistance), false)?;
//!
//! let hits = array.search_knn(&Vector::dense(vec![0.9, 0.1]), 2)?;
//! assert_eq!(hits[0].index, 1);
//! assert_eq!(hits[1].index, 0);
//! # Ok::<(), neighborhood::SearchError>(())
//! ```

mod array;

pub use array::VectorArray;

use std::cmp::Ordering;

use crate::distance::DistanceMetric;
use crate::error::{Result, SearchError};
use crate::vector::Vector;

/// One search hit: a stored vector's position and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the vector in the collection (see [`VectorCollection::get`]).
    pub index: usize,
    /// Distance to the query. Approximate for hashing-based collections.
    pub distance: f64,
}

impl Neighbor {
    pub fn new(index: usize, distance: f64) -> Self {
        Self { index, distance }
    }
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp keeps NaN from poisoning the ordering.
        self.distance
            .total_cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable per-worker buffers for queries.
///
/// Never share one between threads; give each worker its own. The
/// [`batch`](crate::batch) helpers allocate one per chunk of queries.
#[derive(Debug, Clone, Default)]
pub struct SearchScratch {
    pub(crate) projection: Vec<f64>,
    pub(crate) signature: Vec<u64>,
}

impl SearchScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// An index over a fixed set of vectors.
pub trait VectorCollection: Send + Sync {
    /// Index `vectors` under `metric`, replacing any previous contents.
    ///
    /// When `parallel` is true, per-vector work may run on the rayon pool.
    ///
    /// # Errors
    ///
    /// [`SearchError::DimensionMismatch`] if the vectors differ in length,
    /// or [`SearchError::IncompatibleMetric`] if the collection cannot use
    /// `metric`.
    fn build(
        &mut self,
        vectors: Vec<Vector>,
        metric: Box<dyn DistanceMetric>,
        parallel: bool,
    ) -> Result<()>;

    /// All stored vectors within `radius` of `query`, ascending by distance.
    fn search_radius_with(
        &self,
        query: &Vector,
        radius: f64,
        scratch: &mut SearchScratch,
    ) -> Result<Vec<Neighbor>>;

    /// The `min(k, len)` stored vectors closest to `query`, ascending.
    fn search_knn_with(
        &self,
        query: &Vector,
        k: usize,
        scratch: &mut SearchScratch,
    ) -> Result<Vec<Neighbor>>;

    /// [`search_radius_with`](Self::search_radius_with) with a fresh scratch buffer.
    fn search_radius(&self, query: &Vector, radius: f64) -> Result<Vec<Neighbor>> {
        self.search_radius_with(query, radius, &mut SearchScratch::new())
    }

    /// [`search_knn_with`](Self::search_knn_with) with a fresh scratch buffer.
    fn search_knn(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        self.search_knn_with(query, k, &mut SearchScratch::new())
    }

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored vector at `index`.
    fn get(&self, index: usize) -> Option<&Vector>;

    /// Length of the stored vectors, `None` while empty.
    fn dimension(&self) -> Option<usize>;

    /// The metric distances are measured with.
    fn metric(&self) -> &dyn DistanceMetric;
}

/// Check that every vector has the same length; return that length.
pub(crate) fn common_dimension(vectors: &[Vector]) -> Result<Option<usize>> {
    let Some(first) = vectors.first() else {
        return Ok(None);
    };
    let expected = first.len();
    if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
        return Err(SearchError::DimensionMismatch {
            expected,
            actual: bad.len(),
        });
    }
    Ok(Some(expected))
}

/// Check a query against the collection's dimension (if any).
pub(crate) fn check_query(dimension: Option<usize>, query: &Vector) -> Result<()> {
    match dimension {
        Some(expected) if expected != query.len() => Err(SearchError::DimensionMismatch {
            expected,
            actual: query.len(),
        }),
        _ => Ok(()),
    }
}
