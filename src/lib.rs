//! neighborhood: nearest-neighbour vector collections.
//!
//! Index a fixed set of vectors once, then ask for the `k` closest vectors to
//! a query or for everything within a radius. Two collections are provided:
//!
//! - [`VectorArray`]: exact brute-force search. Metrics with an acceleration
//!   cache (Euclidean, cosine) reduce each comparison to one dot product.
//! - [`RandomProjectionLsh`]: approximate cosine search over packed random
//!   hyperplane signatures, comparing Hamming distances instead of vectors.
//!
//! The [`batch`] module runs many queries against one collection, optionally
//! in parallel, and [`structures`] holds the top-k and co-sorting helpers
//! both searches share.
//!
//! # Critical Nuances
//!
//! ## Approximate distances
//!
//! LSH reports the cosine distance *implied by* a Hamming distance, not the
//! exact distance. Ranking quality depends on signature length: measure it
//! with [`eval::recall_at_k`] against a [`VectorArray`] before trusting it.
//!
//! ## When Exact Search Beats Approximate
//!
//! - Small collections: a brute-force scan is already fast.
//! - Low dimension: a signature of a few hundred bits may not be much
//!   cheaper than the vectors themselves.
//! - Very high recall requirements.
//!
//! ## Concurrency
//!
//! Building takes `&mut self`; searching takes `&self`. A built collection
//! is `Send + Sync` and can be queried from many threads at once. Per-query
//! buffers live in a [`SearchScratch`] owned by each worker.

pub mod batch;
pub mod collection;
pub mod distance;
pub mod error;
pub mod eval;
pub mod hash;
pub mod simd;
pub mod structures;
pub mod vector;

// Re-exports
pub use collection::{Neighbor, SearchScratch, VectorArray, VectorCollection};
pub use distance::{
    ChebyshevDistance, CosineDistance, DistanceMetric, EuclideanDistance, ManhattanDistance,
    MinkowskiDistance, NormalizedCosineDistance,
};
pub use error::{Result, SearchError};
pub use hash::{LshParams, ProjectionStorage, RandomProjectionLsh};
pub use vector::{SparseVector, Vector};
