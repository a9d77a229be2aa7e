//! Hash-based similarity search.
//!
//! ## Random hyperplane LSH
//!
//! **Key insight** (Charikar 2002): project vectors onto random Gaussian
//! hyperplanes. Two vectors land on the same side of a hyperplane with
//! probability
//!
//! ```text
//! P[sign(r·a) = sign(r·b)] = 1 - θ(a,b)/π
//! ```
//!
//! where θ is the angle between them. Stacking `b` hyperplanes gives a
//! `b`-bit signature whose Hamming distance, divided by `b`, estimates θ/π.
//! Comparing signatures is XOR + popcount over a handful of words, far
//! cheaper than a dot product in the original dimension.
//!
//! ```rust
//! use neighborhood::hash::{LshParams, RandomProjectionLsh};
//! use neighborhood::{Vector, VectorCollection};
//!
//! let vectors = vec![
//!     Vector::dense(vec![1.0, 0.1, 0.0]),
//!     Vector::dense(vec![0.0, 1.0, 0.2]),
//!     Vector::dense(vec![-1.0, 0.0, 0.1]),
//! ];
//! let lsh = RandomProjectionLsh::with_vectors(LshParams::default(), vectors, false)?;
//!
//! let hits = lsh.search_knn(&Vector::dense(vec![2.0, 0.2, 0.0]), 1)?;
//! assert_eq!(hits[0].index, 0);
//! # Ok::<(), neighborhood::SearchError>(())
//! ```
//!
//! ## Accuracy
//!
//! The Hamming-to-angle relation assumes rotation-invariant (Gaussian)
//! hyperplanes. The pooled projection mode reuses a bounded set of Gaussian
//! samples, which is not strictly rotation-invariant; its recall is checked
//! separately in the tests rather than assumed.
//!
//! ## References
//!
//! - Charikar (2002). "Similarity estimation techniques from rounding algorithms."
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards removing
//!   the curse of dimensionality."

mod lsh;
pub mod projection;
pub mod signature;

pub use lsh::{LshParams, RandomProjectionLsh};
pub use projection::{ProjectionMatrix, ProjectionStorage};
