//! Gaussian random projection matrices.
//!
//! Two storage modes trade memory for CPU:
//!
//! - **Materialized**: every `rows × cols` entry is sampled and stored.
//! - **Pooled**: only `pool_size` samples are stored. Entry `(row, col)`
//!   reads `pool[h(row, col, seed) mod pool_size]` with a splitmix64 mixer,
//!   so repeated reads of a cell always agree.
//!
//! Both modes are fully determined by the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::simd;
use crate::vector::Vector;

/// How projection entries are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectionStorage {
    /// Store every entry.
    #[default]
    Materialized,
    /// Share a bounded pool of samples between all entries.
    Pooled { pool_size: usize },
}

#[derive(Debug, Clone)]
enum Entries {
    /// Row-major `rows × cols`.
    Full(Vec<f64>),
    Pool(Vec<f64>),
}

/// A `rows × cols` matrix of standard-normal samples.
#[derive(Debug, Clone)]
pub struct ProjectionMatrix {
    rows: usize,
    cols: usize,
    seed: u64,
    entries: Entries,
}

impl ProjectionMatrix {
    /// Sample a new matrix. `rows`, `cols` and any pool size must be non-zero.
    pub fn new(rows: usize, cols: usize, storage: ProjectionStorage, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sample = |n: usize| -> Vec<f64> {
            (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
        };
        let entries = match storage {
            ProjectionStorage::Materialized => Entries::Full(sample(rows * cols)),
            ProjectionStorage::Pooled { pool_size } => Entries::Pool(sample(pool_size)),
        };
        Self {
            rows,
            cols,
            seed,
            entries,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match &self.entries {
            Entries::Full(values) => values[row * self.cols + col],
            Entries::Pool(pool) => pool[pool_slot(row, col, self.seed, pool.len())],
        }
    }

    /// Write `self · v` into `out` (length `rows`).
    ///
    /// Sparse vectors only touch the columns of their non-zeros.
    pub fn project(&self, v: &Vector, out: &mut [f64]) {
        debug_assert_eq!(v.len(), self.cols);
        debug_assert_eq!(out.len(), self.rows);
        match (&self.entries, v) {
            (Entries::Full(values), Vector::Dense(dense)) => {
                for (row, slot) in values.chunks_exact(self.cols).zip(out.iter_mut()) {
                    *slot = simd::dot(row, dense);
                }
            }
            (Entries::Full(values), Vector::Sparse(sparse)) => {
                for (row, slot) in values.chunks_exact(self.cols).zip(out.iter_mut()) {
                    *slot = simd::sparse_dense_dot(sparse.indices(), sparse.values(), row);
                }
            }
            (Entries::Pool(_), _) => {
                out.fill(0.0);
                for (col, value) in v.iter_nonzero() {
                    for (row, slot) in out.iter_mut().enumerate() {
                        *slot += self.get(row, col) * value;
                    }
                }
            }
        }
    }
}

/// splitmix64 finalizer.
#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Pool slot for a matrix cell.
#[inline]
fn pool_slot(row: usize, col: usize, seed: u64, pool_len: usize) -> usize {
    let h = splitmix64(splitmix64(seed ^ row as u64) ^ col as u64);
    (h % pool_len as u64) as usize
}
