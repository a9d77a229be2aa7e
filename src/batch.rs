//! Batch queries against a built collection.
//!
//! In parallel mode the query list is split into contiguous chunks, one per
//! rayon worker. Each chunk owns its own [`SearchScratch`], the collection
//! is only read, and results come back in query order regardless of which
//! worker finishes first.

use rayon::prelude::*;
use tracing::trace;

use crate::collection::{Neighbor, SearchScratch, VectorCollection};
use crate::error::{check_k, check_radius, Result};
use crate::vector::Vector;

/// k-NN search for every query; `result[i]` answers `queries[i]`.
pub fn search_knn_batch<C>(
    collection: &C,
    queries: &[Vector],
    k: usize,
    parallel: bool,
) -> Result<Vec<Vec<Neighbor>>>
where
    C: VectorCollection + ?Sized,
{
    check_k(k)?;
    run_chunked(queries, parallel, |q, scratch| {
        collection.search_knn_with(q, k, scratch)
    })
}

/// Radius search for every query; `result[i]` answers `queries[i]`.
pub fn search_radius_batch<C>(
    collection: &C,
    queries: &[Vector],
    radius: f64,
    parallel: bool,
) -> Result<Vec<Vec<Neighbor>>>
where
    C: VectorCollection + ?Sized,
{
    check_radius(radius)?;
    run_chunked(queries, parallel, |q, scratch| {
        collection.search_radius_with(q, radius, scratch)
    })
}

/// The `k` nearest stored neighbours of every stored vector, excluding the
/// vector itself. `result[i]` belongs to `collection.get(i)`.
pub fn all_nearest_neighbors<C>(collection: &C, k: usize, parallel: bool) -> Result<Vec<Vec<Neighbor>>>
where
    C: VectorCollection + ?Sized,
{
    check_k(k)?;
    let stored: Vec<(usize, &Vector)> = (0..collection.len())
        .filter_map(|i| collection.get(i).map(|v| (i, v)))
        .collect();
    run_chunked(&stored, parallel, |&(i, v), scratch| {
        let mut hits = collection.search_knn_with(v, k + 1, scratch)?;
        match hits.iter().position(|n| n.index == i) {
            Some(pos) => {
                hits.remove(pos);
            }
            None => hits.truncate(k),
        }
        Ok(hits)
    })
}

/// Summary of the distance to each query's k-th nearest neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborStats {
    /// Queries that had at least one neighbour.
    pub count: usize,
    pub mean: f64,
    /// Sample variance; zero with fewer than two observations.
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

impl NeighborStats {
    fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        // Welford's online update.
        let mut count = 0usize;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for x in values {
            count += 1;
            let delta = x - mean;
            mean += delta / count as f64;
            m2 += delta * (x - mean);
            min = min.min(x);
            max = max.max(x);
        }
        let variance = if count > 1 {
            m2 / (count - 1) as f64
        } else {
            0.0
        };
        Self {
            count,
            mean,
            variance,
            min,
            max,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Statistics of the k-th neighbour distance over `queries`.
///
/// When the collection holds fewer than `k` vectors the farthest returned
/// neighbour stands in. Queries with no neighbours at all are skipped.
pub fn kth_neighbor_stats<C>(
    collection: &C,
    queries: &[Vector],
    k: usize,
    parallel: bool,
) -> Result<NeighborStats>
where
    C: VectorCollection + ?Sized,
{
    let results = search_knn_batch(collection, queries, k, parallel)?;
    Ok(NeighborStats::from_values(
        results.iter().filter_map(|hits| hits.last().map(|n| n.distance)),
    ))
}

/// Apply `f` to every item, in contiguous per-worker chunks when `parallel`.
fn run_chunked<T, R, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T, &mut SearchScratch) -> Result<R> + Sync,
{
    let run = |chunk: &[T]| -> Result<Vec<R>> {
        let mut scratch = SearchScratch::new();
        chunk.iter().map(|item| f(item, &mut scratch)).collect()
    };

    if !parallel || items.len() < 2 {
        return run(items);
    }

    let workers = rayon::current_num_threads().max(1);
    let chunk_size = items.len().div_ceil(workers);
    trace!(items = items.len(), workers, chunk_size, "dispatching batch");

    let chunks: Vec<Vec<R>> = items
        .par_chunks(chunk_size)
        .map(run)
        .collect::<Result<_>>()?;
    Ok(chunks.into_iter().flatten().collect())
}
