//! Brute-force collection.
//!
//! Every query scans all stored vectors. Metrics that support an
//! acceleration cache get it built once at build time, so each scan step is
//! a single dot product plus a few cached scalars.
//!
//! Cost: O(n·d) build (for the cache), O(n·d) per query, O(n·log k) extra
//! for k-NN and a sort of the matches only for radius queries.

use tracing::debug;

use super::{check_query, common_dimension, Neighbor, SearchScratch, VectorCollection};
use crate::distance::{DistanceMetric, EuclideanDistance};
use crate::error::{check_k, check_radius, Result};
use crate::structures::{BoundedSortedList, IndexTable};
use crate::vector::Vector;

/// Exhaustive-scan collection.
#[derive(Debug)]
pub struct VectorArray {
    vectors: Vec<Vector>,
    metric: Box<dyn DistanceMetric>,
    /// Flat acceleration cache; empty if the metric has none.
    cache: Vec<f64>,
    dimension: Option<usize>,
}

impl VectorArray {
    /// Create an empty collection measuring with `metric`.
    pub fn new(metric: Box<dyn DistanceMetric>) -> Self {
        Self {
            vectors: Vec::new(),
            metric,
            cache: Vec::new(),
            dimension: None,
        }
    }

    /// Create and build in one step.
    pub fn with_vectors(
        vectors: Vec<Vector>,
        metric: Box<dyn DistanceMetric>,
        parallel: bool,
    ) -> Result<Self> {
        let mut array = Self::new(Box::new(EuclideanDistance));
        array.build(vectors, metric, parallel)?;
        Ok(array)
    }

    /// Append one vector, extending the acceleration cache.
    ///
    /// # Errors
    ///
    /// [`crate::SearchError::DimensionMismatch`] if `vector` differs in
    /// length from the stored vectors.
    pub fn push(&mut self, vector: Vector) -> Result<usize> {
        check_query(self.dimension, &vector)?;
        if self.metric.supports_acceleration() {
            let extra = self.metric.build_cache(std::slice::from_ref(&vector), false);
            self.cache.extend(extra);
        }
        self.dimension = Some(vector.len());
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    /// The stored vectors, in insertion order.
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    /// The flat acceleration cache (empty if the metric has none).
    pub fn cache(&self) -> &[f64] {
        &self.cache
    }

    /// Distance from `query` to every stored vector, in storage order.
    fn scan<'a>(&'a self, query: &'a Vector) -> impl Iterator<Item = (usize, f64)> + 'a {
        let info = self.metric.query_info(query);
        (0..self.vectors.len()).map(move |i| {
            let d = self
                .metric
                .distance_cached(i, query, &info, &self.vectors, &self.cache);
            (i, d)
        })
    }
}

impl Default for VectorArray {
    fn default() -> Self {
        Self::new(Box::new(EuclideanDistance))
    }
}

impl VectorCollection for VectorArray {
    fn build(
        &mut self,
        vectors: Vec<Vector>,
        metric: Box<dyn DistanceMetric>,
        parallel: bool,
    ) -> Result<()> {
        let dimension = common_dimension(&vectors)?;
        let cache = if metric.supports_acceleration() {
            metric.build_cache(&vectors, parallel)
        } else {
            Vec::new()
        };
        debug!(
            vectors = vectors.len(),
            dimension = ?dimension,
            metric = metric.name(),
            cached = !cache.is_empty(),
            "built vector array"
        );

        self.vectors = vectors;
        self.metric = metric;
        self.cache = cache;
        self.dimension = dimension;
        Ok(())
    }

    fn search_radius_with(
        &self,
        query: &Vector,
        radius: f64,
        _scratch: &mut SearchScratch,
    ) -> Result<Vec<Neighbor>> {
        check_radius(radius)?;
        check_query(self.dimension, query)?;

        let mut indices = Vec::new();
        let mut distances = Vec::new();
        for (i, d) in self.scan(query) {
            if d <= radius {
                indices.push(i);
                distances.push(d);
            }
        }

        // Only the matches are sorted; the scan order already breaks ties by index.
        let table = IndexTable::from_f64(&distances);
        table.apply_in_place(&mut indices);
        table.apply_in_place(&mut distances);
        Ok(indices
            .into_iter()
            .zip(distances)
            .map(|(i, d)| Neighbor::new(i, d))
            .collect())
    }

    fn search_knn_with(
        &self,
        query: &Vector,
        k: usize,
        _scratch: &mut SearchScratch,
    ) -> Result<Vec<Neighbor>> {
        check_k(k)?;
        check_query(self.dimension, query)?;
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let mut best = BoundedSortedList::new(k.min(self.vectors.len()));
        for (i, d) in self.scan(query) {
            best.push(Neighbor::new(i, d));
        }
        Ok(best.into_vec())
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn get(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn metric(&self) -> &dyn DistanceMetric {
        self.metric.as_ref()
    }
}
