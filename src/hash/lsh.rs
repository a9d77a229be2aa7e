//! Random Projection LSH collection for cosine distance.
//!
//! Every stored vector is reduced to a packed sign signature against a bank
//! of Gaussian hyperplanes. Queries compare signatures by Hamming distance,
//! which costs O(n·w) for `w` signature words instead of O(n·d).
//!
//! Distances reported by this collection are **approximate**: they are the
//! [`CosineDistance`] implied by each Hamming distance, not the exact value.
//! Longer signatures reduce the error; no error bound is guaranteed.

use rayon::prelude::*;
use tracing::debug;

use super::projection::{ProjectionMatrix, ProjectionStorage};
use super::signature::{self, WORD_BITS};
use crate::collection::{check_query, common_dimension, Neighbor, SearchScratch, VectorCollection};
use crate::distance::{cosine_to_distance, distance_to_cosine, CosineDistance, DistanceMetric};
use crate::error::{check_k, check_radius, Result, SearchError};
use crate::structures::{BoundedSortedList, IndexTable};
use crate::vector::Vector;

/// Random Projection LSH parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LshParams {
    /// Signature length in bits; a positive multiple of 64.
    pub signature_bits: usize,

    /// Storage of the projection matrix.
    pub projection: ProjectionStorage,

    /// Seed for the projection samples.
    pub seed: u64,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            signature_bits: 256,
            projection: ProjectionStorage::Materialized,
            seed: 42,
        }
    }
}

impl LshParams {
    /// Check the parameters without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.signature_bits == 0 || self.signature_bits % WORD_BITS != 0 {
            return Err(SearchError::InvalidParameter(format!(
                "signature_bits must be a positive multiple of {WORD_BITS}, got {}",
                self.signature_bits
            )));
        }
        if let ProjectionStorage::Pooled { pool_size: 0 } = self.projection {
            return Err(SearchError::InvalidParameter(
                "pool_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Words per signature.
    pub fn words(&self) -> usize {
        self.signature_bits / WORD_BITS
    }
}

/// Approximate cosine index over packed random-projection signatures.
#[derive(Debug)]
pub struct RandomProjectionLsh {
    params: LshParams,
    metric: Box<dyn DistanceMetric>,
    vectors: Vec<Vector>,
    /// `None` until built with at least one vector.
    matrix: Option<ProjectionMatrix>,
    /// Flat `vectors.len() × words` signatures.
    signatures: Vec<u64>,
}

impl RandomProjectionLsh {
    /// Create an empty index measuring with [`CosineDistance`].
    pub fn new(params: LshParams) -> Result<Self> {
        Self::with_metric(params, Box::new(CosineDistance))
    }

    /// Create an empty index with a specific cosine-family metric.
    ///
    /// # Errors
    ///
    /// [`SearchError::IncompatibleMetric`] for non-cosine metrics, or
    /// [`SearchError::InvalidParameter`] for invalid `params`.
    pub fn with_metric(params: LshParams, metric: Box<dyn DistanceMetric>) -> Result<Self> {
        params.validate()?;
        check_metric(metric.as_ref())?;
        Ok(Self {
            params,
            metric,
            vectors: Vec::new(),
            matrix: None,
            signatures: Vec::new(),
        })
    }

    /// Create and build in one step, measuring with [`CosineDistance`].
    pub fn with_vectors(params: LshParams, vectors: Vec<Vector>, parallel: bool) -> Result<Self> {
        let mut lsh = Self::new(params)?;
        lsh.build(vectors, Box::new(CosineDistance), parallel)?;
        Ok(lsh)
    }

    /// Swap the metric. Only cosine-family metrics are accepted.
    pub fn set_metric(&mut self, metric: Box<dyn DistanceMetric>) -> Result<()> {
        check_metric(metric.as_ref())?;
        self.metric = metric;
        Ok(())
    }

    pub fn params(&self) -> &LshParams {
        &self.params
    }

    pub fn signature_bits(&self) -> usize {
        self.params.signature_bits
    }

    /// Stored signature of the vector at `index`.
    pub fn signature(&self, index: usize) -> Option<&[u64]> {
        let words = self.params.words();
        self.signatures.get(index * words..(index + 1) * words)
    }

    /// Project an arbitrary vector through the current matrix.
    ///
    /// Returns `None` while the index is empty (no matrix exists yet).
    pub fn signature_of(&self, vector: &Vector) -> Result<Option<Vec<u64>>> {
        check_query(self.dimension(), vector)?;
        let mut scratch = SearchScratch::new();
        Ok(self
            .query_signature(vector, &mut scratch)
            .map(|()| scratch.signature))
    }

    /// Approximate cosine distance implied by a Hamming distance.
    pub fn hamming_to_distance(&self, hamming: u32) -> f64 {
        cosine_to_distance(signature::hamming_to_cosine(
            hamming,
            self.params.signature_bits,
        ))
    }

    /// Largest Hamming distance whose [`hamming_to_distance`](Self::hamming_to_distance)
    /// is within `radius`.
    ///
    /// A radius equal to a previously reported distance therefore admits
    /// that hit again.
    pub fn distance_to_hamming(&self, radius: f64) -> u32 {
        let bits = self.params.signature_bits;
        let mut h = signature::cosine_to_hamming(distance_to_cosine(radius), bits);
        // The closed form can land one step off after rounding.
        while (h as usize) < bits && self.hamming_to_distance(h + 1) <= radius {
            h += 1;
        }
        while h > 0 && self.hamming_to_distance(h) > radius {
            h -= 1;
        }
        h
    }

    /// Fill `scratch.signature` with the query's signature.
    fn query_signature(&self, query: &Vector, scratch: &mut SearchScratch) -> Option<()> {
        let matrix = self.matrix.as_ref()?;
        scratch.projection.resize(self.params.signature_bits, 0.0);
        scratch.signature.resize(self.params.words(), 0);
        matrix.project(query, &mut scratch.projection);
        signature::pack_signs(&scratch.projection, &mut scratch.signature);
        Some(())
    }

    /// Hamming distance from `query` to every stored signature, in storage order.
    fn hamming_scan<'a>(&'a self, query: &'a [u64]) -> impl Iterator<Item = (usize, u32)> + 'a {
        self.signatures
            .chunks_exact(self.params.words())
            .map(move |stored| signature::hamming(stored, query))
            .enumerate()
    }
}

fn check_metric(metric: &dyn DistanceMetric) -> Result<()> {
    if !metric.is_cosine() {
        return Err(SearchError::IncompatibleMetric {
            collection: "RandomProjectionLsh",
            required: "a cosine distance",
            metric: metric.name().to_string(),
        });
    }
    Ok(())
}

impl VectorCollection for RandomProjectionLsh {
    fn build(
        &mut self,
        vectors: Vec<Vector>,
        metric: Box<dyn DistanceMetric>,
        parallel: bool,
    ) -> Result<()> {
        check_metric(metric.as_ref())?;
        let dimension = common_dimension(&vectors)?;
        if dimension == Some(0) {
            return Err(SearchError::InvalidParameter(
                "vectors must have at least one dimension".to_string(),
            ));
        }

        let bits = self.params.signature_bits;
        let words = self.params.words();
        let matrix = dimension
            .map(|dim| ProjectionMatrix::new(bits, dim, self.params.projection, self.params.seed));

        let mut signatures = vec![0u64; vectors.len() * words];
        if let Some(matrix) = &matrix {
            if parallel {
                signatures
                    .par_chunks_mut(words)
                    .zip(vectors.par_iter())
                    .for_each_init(
                        || vec![0.0; bits],
                        |projection, (out, v)| {
                            matrix.project(v, projection);
                            signature::pack_signs(projection, out);
                        },
                    );
            } else {
                let mut projection = vec![0.0; bits];
                for (out, v) in signatures.chunks_exact_mut(words).zip(&vectors) {
                    matrix.project(v, &mut projection);
                    signature::pack_signs(&projection, out);
                }
            }
        }

        debug!(
            vectors = vectors.len(),
            dimension = ?dimension,
            signature_bits = bits,
            storage = ?self.params.projection,
            parallel,
            "built random projection lsh"
        );

        self.vectors = vectors;
        self.metric = metric;
        self.matrix = matrix;
        self.signatures = signatures;
        Ok(())
    }

    fn search_radius_with(
        &self,
        query: &Vector,
        radius: f64,
        scratch: &mut SearchScratch,
    ) -> Result<Vec<Neighbor>> {
        check_radius(radius)?;
        check_query(self.dimension(), query)?;
        if self.query_signature(query, scratch).is_none() {
            return Ok(Vec::new());
        }

        let max_hamming = self.distance_to_hamming(radius);
        let mut indices = Vec::new();
        let mut hammings = Vec::new();
        for (i, h) in self.hamming_scan(&scratch.signature) {
            if h <= max_hamming {
                indices.push(i);
                hammings.push(h);
            }
        }

        let table = IndexTable::new(&hammings);
        Ok(table
            .apply(&indices)
            .into_iter()
            .zip(table.apply(&hammings))
            .map(|(i, h)| Neighbor::new(i, self.hamming_to_distance(h)))
            .collect())
    }

    fn search_knn_with(
        &self,
        query: &Vector,
        k: usize,
        scratch: &mut SearchScratch,
    ) -> Result<Vec<Neighbor>> {
        check_k(k)?;
        check_query(self.dimension(), query)?;
        if self.query_signature(query, scratch).is_none() {
            return Ok(Vec::new());
        }

        // (hamming, index) orders ties by insertion order.
        let mut best = BoundedSortedList::new(k.min(self.vectors.len()));
        for (i, h) in self.hamming_scan(&scratch.signature) {
            best.push((h, i));
        }
        Ok(best
            .into_vec()
            .into_iter()
            .map(|(h, i)| Neighbor::new(i, self.hamming_to_distance(h)))
            .collect())
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn get(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    fn dimension(&self) -> Option<usize> {
        self.matrix.as_ref().map(ProjectionMatrix::cols)
    }

    fn metric(&self) -> &dyn DistanceMetric {
        self.metric.as_ref()
    }
}
