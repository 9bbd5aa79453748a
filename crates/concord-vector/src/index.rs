//! Nearest-neighbor index backends over verse embedding vectors.
//!
//! Both backends rank by Euclidean (L2) distance and are immutable once
//! built: they are constructed from the full vector set at startup and only
//! searched afterwards. Positions in returned hits index into the corpus the
//! vectors were built from.
//!
//! - `ExactIndex` scans every vector; O(n) per query but exact.
//! - `HnswVerseIndex` wraps a hora HNSW graph for approximate search.

use std::cmp::Ordering;

use hora::core::ann_index::ANNIndex;
use hora::core::metrics::Metric;
use hora::index::hnsw_idx::HNSWIndex;
use hora::index::hnsw_params::HNSWParams;
use tracing::info;

use concord_core::error::{ConcordError, Result};
use concord_core::types::IndexBackend;

/// A single hit returned from an index query.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Position of the matching vector (and its verse) in the corpus.
    pub position: usize,
    /// Euclidean distance from the query vector.
    pub distance: f32,
}

/// A read-only k-nearest-neighbor index over verse vectors.
pub trait VerseIndex: Send + Sync {
    /// Return up to `k` nearest vectors, ascending by distance.
    ///
    /// Returns fewer than `k` hits when the index holds fewer vectors.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>>;

    /// Number of vectors stored in the index.
    fn len(&self) -> usize;

    /// True if the index contains no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the configured index backend from vectors in corpus order.
pub fn build_index(backend: IndexBackend, vectors: Vec<Vec<f32>>) -> Result<Box<dyn VerseIndex>> {
    match backend {
        IndexBackend::Exact => Ok(Box::new(ExactIndex::build(vectors)?)),
        IndexBackend::Hnsw => Ok(Box::new(HnswVerseIndex::build(vectors)?)),
    }
}

/// Check that every vector shares one dimensionality; returns it (0 if empty).
fn uniform_dimensions(vectors: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = vectors.first() else {
        return Ok(0);
    };
    let dims = first.len();
    for (position, vector) in vectors.iter().enumerate() {
        if vector.len() != dims {
            return Err(ConcordError::Index(format!(
                "Vector at position {} has {} dimensions, expected {}",
                position,
                vector.len(),
                dims
            )));
        }
    }
    Ok(dims)
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

// ---------------------------------------------------------------------------
// ExactIndex - brute-force L2 scan
// ---------------------------------------------------------------------------

/// Exact brute-force index: every query scans all stored vectors.
#[derive(Debug, Clone)]
pub struct ExactIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl ExactIndex {
    /// Build the index from vectors in corpus order.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = uniform_dimensions(&vectors)?;
        info!(vectors = vectors.len(), dimensions, "Exact index built");
        Ok(Self {
            vectors,
            dimensions,
        })
    }
}

impl VerseIndex for ExactIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(ConcordError::Index(format!(
                "Query has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<IndexHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| IndexHit {
                position,
                distance: euclidean_distance(query, vector),
            })
            .collect();

        // Ascending distance; ties resolve to the earlier corpus position.
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(k);

        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

// ---------------------------------------------------------------------------
// HnswVerseIndex - approximate search via hora
// ---------------------------------------------------------------------------

/// Approximate index backed by a hora HNSW graph with Euclidean metric.
pub struct HnswVerseIndex {
    // None when the corpus is empty; hora cannot build a zero-vector graph.
    index: Option<HNSWIndex<f32, usize>>,
    dimensions: usize,
    len: usize,
}

impl std::fmt::Debug for HnswVerseIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HnswVerseIndex")
            .field("dimensions", &self.dimensions)
            .field("len", &self.len)
            .finish()
    }
}

impl HnswVerseIndex {
    /// Build the graph from vectors in corpus order.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = uniform_dimensions(&vectors)?;
        let len = vectors.len();

        if len == 0 {
            return Ok(Self {
                index: None,
                dimensions,
                len,
            });
        }

        let mut index = HNSWIndex::<f32, usize>::new(dimensions, &HNSWParams::<f32>::default());
        for (position, vector) in vectors.iter().enumerate() {
            index
                .add(vector, position)
                .map_err(|e| ConcordError::Index(format!("HNSW add failed: {}", e)))?;
        }
        index
            .build(Metric::Euclidean)
            .map_err(|e| ConcordError::Index(format!("HNSW build failed: {}", e)))?;

        info!(vectors = len, dimensions, "HNSW index built");

        Ok(Self {
            index: Some(index),
            dimensions,
            len,
        })
    }
}

impl VerseIndex for HnswVerseIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        let Some(index) = self.index.as_ref() else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(ConcordError::Index(format!(
                "Query has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<IndexHit> = index
            .search_nodes(query, k.min(self.len))
            .into_iter()
            .filter_map(|(node, distance)| {
                node.idx().map(|position| IndexHit { position, distance })
            })
            .collect();

        // hora returns neighbors nearest-first; re-sort to pin the ordering
        // contract regardless of backend behavior.
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(k);

        Ok(hits)
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simple orthogonal-ish test vectors: one-hot at `i` scaled by `scale`.
    fn one_hot(dims: usize, i: usize, scale: f32) -> Vec<f32> {
        let mut v = vec![0.0f32; dims];
        v[i] = scale;
        v
    }

    fn sample_vectors() -> Vec<Vec<f32>> {
        vec![
            one_hot(8, 0, 1.0),
            one_hot(8, 1, 1.0),
            one_hot(8, 2, 1.0),
            one_hot(8, 3, 1.0),
        ]
    }

    #[test]
    fn test_exact_identical_vector_is_top_hit() {
        let index = ExactIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 2, 1.0), 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 2);
        assert!(hits[0].distance < 1e-6);
    }

    #[test]
    fn test_exact_k_larger_than_index_returns_all() {
        let index = ExactIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 0, 1.0), 50).unwrap();
        assert_eq!(hits.len(), 4);
        // Every position exactly once.
        let mut positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exact_k_smaller_than_index() {
        let index = ExactIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 0, 1.0), 2).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_exact_distances_non_decreasing() {
        let index = ExactIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 1, 0.5), 4).unwrap();
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_exact_tie_breaks_by_position() {
        // Two identical vectors: both at distance 0 from the query.
        let vectors = vec![one_hot(4, 0, 1.0), one_hot(4, 0, 1.0)];
        let index = ExactIndex::build(vectors).unwrap();
        let hits = index.search(&one_hot(4, 0, 1.0), 2).unwrap();
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[1].position, 1);
    }

    #[test]
    fn test_exact_empty_index() {
        let index = ExactIndex::build(Vec::new()).unwrap();
        assert!(index.is_empty());
        let hits = index.search(&[1.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_exact_k_zero() {
        let index = ExactIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 0, 1.0), 0).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_exact_query_dimension_mismatch() {
        let index = ExactIndex::build(sample_vectors()).unwrap();
        let result = index.search(&[1.0, 0.0], 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        assert!(ExactIndex::build(vectors).is_err());
    }

    #[test]
    fn test_exact_determinism() {
        let index_a = ExactIndex::build(sample_vectors()).unwrap();
        let index_b = ExactIndex::build(sample_vectors()).unwrap();
        let query = one_hot(8, 3, 0.9);
        assert_eq!(
            index_a.search(&query, 4).unwrap(),
            index_b.search(&query, 4).unwrap()
        );
    }

    #[test]
    fn test_hnsw_identical_vector_is_top_hit() {
        let index = HnswVerseIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 1, 1.0), 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 1);
        assert!(hits[0].distance < 1e-4);
    }

    #[test]
    fn test_hnsw_k_larger_than_index_returns_all() {
        let index = HnswVerseIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 0, 1.0), 50).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn test_hnsw_distances_non_decreasing() {
        let index = HnswVerseIndex::build(sample_vectors()).unwrap();
        let hits = index.search(&one_hot(8, 2, 0.5), 4).unwrap();
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_hnsw_empty_index() {
        let index = HnswVerseIndex::build(Vec::new()).unwrap();
        assert!(index.is_empty());
        let hits = index.search(&[1.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_hnsw_query_dimension_mismatch() {
        let index = HnswVerseIndex::build(sample_vectors()).unwrap();
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_build_index_factory() {
        let exact = build_index(IndexBackend::Exact, sample_vectors()).unwrap();
        assert_eq!(exact.len(), 4);
        let hnsw = build_index(IndexBackend::Hnsw, sample_vectors()).unwrap();
        assert_eq!(hnsw.len(), 4);

        // Both backends agree on the nearest neighbor for an exact match.
        let query = one_hot(8, 3, 1.0);
        assert_eq!(
            exact.search(&query, 1).unwrap()[0].position,
            hnsw.search(&query, 1).unwrap()[0].position
        );
    }
}
