//! HNSW Vector Index for Semantic Search
//!
//! Wraps the HNSW algorithm for approximate nearest-neighbour search over
//! evidence embeddings.
//!
//! # Architecture
//!
//! - In-memory only; SQLite is the source of truth
//! - Rebuilt from SQLite when a store is opened
//! - One mutex guards the graph and the id mapping together, so an insert is
//!   never visible in one without the other
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//! - **efConstruction**: Candidate list size during construction (default: 200)
//! - **efSearch**: Candidate list size during search (caller supplied)

use claimcheck_domain::EvidenceId;
use hnsw_rs::prelude::*;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_MAX_ELEMENTS: usize = 1_000_000;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Internal HNSW error
    #[error("HNSW error: {0}")]
    Internal(String),
}

struct IndexInner {
    hnsw: Hnsw<'static, f32, DistCosine>,
    id_map: HashMap<usize, EvidenceId>,
    next_id: usize,
}

impl IndexInner {
    fn empty() -> Self {
        let nb_layer = 16.min((DEFAULT_MAX_ELEMENTS as f32).ln().trunc() as usize);
        let hnsw = Hnsw::<'static, f32, DistCosine>::new(
            DEFAULT_M,
            DEFAULT_MAX_ELEMENTS,
            nb_layer,
            DEFAULT_EF_CONSTRUCTION,
            DistCosine {},
        );
        Self {
            hnsw,
            id_map: HashMap::new(),
            next_id: 0,
        }
    }
}

/// A wrapper around HNSW for vector similarity search
///
/// Stores (evidence_id, embedding) pairs.
///
/// # Examples
///
/// ```no_run
/// use claimcheck_store::vector_index::VectorIndex;
/// use claimcheck_domain::EvidenceId;
///
/// let index = VectorIndex::new(384);
/// let id = EvidenceId::derive("snippet", 1_700_000_000_000);
/// let embedding = vec![0.1; 384];
/// index.add(id, &embedding).unwrap();
///
/// let results = index.search(&embedding, 5, 64).unwrap();
/// ```
pub struct VectorIndex {
    dimension: usize,
    inner: Mutex<IndexInner>,
}

impl VectorIndex {
    /// Create a new vector index with the specified dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: Mutex::new(IndexInner::empty()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, IndexInner>, VectorIndexError> {
        self.inner
            .lock()
            .map_err(|e| VectorIndexError::Internal(format!("index lock poisoned: {}", e)))
    }

    /// Add an evidence embedding to the index
    pub fn add(&self, id: EvidenceId, embedding: &[f32]) -> Result<(), VectorIndexError> {
        if embedding.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let mut inner = self.lock()?;
        let internal_id = inner.next_id;
        inner.next_id += 1;
        inner.id_map.insert(internal_id, id);
        inner.hnsw.insert((embedding, internal_id));

        Ok(())
    }

    /// Search for the k nearest neighbours of `query`
    ///
    /// Returns (EvidenceId, cosine similarity) pairs sorted by similarity,
    /// highest first. An empty index yields an empty list.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        ef_search: usize,
    ) -> Result<Vec<(EvidenceId, f32)>, VectorIndexError> {
        if query.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let inner = self.lock()?;
        if inner.id_map.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let results = inner.hnsw.search(query, k, ef_search.max(k));

        // HNSW returns cosine distance; similarity = 1 - distance
        let mut mapped: Vec<(EvidenceId, f32)> = results
            .into_iter()
            .filter_map(|neighbour| {
                inner
                    .id_map
                    .get(&neighbour.d_id)
                    .map(|&id| (id, 1.0 - neighbour.distance))
            })
            .collect();
        mapped.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(mapped)
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.id_map.len()).unwrap_or(0)
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every vector
    pub fn clear(&self) -> Result<(), VectorIndexError> {
        let mut inner = self.lock()?;
        *inner = IndexInner::empty();
        Ok(())
    }
}
