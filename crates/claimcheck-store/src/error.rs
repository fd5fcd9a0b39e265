//! Error types for store operations

use crate::embedding::EmbeddingError;
use crate::vector_index::VectorIndexError;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector index error
    #[error("Vector index error: {0}")]
    Index(#[from] VectorIndexError),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A lock guarding shared state was poisoned by a panicking thread
    #[error("Store lock poisoned")]
    Poisoned,
}
