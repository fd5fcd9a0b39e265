//! Embedding Model for Text Vectorization
//!
//! Text-to-vector conversion for evidence retrieval. Models run locally so the
//! store works offline and costs nothing per query.
//!
//! # Architecture
//!
//! - **HashedBagOfWordsModel**: feature-hashed content words, deterministic
//! - Any sentence-embedding model can be plugged in through [`EmbeddingModel`]
//!
//! # Examples
//!
//! ```rust
//! use claimcheck_store::embedding::{EmbeddingModel, HashedBagOfWordsModel};
//!
//! let model = HashedBagOfWordsModel::new(384);
//! let embedding = model.embed("The sky is blue").unwrap();
//! assert_eq!(embedding.len(), 384);
//!
//! // Same text always produces same embedding
//! assert_eq!(embedding, model.embed("The sky is blue").unwrap());
//! ```

use claimcheck_domain::text::{is_stopword, light_stem, tokenize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Trait for embedding models
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Get the dimension of embeddings produced by this model
    fn dimension(&self) -> usize;
}

/// Feature-hashing embedder over content words
///
/// Each non-stopword token is hashed to one bucket with a hashed sign, so
/// texts sharing vocabulary end up with positive cosine similarity. The
/// vectors are:
///
/// - **Deterministic**: same text always produces the same embedding
/// - **Normalized**: unit length, ready for cosine distance
/// - **Lexical**: similarity tracks shared words, not paraphrase
///
/// Text without any alphanumeric token falls back to a seeded hash of the
/// whole string so it still gets a stable, non-zero vector.
pub struct HashedBagOfWordsModel {
    dimension: usize,
}

impl HashedBagOfWordsModel {
    /// Create a new model
    ///
    /// # Parameters
    ///
    /// - `dimension`: The embedding dimension (e.g., 384)
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Stable across builds: stored embeddings must match fresh query embeddings
    fn hash_token(token: &str, seed: u64) -> u64 {
        let digest = Sha256::new()
            .chain_update(seed.to_le_bytes())
            .chain_update(token.as_bytes())
            .finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(prefix)
    }

    /// Hash text with a seed to get a deterministic f32 value in [-1, 1]
    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let hash_value = Self::hash_token(text, seed);
        let normalized = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        normalized as f32
    }
}

impl EmbeddingModel for HashedBagOfWordsModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }
        if self.dimension == 0 {
            return Err(EmbeddingError::InferenceFailed(
                "Embedding dimension must be non-zero".to_string(),
            ));
        }

        let tokens = tokenize(text);
        let mut content: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !is_stopword(t))
            .collect();
        if content.is_empty() {
            content = tokens.iter().map(String::as_str).collect();
        }

        let mut embedding = vec![0.0f32; self.dimension];
        if content.is_empty() {
            for (i, value) in embedding.iter_mut().enumerate() {
                *value = Self::hash_with_seed(text, i as u64);
            }
        } else {
            for token in content {
                let stem = light_stem(token);
                let bucket = (Self::hash_token(stem, 0) % self.dimension as u64) as usize;
                let sign = if Self::hash_token(stem, 1) & 1 == 0 { 1.0 } else { -1.0 };
                embedding[bucket] += sign;
            }
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        } else {
            // Every token cancelled out; keep the vector non-zero
            embedding[0] = 1.0;
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in [-1, 1]. Vectors of different length, or with zero
/// magnitude, have similarity 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_deterministic() {
        let model = HashedBagOfWordsModel::new(384);

        let text = "The quick brown fox jumps over the lazy dog";
        let embedding1 = model.embed(text).unwrap();
        let embedding2 = model.embed(text).unwrap();

        assert_eq!(embedding1, embedding2, "Same text should produce same embedding");
    }

    #[test]
    fn test_token_hash_is_pinned() {
        assert_eq!(HashedBagOfWordsModel::hash_token("earth", 0), 18178213432353106821);
        assert_eq!(HashedBagOfWordsModel::hash_token("earth", 1), 2315902786384966142);
        assert_eq!(HashedBagOfWordsModel::hash_token("flat", 0), 17265008695170664163);
    }

    #[test]
    fn test_embedding_dimension() {
        let model = HashedBagOfWordsModel::new(128);

        let embedding = model.embed("test").unwrap();
        assert_eq!(embedding.len(), 128);
        assert_eq!(model.dimension(), 128);
    }

    #[test]
    fn test_embedding_normalized() {
        let model = HashedBagOfWordsModel::new(384);

        for text in ["test text", "???", "the is a"] {
            let embedding = model.embed(text).unwrap();
            let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((magnitude - 1.0).abs() < 0.0001, "{:?} should be normalized", text);
        }
    }

    #[test]
    fn test_empty_text_rejected() {
        let model = HashedBagOfWordsModel::new(384);

        let result = model.embed("   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty text"));
    }

    #[test]
    fn test_shared_words_increase_similarity() {
        let model = HashedBagOfWordsModel::new(384);

        let claim = model.embed("The Earth is flat").unwrap();
        let related = model
            .embed("The Earth is an oblate spheroid, not flat.")
            .unwrap();
        let unrelated = model
            .embed("The United Nations was established in 1945.")
            .unwrap();

        let near = cosine_similarity(&claim, &related);
        let far = cosine_similarity(&claim, &unrelated);
        assert!(near > 0.3, "shared vocabulary should score, got {}", near);
        assert!(near > far);
    }

    #[test]
    fn test_plural_folding() {
        let model = HashedBagOfWordsModel::new(384);
        let a = model.embed("vaccines").unwrap();
        let b = model.embed("vaccine").unwrap();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let vec = vec![1.0, 0.0, 0.0];
        let similarity = cosine_similarity(&vec, &vec);
        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let vec1 = vec![1.0, 0.0, 0.0];
        let vec2 = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&vec1, &vec2).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }
}
