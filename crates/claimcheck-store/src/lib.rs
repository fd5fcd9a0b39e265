//! claimcheck Storage Layer
//!
//! Implements the EvidenceStore trait using SQLite + an HNSW vector index.
//!
//! # Architecture
//!
//! - SQLite holds every document with its metadata and embedding
//! - HNSW answers nearest-neighbour queries; it is rebuilt from SQLite on open
//! - A local embedding model vectorises text at insert and query time
//! - Query results are re-sorted by `similarity + access boost`
//!
//! # Examples
//!
//! ```no_run
//! use claimcheck_store::SqliteEvidenceStore;
//!
//! let store = SqliteEvidenceStore::in_memory().unwrap();
//! // Store is now ready for evidence operations
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod embedding;
pub mod error;
pub mod seed;
pub mod vector_index;

pub use config::StoreConfig;
pub use error::StoreError;

use claimcheck_domain::credibility::{credibility_for, extract_domain, infer_source_type};
use claimcheck_domain::traits::EvidenceStore;
use claimcheck_domain::{EvidenceDocument, EvidenceId, NewEvidence, ScoredEvidence, SourceType};
use embedding::{cosine_similarity, EmbeddingModel, HashedBagOfWordsModel};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use vector_index::VectorIndex;

const SELECT_COLUMNS: &str = "SELECT id, text, embedding, source_url, domain, source_type, \
     credibility, details, access_count, inserted_at, last_accessed_at FROM evidence";

/// SQLite-backed evidence store with an in-memory HNSW index
///
/// # Thread Safety
///
/// The connection and the index each sit behind a mutex, so one store can be
/// shared through an `Arc` by concurrent verification calls. Every operation
/// is atomic per document; there is no cross-call isolation.
pub struct SqliteEvidenceStore {
    conn: Mutex<Connection>,
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingModel>,
    config: StoreConfig,
}

impl SqliteEvidenceStore {
    /// Open (or create) a store at `path` with default configuration
    ///
    /// Use `:memory:` for an in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open an in-memory store with default configuration
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    /// Open a store with an explicit configuration and the default embedder
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let embedder = Arc::new(HashedBagOfWordsModel::new(config.embedding_dimension));
        Self::open_with_embedder(path, config, embedder)
    }

    /// Open a store with a custom embedding model
    pub fn open_with_embedder<P: AsRef<Path>>(
        path: P,
        config: StoreConfig,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> Result<Self, StoreError> {
        config.validate().map_err(StoreError::Config)?;
        if embedder.dimension() != config.embedding_dimension {
            return Err(StoreError::Config(format!(
                "embedder produces {} dimensions, store expects {}",
                embedder.dimension(),
                config.embedding_dimension
            )));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let store = Self {
            conn: Mutex::new(conn),
            index: VectorIndex::new(config.embedding_dimension),
            embedder,
            config,
        };
        store.rebuild_index()?;
        Ok(store)
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn rebuild_index(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, embedding FROM evidence")?;
        let rows = stmt
            .query_map([], |row| {
                let id: Vec<u8> = row.get(0)?;
                let embedding: String = row.get(1)?;
                Ok((id, embedding))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (id_bytes, embedding_json) in &rows {
            let id = bytes_to_evidence_id(id_bytes)?;
            let embedding: Vec<f32> = serde_json::from_str(embedding_json)
                .map_err(|e| StoreError::InvalidData(format!("embedding for {}: {}", id, e)))?;
            self.index.add(id, &embedding)?;
        }

        if !rows.is_empty() {
            info!(documents = rows.len(), "Rebuilt vector index from database");
        }
        Ok(())
    }

    /// Embed and prepare one row for insertion
    fn prepare(&self, evidence: NewEvidence) -> Result<EvidenceDocument, StoreError> {
        if evidence.text.trim().is_empty() {
            return Err(StoreError::InvalidData(
                "evidence text must not be empty".to_string(),
            ));
        }

        let embedding = self.embedder.embed(&evidence.text)?;
        let domain = extract_domain(&evidence.source_url);
        let now_millis = now_millis();
        let inserted_at = evidence.timestamp.unwrap_or(now_millis / 1000);

        Ok(EvidenceDocument {
            id: EvidenceId::derive(&evidence.text, now_millis),
            credibility: credibility_for(&domain),
            source_type: evidence
                .source_type
                .unwrap_or_else(|| infer_source_type(&domain)),
            domain,
            text: evidence.text,
            embedding,
            source_url: evidence.source_url,
            details: evidence.details,
            access_count: 0,
            inserted_at,
            last_accessed_at: None,
        })
    }

    fn write_row(conn: &Connection, doc: &EvidenceDocument) -> Result<(), StoreError> {
        let embedding_json = serde_json::to_string(&doc.embedding)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        conn.execute(
            "INSERT INTO evidence (id, text, embedding, source_url, domain, source_type, credibility, details, access_count, inserted_at, last_accessed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                evidence_id_to_bytes(doc.id),
                &doc.text,
                embedding_json,
                &doc.source_url,
                &doc.domain,
                doc.source_type.as_str(),
                doc.credibility,
                &doc.details,
                doc.access_count as i64,
                doc.inserted_at as i64,
                doc.last_accessed_at.map(|t| t as i64),
            ],
        )?;
        Ok(())
    }

    fn load(conn: &Connection, id: EvidenceId) -> Result<Option<EvidenceDocument>, StoreError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let doc = conn
            .query_row(&sql, params![evidence_id_to_bytes(id)], row_to_document)
            .optional()?;
        Ok(doc)
    }

    /// Remove every document and empty the vector index
    pub fn reset(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM evidence", [])?;
        self.index.clear()?;
        info!(removed, "Evidence store reset");
        Ok(removed)
    }

    /// All documents in insertion order
    pub fn all(&self) -> Result<Vec<EvidenceDocument>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("{} ORDER BY inserted_at, rowid", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let docs = stmt
            .query_map([], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }
}

impl EvidenceStore for SqliteEvidenceStore {
    type Error = StoreError;

    fn insert(&self, evidence: NewEvidence) -> Result<EvidenceId, Self::Error> {
        let doc = self.prepare(evidence)?;
        {
            let conn = self.conn()?;
            Self::write_row(&conn, &doc)?;
        }
        self.index.add(doc.id, &doc.embedding)?;
        debug!(id = %doc.id, domain = %doc.domain, "Inserted evidence");
        Ok(doc.id)
    }

    fn insert_batch(&self, evidence: Vec<NewEvidence>) -> Result<Vec<EvidenceId>, Self::Error> {
        if evidence.is_empty() {
            return Ok(Vec::new());
        }

        let docs = evidence
            .into_iter()
            .map(|e| self.prepare(e))
            .collect::<Result<Vec<_>, _>>()?;

        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            for doc in &docs {
                Self::write_row(&tx, doc)?;
            }
            tx.commit()?;
        }

        for doc in &docs {
            self.index.add(doc.id, &doc.embedding)?;
        }
        debug!(count = docs.len(), "Inserted evidence batch");
        Ok(docs.iter().map(|d| d.id).collect())
    }

    fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredEvidence>, Self::Error> {
        if text.trim().is_empty() || top_k == 0 || self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text)?;
        let neighbours = self
            .index
            .search(&query_embedding, top_k, self.config.ef_search)?;

        let conn = self.conn()?;
        let mut hits = Vec::with_capacity(neighbours.len());
        for (id, _) in neighbours {
            // Rows removed by a concurrent reset simply drop out
            let Some(document) = Self::load(&conn, id)? else {
                continue;
            };
            let similarity = cosine_similarity(&query_embedding, &document.embedding) as f64;
            let score = similarity + self.config.boost_for(document.access_count);
            hits.push(ScoredEvidence {
                document,
                similarity,
                score,
            });
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(query = text, hits = hits.len(), "Evidence query");
        Ok(hits)
    }

    fn increment_access(&self, id: EvidenceId) -> Result<(), Self::Error> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE evidence SET access_count = access_count + 1, last_accessed_at = ?2 WHERE id = ?1",
            params![evidence_id_to_bytes(id), (now_millis() / 1000) as i64],
        )?;
        if updated == 0 {
            debug!(id = %id, "increment_access on unknown id ignored");
        }
        Ok(())
    }

    fn get(&self, id: EvidenceId) -> Result<Option<EvidenceDocument>, Self::Error> {
        let conn = self.conn()?;
        Self::load(&conn, id)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM evidence", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn evidence_id_to_bytes(id: EvidenceId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

fn bytes_to_evidence_id(bytes: &[u8]) -> Result<EvidenceId, StoreError> {
    if bytes.len() != 16 {
        return Err(StoreError::InvalidData(format!(
            "Expected 16 bytes for EvidenceId, got {}",
            bytes.len()
        )));
    }
    let mut arr = [0u8; 16];
    arr.copy_from_slice(bytes);
    Ok(EvidenceId::from_value(u128::from_be_bytes(arr)))
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<EvidenceDocument> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = bytes_to_evidence_id(&id_bytes).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
    })?;

    let embedding_json: String = row.get(2)?;
    let embedding: Vec<f32> = serde_json::from_str(&embedding_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let source_type: String = row.get(5)?;
    let last_accessed_at: Option<i64> = row.get(10)?;

    Ok(EvidenceDocument {
        id,
        text: row.get(1)?,
        embedding,
        source_url: row.get(3)?,
        domain: row.get(4)?,
        source_type: SourceType::parse(&source_type),
        credibility: row.get(6)?,
        details: row.get(7)?,
        access_count: row.get::<_, i64>(8)?.max(0) as u64,
        inserted_at: row.get::<_, i64>(9)? as u64,
        last_accessed_at: last_accessed_at.map(|t| t as u64),
    })
}
