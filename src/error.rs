//! Error taxonomy shared by the service adapters and the chunker.
//!
//! Each external collaborator has its own variant so the query pipeline can
//! map a failure to the user-facing string of the stage that produced it.
//! Orchestration code (CLI, indexing run) wraps these in `anyhow::Error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The embedding request failed or returned a malformed response.
    #[error("embedding service error: {0}")]
    Embedding(String),

    /// A collection probe, create, delete, upsert, or search call failed.
    #[error("vector index error: {0}")]
    Index(String),

    /// The completion request failed or could not be decoded.
    #[error("generation service error: {0}")]
    Generation(String),

    /// A required request field was missing or unusable.
    #[error("invalid input: {0}")]
    Input(String),

    #[error("invalid chunking parameters: overlap ({overlap}) must be smaller than chunk_size ({chunk_size}) and chunk_size must be > 0")]
    InvalidChunking { chunk_size: usize, overlap: usize },

    /// An existing collection does not match the configured vector schema.
    #[error("collection '{collection}' schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch {
        collection: String,
        expected: String,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
