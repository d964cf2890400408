//! Core data models used throughout ragchat.
//!
//! These types represent the documents, chunks, index points, and search hits
//! that flow through the indexing and query pipelines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// A raw text file read from the corpus.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// A contiguous slice of the concatenated corpus text.
///
/// `start` and `len` are measured in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: usize,
    pub len: usize,
    pub text: String,
}

/// Intent flag sent with every embedding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Question text embedded at query time.
    RetrievalQuery,
    /// Corpus content embedded at indexing time.
    RetrievalDocument,
}

/// Similarity metric of a named vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    Euclid,
    Dot,
    Manhattan,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distance::Cosine => "Cosine",
            Distance::Euclid => "Euclid",
            Distance::Dot => "Dot",
            Distance::Manhattan => "Manhattan",
        };
        f.write_str(name)
    }
}

/// Vector schema of a collection: one named vector field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub vector_name: String,
    pub dims: usize,
    pub distance: Distance,
}

impl fmt::Display for CollectionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vector '{}' ({} dims, {})",
            self.vector_name, self.dims, self.distance
        )
    }
}

/// The persisted unit in the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoint {
    /// Chunk sequence number, dense from 0.
    pub id: u64,
    pub vector: Vec<f32>,
    /// Chunk text, stored under the `text` payload key.
    pub text: String,
}

/// A similarity-search result after normalization at the index boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHit {
    pub score: Option<f32>,
    pub payload: Option<Map<String, Value>>,
}

impl SearchHit {
    /// The `text` payload value, when present and a string.
    pub fn text(&self) -> Option<&str> {
        self.payload.as_ref()?.get("text")?.as_str()
    }
}
