//! Embedding service abstraction and the Gemini implementation.
//!
//! Defines the [`Embedder`] trait used by both pipelines and
//! [`GeminiEmbedder`], which calls the `embedContent` endpoint.
//! The same model and dimensionality are used for corpus chunks
//! ([`TaskType::RetrievalDocument`]) and questions ([`TaskType::RetrievalQuery`]),
//! so stored and query vectors are comparable.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gemini::GeminiClient;
use crate::models::TaskType;

/// Produces one embedding vector per text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"gemini-embedding-001"`).
    fn model_name(&self) -> &str;

    /// Embed `text`, tagged with the retrieval intent.
    async fn embed(&self, text: &str, task: TaskType) -> Result<Vec<f32>>;
}

/// Embedder backed by the Gemini `embedContent` API.
pub struct GeminiEmbedder {
    client: GeminiClient,
    model: String,
    dims: usize,
}

impl GeminiEmbedder {
    pub fn new(client: GeminiClient, config: &Config) -> Self {
        Self {
            client,
            model: config.gemini.embedding_model.clone(),
            dims: config.qdrant.dims,
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str, task: TaskType) -> Result<Vec<f32>> {
        let body = json!({
            "model": format!("models/{}", self.model.trim_start_matches("models/")),
            "content": { "parts": [{ "text": text }] },
            "taskType": task,
            "outputDimensionality": self.dims,
        });

        let json = self
            .client
            .call(&self.model, "embedContent", &body)
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        let vector = parse_embedding_response(&json)?;
        debug!(dims = vector.len(), ?task, "embedding received");
        Ok(vector)
    }
}

/// Extract `embedding.values` from an `embedContent` response.
fn parse_embedding_response(json: &serde_json::Value) -> Result<Vec<f32>> {
    let values = json
        .get("embedding")
        .and_then(|e| e.get("values"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::Embedding("response is missing embedding.values".to_string()))?;

    let vector = values
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| Error::Embedding("embedding contains a non-numeric value".to_string()))
        })
        .collect::<Result<Vec<f32>>>()?;

    if vector.is_empty() {
        return Err(Error::Embedding("embedding is empty".to_string()));
    }

    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let json = json!({ "embedding": { "values": [0.5, -1.0, 2] } });
        assert_eq!(parse_embedding_response(&json).unwrap(), vec![0.5, -1.0, 2.0]);
    }

    #[test]
    fn test_parse_missing_embedding() {
        let json = json!({ "error": "nope" });
        assert!(matches!(
            parse_embedding_response(&json),
            Err(Error::Embedding(_))
        ));
    }

    #[test]
    fn test_parse_empty_or_non_numeric() {
        assert!(parse_embedding_response(&json!({ "embedding": { "values": [] } })).is_err());
        assert!(parse_embedding_response(&json!({ "embedding": { "values": ["x"] } })).is_err());
    }
}
