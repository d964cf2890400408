//! Generative completion service abstraction and the Gemini implementation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::gemini::GeminiClient;

/// Turns a prompt into answer text.
#[async_trait]
pub trait Generator: Send + Sync {
    fn model_name(&self) -> &str;

    /// Returns `Ok(None)` when the service responded without any text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

/// Generator backed by the Gemini `generateContent` API.
pub struct GeminiGenerator {
    client: GeminiClient,
    model: String,
}

impl GeminiGenerator {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let json = self
            .client
            .call(&self.model, "generateContent", &body)
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        let parsed: GenerateResponse =
            serde_json::from_value(json).map_err(|e| Error::Generation(e.to_string()))?;

        let text = first_candidate_text(parsed);
        debug!(has_text = text.is_some(), "generation finished");
        Ok(text)
    }
}

/// Joined text parts of the first candidate that carries content.
fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().find_map(|c| c.content)?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
