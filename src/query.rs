//! Query pipeline: embed → search → extract → compose → generate.
//!
//! [`answer`] never fails. Each stage catches its own error and turns it
//! into a fixed, user-facing string; the HTTP layer only ever relays the
//! returned text.

use tracing::{debug, error, info, warn};

use crate::models::{SearchHit, TaskType};
use crate::services::Services;

pub const EMBEDDING_FAILED: &str = "Sorry, embedding generation failed.";
pub const SEARCH_FAILED: &str = "Sorry, failed to search the knowledge base.";
pub const NO_CONTEXT: &str = "Sorry, I couldn't find relevant context to answer that.";
pub const NO_ANSWER: &str = "No answer generated.";
pub const GENERATION_FAILED: &str = "Sorry, failed to generate an answer.";

/// Answer `question` using context retrieved from the configured collection.
pub async fn answer(services: &Services, question: &str) -> String {
    info!(question, "answering question");
    let config = &services.config;

    let vector = match services
        .embedder
        .embed(question, TaskType::RetrievalQuery)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "error generating embedding");
            return EMBEDDING_FAILED.to_string();
        }
    };
    debug!(dims = vector.len(), "question embedded");

    let hits = match services
        .index
        .search(
            &config.qdrant.collection,
            &vector,
            &config.qdrant.vector_name,
            config.retrieval.top_k,
        )
        .await
    {
        Ok(hits) => hits,
        Err(e) => {
            error!(error = %e, "error searching vector index");
            return SEARCH_FAILED.to_string();
        }
    };

    let contexts = extract_context(&hits);
    info!(hits = hits.len(), usable = contexts.len(), "retrieved context");
    if contexts.is_empty() {
        return NO_CONTEXT.to_string();
    }

    let prompt = build_prompt(&contexts, question);
    debug!(prompt_chars = prompt.chars().count(), "prompt composed");

    match services.generator.generate(&prompt).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            warn!("generation returned no text");
            NO_ANSWER.to_string()
        }
        Err(e) => {
            error!(error = %e, "error generating response");
            GENERATION_FAILED.to_string()
        }
    }
}

/// Collect the `text` payload of every hit that has one, in rank order.
pub fn extract_context(hits: &[SearchHit]) -> Vec<String> {
    hits.iter()
        .filter_map(|hit| hit.text().map(str::to_string))
        .collect()
}

/// Prompt instructing the model to answer only from `contexts`.
pub fn build_prompt(contexts: &[String], question: &str) -> String {
    format!(
        "Answer the question based ONLY on the following context:\n\n{:?}\n\nQuestion: {}\nAnswer:",
        contexts, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn hit(payload: Option<serde_json::Value>) -> SearchHit {
        SearchHit {
            score: Some(1.0),
            payload: payload.and_then(|p| p.as_object().cloned()),
        }
    }

    #[test]
    fn test_extract_skips_unusable_hits() {
        let hits = vec![
            hit(Some(json!({ "text": "A" }))),
            hit(None),
            hit(Some(json!({ "title": "no text" }))),
            hit(Some(json!({ "text": 7 }))),
            hit(Some(json!({ "text": "B" }))),
        ];
        assert_eq!(extract_context(&hits), vec!["A", "B"]);
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract_context(&[]).is_empty());
        let empty = SearchHit {
            score: None,
            payload: Some(Map::new()),
        };
        assert!(extract_context(&[empty]).is_empty());
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt(&["A".to_string(), "B".to_string()], "What is X?");
        assert_eq!(
            prompt,
            "Answer the question based ONLY on the following context:\n\n[\"A\", \"B\"]\n\nQuestion: What is X?\nAnswer:"
        );
    }
}
