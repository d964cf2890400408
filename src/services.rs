//! Process-wide client bundle.
//!
//! [`Services`] is built once at startup and handed to the indexing run,
//! the query pipeline, and the HTTP server. Cloning is cheap: every field
//! is an `Arc`.

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::embedding::{Embedder, GeminiEmbedder};
use crate::gemini::GeminiClient;
use crate::generation::{GeminiGenerator, Generator};
use crate::index::{QdrantIndex, VectorIndex};

#[derive(Clone)]
pub struct Services {
    pub config: Arc<Config>,
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    pub generator: Arc<dyn Generator>,
}

impl Services {
    /// Bundle arbitrary implementations (tests inject fakes here).
    pub fn new(
        config: Config,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            embedder,
            index,
            generator,
        }
    }

    /// Construct the Gemini and Qdrant clients from configuration.
    ///
    /// # Errors
    ///
    /// Fails when `GOOGLE_API_KEY` or `QDRANT_HOST` is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = GeminiClient::new(&config.gemini)?;
        let embedder = GeminiEmbedder::new(gemini.clone(), config);
        let generator = GeminiGenerator::new(gemini, config.gemini.generation_model.clone());
        let index = QdrantIndex::new(&config.qdrant)?;

        Ok(Self::new(
            config.clone(),
            Arc::new(embedder),
            Arc::new(index),
            Arc::new(generator),
        ))
    }
}
