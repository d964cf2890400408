//! In-memory fakes for the service traits, recording every call.

#![allow(dead_code)]

use async_trait::async_trait;
use ragchat::config::Config;
use ragchat::embedding::Embedder;
use ragchat::error::{Error, Result};
use ragchat::generation::Generator;
use ragchat::index::VectorIndex;
use ragchat::models::{CollectionSchema, Distance, IndexedPoint, SearchHit, TaskType};
use ragchat::services::Services;
use serde_json::json;
use std::sync::{Arc, Mutex};

// ─── Embedder ───────────────────────────────────────────────────────

pub struct FakeEmbedder {
    pub fail: bool,
    /// Fail on the n-th call (0-based), if set.
    pub fail_at: Option<usize>,
    pub calls: Mutex<Vec<(String, TaskType)>>,
}

impl FakeEmbedder {
    pub fn ok() -> Self {
        Self {
            fail: false,
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::ok()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn model_name(&self) -> &str {
        "fake-embedder"
    }

    async fn embed(&self, text: &str, task: TaskType) -> Result<Vec<f32>> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), task));
            calls.len() - 1
        };
        if self.fail || self.fail_at == Some(n) {
            return Err(Error::Embedding("quota exceeded".into()));
        }
        Ok(vec![text.len() as f32; 4])
    }
}

// ─── Vector index ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum IndexCall {
    Probe(String),
    Create(String, CollectionSchema),
    Delete(String),
    Upsert(String, String, Vec<IndexedPoint>),
    Search(String, String, usize),
}

pub enum ProbeResult {
    Missing,
    Exists(CollectionSchema),
    Fails,
}

pub struct FakeIndex {
    pub probe: ProbeResult,
    pub hits: Option<Vec<SearchHit>>,
    pub calls: Mutex<Vec<IndexCall>>,
}

impl FakeIndex {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            probe: ProbeResult::Missing,
            hits: Some(hits),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_search() -> Self {
        Self {
            hits: None,
            ..Self::with_hits(Vec::new())
        }
    }

    pub fn with_probe(probe: ProbeResult) -> Self {
        Self {
            probe,
            ..Self::with_hits(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<IndexCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn searches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, IndexCall::Search(..)))
            .count()
    }

    pub fn creates(&self) -> Vec<CollectionSchema> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                IndexCall::Create(_, schema) => Some(schema),
                _ => None,
            })
            .collect()
    }

    pub fn upserted(&self) -> Vec<Vec<IndexedPoint>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                IndexCall::Upsert(_, _, points) => Some(points),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: IndexCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn collection_schema(&self, name: &str) -> Result<Option<CollectionSchema>> {
        self.record(IndexCall::Probe(name.to_string()));
        match &self.probe {
            ProbeResult::Missing => Ok(None),
            ProbeResult::Exists(schema) => Ok(Some(schema.clone())),
            ProbeResult::Fails => Err(Error::Index("connection refused".into())),
        }
    }

    async fn create_collection(&self, name: &str, schema: &CollectionSchema) -> Result<()> {
        self.record(IndexCall::Create(name.to_string(), schema.clone()));
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.record(IndexCall::Delete(name.to_string()));
        Ok(())
    }

    async fn upsert(&self, name: &str, vector_name: &str, points: &[IndexedPoint]) -> Result<()> {
        self.record(IndexCall::Upsert(
            name.to_string(),
            vector_name.to_string(),
            points.to_vec(),
        ));
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        _vector: &[f32],
        vector_name: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        self.record(IndexCall::Search(
            name.to_string(),
            vector_name.to_string(),
            limit,
        ));
        self.hits
            .clone()
            .ok_or_else(|| Error::Index("search timed out".into()))
    }
}

// ─── Generator ──────────────────────────────────────────────────────

pub enum GenerateResult {
    Text(String),
    Empty,
    Fails,
}

pub struct FakeGenerator {
    pub result: GenerateResult,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn answering(text: &str) -> Self {
        Self::new(GenerateResult::Text(text.to_string()))
    }

    pub fn new(result: GenerateResult) -> Self {
        Self {
            result,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    fn model_name(&self) -> &str {
        "fake-generator"
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.result {
            GenerateResult::Text(t) => Ok(Some(t.clone())),
            GenerateResult::Empty => Ok(None),
            GenerateResult::Fails => Err(Error::Generation("model overloaded".into())),
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn text_hit(text: &str) -> SearchHit {
    SearchHit {
        score: Some(0.9),
        payload: json!({ "text": text }).as_object().cloned(),
    }
}

pub fn dense_768() -> CollectionSchema {
    CollectionSchema {
        vector_name: "dense".to_string(),
        dims: 768,
        distance: Distance::Cosine,
    }
}

pub struct Harness {
    pub services: Services,
    pub embedder: Arc<FakeEmbedder>,
    pub index: Arc<FakeIndex>,
    pub generator: Arc<FakeGenerator>,
}

pub fn harness(
    config: Config,
    embedder: FakeEmbedder,
    index: FakeIndex,
    generator: FakeGenerator,
) -> Harness {
    let embedder = Arc::new(embedder);
    let index = Arc::new(index);
    let generator = Arc::new(generator);
    let services = Services::new(
        config,
        embedder.clone(),
        index.clone(),
        generator.clone(),
    );
    Harness {
        services,
        embedder,
        index,
        generator,
    }
}
