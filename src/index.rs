//! Vector index abstraction and the Qdrant REST implementation.
//!
//! The [`VectorIndex`] trait is the only seam the pipelines see. Search hits
//! pass through [`normalize_hit`] before anything else inspects them, so the
//! shape of the wire response never leaks past this module.
//!
//! # Endpoints used
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET` | `/collections/{name}` | probe + schema |
//! | `PUT` | `/collections/{name}` | create |
//! | `DELETE` | `/collections/{name}` | drop (for `--recreate`) |
//! | `PUT` | `/collections/{name}/points?wait=true` | bulk upsert |
//! | `POST` | `/collections/{name}/points/search` | top-k similarity search |

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::QdrantConfig;
use crate::error::{Error, Result};
use crate::models::{CollectionSchema, Distance, IndexedPoint, SearchHit};

/// Payload key holding the chunk text.
pub const PAYLOAD_KEY_TEXT: &str = "text";

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Probe a collection. `Ok(None)` means it does not exist.
    ///
    /// When the collection exists but its vectors cannot be described as a
    /// single named field, the returned schema has `vector_name` set to
    /// whatever was found (possibly empty) so callers report a mismatch.
    async fn collection_schema(&self, name: &str) -> Result<Option<CollectionSchema>>;

    async fn create_collection(&self, name: &str, schema: &CollectionSchema) -> Result<()>;

    /// Drop a collection. Succeeds when it was already absent.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert or replace all `points` in one call, storing vectors under `vector_name`.
    async fn upsert(&self, name: &str, vector_name: &str, points: &[IndexedPoint]) -> Result<()>;

    async fn search(
        &self,
        name: &str,
        vector: &[f32],
        vector_name: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>>;
}

/// Convert one raw search hit into a [`SearchHit`].
///
/// A payload that is missing, `null`, or not an object becomes `None`.
pub fn normalize_hit(raw: &Value) -> SearchHit {
    let payload = raw
        .get("payload")
        .and_then(Value::as_object)
        .filter(|p| !p.is_empty())
        .cloned();
    let score = raw.get("score").and_then(Value::as_f64).map(|s| s as f32);
    SearchHit { score, payload }
}

/// Qdrant client speaking the REST API.
pub struct QdrantIndex {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantIndex {
    /// # Errors
    ///
    /// Returns an error if no URL is configured (`QDRANT_HOST`).
    pub fn new(config: &QdrantConfig) -> anyhow::Result<Self> {
        let base_url = config
            .url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| anyhow::anyhow!("QDRANT_HOST environment variable not set"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder, what: &str) -> Result<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Index(format!("{} failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Index(format!("{} failed ({}): {}", what, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Index(format!("{} returned invalid JSON: {}", what, e)))
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn collection_schema(&self, name: &str) -> Result<Option<CollectionSchema>> {
        let response = self
            .request(reqwest::Method::GET, &format!("/collections/{}", name))
            .send()
            .await
            .map_err(|e| Error::Index(format!("get collection failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Index(format!(
                "get collection failed ({}): {}",
                status, body
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("get collection returned invalid JSON: {}", e)))?;

        let vectors = json
            .pointer("/result/config/params/vectors")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(Some(parse_vectors_config(&vectors)))
    }

    async fn create_collection(&self, name: &str, schema: &CollectionSchema) -> Result<()> {
        let body = json!({
            "vectors": {
                schema.vector_name.clone(): {
                    "size": schema.dims,
                    "distance": schema.distance,
                }
            }
        });
        self.send(
            self.request(reqwest::Method::PUT, &format!("/collections/{}", name))
                .json(&body),
            "create collection",
        )
        .await?;
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/collections/{}", name))
            .send()
            .await
            .map_err(|e| Error::Index(format!("delete collection failed: {}", e)))?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Index(format!(
            "delete collection failed ({}): {}",
            status, body
        )))
    }

    async fn upsert(&self, name: &str, vector_name: &str, points: &[IndexedPoint]) -> Result<()> {
        let points: Vec<Value> = points
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "vector": { vector_name: p.vector },
                    "payload": { PAYLOAD_KEY_TEXT: p.text },
                })
            })
            .collect();

        self.send(
            self.request(
                reqwest::Method::PUT,
                &format!("/collections/{}/points?wait=true", name),
            )
            .json(&json!({ "points": points })),
            "upsert",
        )
        .await?;
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        vector: &[f32],
        vector_name: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let body = json!({
            "vector": { "name": vector_name, "vector": vector },
            "limit": limit,
            "with_payload": true,
        });

        let json = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    &format!("/collections/{}/points/search", name),
                )
                .json(&body),
                "search",
            )
            .await?;

        let hits: Vec<SearchHit> = json
            .get("result")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(normalize_hit).collect())
            .ok_or_else(|| Error::Index("search response is missing result array".to_string()))?;

        debug!(collection = name, hits = hits.len(), "search complete");
        Ok(hits)
    }
}

/// Describe Qdrant's `params.vectors` object as a single named field.
///
/// Named config: `{"dense": {"size": 768, "distance": "Cosine"}}`.
/// Unnamed config: `{"size": 768, "distance": "Cosine"}` (reported with an empty name).
fn parse_vectors_config(vectors: &Value) -> CollectionSchema {
    let describe = |name: &str, params: &Map<String, Value>| CollectionSchema {
        vector_name: name.to_string(),
        dims: params.get("size").and_then(Value::as_u64).unwrap_or(0) as usize,
        distance: params
            .get("distance")
            .cloned()
            .and_then(|d| serde_json::from_value(d).ok())
            .unwrap_or(Distance::Cosine),
    };

    match vectors.as_object() {
        Some(obj) if obj.contains_key("size") => describe("", obj),
        Some(obj) => match (obj.len(), obj.iter().next()) {
            (1, Some((name, Value::Object(params)))) => describe(name.as_str(), params),
            _ => unknown_schema(&obj.keys().cloned().collect::<Vec<_>>().join(",")),
        },
        None => unknown_schema(""),
    }
}

fn unknown_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        vector_name: name.to_string(),
        dims: 0,
        distance: Distance::Cosine,
    }
}
