//! Indexing pipeline orchestration.
//!
//! Coordinates the full offline flow: ensure collection → read corpus →
//! chunk → embed each chunk → one bulk upsert. Any service error aborts the
//! run; nothing is retried or resumed at this level, and points are only
//! written once every chunk has been embedded.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::chunk::chunk_text;
use crate::config::Config;
use crate::corpus;
use crate::error::Error;
use crate::models::{Chunk, CollectionSchema, Distance, Document, IndexedPoint, TaskType};
use crate::progress::{IndexProgressEvent, IndexProgressReporter};
use crate::services::Services;

/// Options for one indexing run.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
    /// Drop and recreate the collection before upserting.
    pub recreate: bool,
}

/// What an indexing run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub documents: usize,
    pub chunks: usize,
    pub points_upserted: usize,
    pub collection_created: bool,
}

/// The corpus as read from disk and its chunks.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    pub documents: Vec<Document>,
    pub chunks: Vec<Chunk>,
}

/// The schema every collection managed by ragchat must have.
pub fn expected_schema(config: &Config) -> CollectionSchema {
    CollectionSchema {
        vector_name: config.qdrant.vector_name.clone(),
        dims: config.qdrant.dims,
        distance: Distance::Cosine,
    }
}

/// Read and chunk the corpus without touching any service.
pub fn plan_chunks(config: &Config) -> Result<ChunkPlan> {
    let documents = corpus::read_documents(&config.corpus)?;
    let all_text = corpus::concatenate(&documents);
    let chunks = chunk_text(
        &all_text,
        config.chunking.chunk_size,
        config.chunking.overlap,
    )?;
    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        "corpus chunked"
    );
    Ok(ChunkPlan { documents, chunks })
}

/// Make sure the collection exists with the expected schema.
///
/// Returns `true` when a collection was created. An existing collection is
/// left untouched unless `recreate` is set; if its schema differs from the
/// configured one, [`Error::SchemaMismatch`] is returned. A failed probe is
/// treated as "absent" and followed by a create.
pub async fn ensure_collection(services: &Services, recreate: bool) -> Result<bool> {
    let name = &services.config.qdrant.collection;
    let expected = expected_schema(&services.config);

    if recreate {
        info!(collection = %name, "recreating collection");
        services.index.delete_collection(name).await?;
        services.index.create_collection(name, &expected).await?;
        return Ok(true);
    }

    match services.index.collection_schema(name).await {
        Ok(Some(found)) => {
            if found != expected {
                return Err(Error::SchemaMismatch {
                    collection: name.clone(),
                    expected: expected.to_string(),
                    found: found.to_string(),
                }
                .into());
            }
            info!(collection = %name, "collection already exists");
            Ok(false)
        }
        Ok(None) => {
            info!(collection = %name, "creating collection");
            services.index.create_collection(name, &expected).await?;
            Ok(true)
        }
        Err(e) => {
            warn!(collection = %name, error = %e, "collection probe failed, creating it");
            services.index.create_collection(name, &expected).await?;
            Ok(true)
        }
    }
}

/// Run the full indexing pipeline.
pub async fn run_index(
    services: &Services,
    options: IndexOptions,
    progress: &dyn IndexProgressReporter,
) -> Result<IndexSummary> {
    let config = &services.config;
    let collection = &config.qdrant.collection;

    let collection_created = ensure_collection(services, options.recreate).await?;

    let plan = plan_chunks(config)?;
    progress.report(IndexProgressEvent::Chunked {
        documents: plan.documents.len() as u64,
        chunks: plan.chunks.len() as u64,
    });

    let total = plan.chunks.len() as u64;
    let mut points = Vec::with_capacity(plan.chunks.len());
    for chunk in &plan.chunks {
        let vector = services
            .embedder
            .embed(&chunk.text, TaskType::RetrievalDocument)
            .await
            .with_context(|| format!("Failed to embed chunk {}", chunk.index))?;

        points.push(IndexedPoint {
            id: chunk.index as u64,
            vector,
            text: chunk.text.clone(),
        });
        progress.report(IndexProgressEvent::Embedding {
            n: points.len() as u64,
            total,
        });
    }

    if !points.is_empty() {
        progress.report(IndexProgressEvent::Upserting {
            points: points.len() as u64,
        });
        services
            .index
            .upsert(collection, &config.qdrant.vector_name, &points)
            .await
            .with_context(|| format!("Failed to upsert points into '{}'", collection))?;
    }

    info!(
        collection = %collection,
        points = points.len(),
        "indexing complete"
    );

    Ok(IndexSummary {
        documents: plan.documents.len(),
        chunks: plan.chunks.len(),
        points_upserted: points.len(),
        collection_created,
    })
}

/// Print the run summary on stdout.
pub fn print_summary(summary: &IndexSummary, collection: &str) {
    println!("index {}", collection);
    println!("  documents read: {}", summary.documents);
    println!("  chunks: {}", summary.chunks);
    println!("  points upserted: {}", summary.points_upserted);
    if summary.collection_created {
        println!("  collection created");
    }
    println!("ok");
}

/// Print what a run would do, without calling any service.
pub fn print_dry_run(plan: &ChunkPlan, collection: &str) {
    println!("index {} (dry-run)", collection);
    println!("  documents found: {}", plan.documents.len());
    println!("  chunks: {}", plan.chunks.len());
}
