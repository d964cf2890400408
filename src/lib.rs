//! # ragchat
//!
//! A retrieval-augmented chat backend.
//!
//! Two independent pipelines share one vector collection:
//!
//! ```text
//!  indexing (offline)
//!  ┌────────┐   ┌─────────┐   ┌────────────┐   ┌──────────────┐
//!  │ corpus │──▶│ chunker │──▶│  embedder  │──▶│ Qdrant upsert │
//!  │  *.md  │   │ 500/50  │   │ (document) │   │  "dense" 768  │
//!  └────────┘   └─────────┘   └────────────┘   └──────┬───────┘
//!                                                     │
//!  query (per request)                                ▼
//!  ┌──────────┐   ┌────────────┐   ┌──────────────┐   ┌───────────┐
//!  │ question │──▶│  embedder  │──▶│ Qdrant top-k │──▶│ generator │──▶ reply
//!  └──────────┘   │  (query)   │   └──────────────┘   └───────────┘
//!                 └────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`error`] | Service error taxonomy |
//! | [`models`] | Core data types |
//! | [`chunk`] | Fixed-size overlapping chunker |
//! | [`corpus`] | Corpus discovery and concatenation |
//! | [`gemini`] | Shared Gemini HTTP client |
//! | [`embedding`] | Embedding service trait and Gemini implementation |
//! | [`generation`] | Completion service trait and Gemini implementation |
//! | [`index`] | Vector index trait and Qdrant implementation |
//! | [`services`] | Process-wide client bundle |
//! | [`ingest`] | Indexing pipeline |
//! | [`query`] | Query pipeline |
//! | [`progress`] | Indexing progress reporting |
//! | [`server`] | Chat HTTP server |

pub mod chunk;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod index;
pub mod ingest;
pub mod models;
pub mod progress;
pub mod query;
pub mod server;
pub mod services;
