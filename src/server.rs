//! Chat HTTP server.
//!
//! A thin adapter over [`query::answer`]. Every chat response is HTTP 200;
//! failures are reported in the body, never through the status code.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/chat` | `{"message": "..."}` → `{"reply": "..."}` or `{"error": "..."}` |
//! | `GET`  | `/` | Liveness: `{"message": "Server is running!"}` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based chat
//! widgets can call the API from any site.

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::Error;
use crate::query;
use crate::services::Services;

pub const NO_MESSAGE: &str = "No message provided";

/// Body of `POST /chat`: exactly one of the two fields is set.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatResponse {
    Reply(String),
    Error(String),
}

/// Build the router with all routes and CORS applied.
pub fn router(services: Services) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/chat", post(handle_chat))
        .layer(cors)
        .with_state(services)
}

/// Starts the chat server on `[server] host:port`.
///
/// Runs until the process is terminated.
pub async fn run_server(services: Services) -> anyhow::Result<()> {
    let bind_addr = services.config.server.bind_addr();
    let app = router(services);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("chat server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_root() -> Json<Value> {
    Json(serde_json::json!({ "message": "Server is running!" }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for `POST /chat`.
///
/// The body is parsed by hand so malformed JSON is reported in the
/// `error` field instead of as an HTTP rejection.
async fn handle_chat(State(services): State<Services>, body: Bytes) -> Json<ChatResponse> {
    let question = match parse_message(&body) {
        Ok(q) => q,
        Err(e) => {
            warn!(error = %e, "rejected chat request");
            let message = match e {
                Error::Input(msg) => msg,
                other => other.to_string(),
            };
            return Json(ChatResponse::Error(message));
        }
    };

    let reply = query::answer(&services, &question).await;
    Json(ChatResponse::Reply(reply))
}

/// Extract a non-empty string `message` from a JSON request body.
///
/// Returns [`Error::Input`] carrying the parse error for malformed JSON, or
/// [`NO_MESSAGE`] when the field is missing, empty, or not a string.
pub fn parse_message(body: &[u8]) -> Result<String, Error> {
    let data: Value = serde_json::from_slice(body).map_err(|e| Error::Input(e.to_string()))?;

    match data.get("message").and_then(Value::as_str) {
        Some(m) if !m.is_empty() => Ok(m.to_string()),
        _ => Err(Error::Input(NO_MESSAGE.to_string())),
    }
}
