//! HTTP server for the Tally API.
//!
//! # API Endpoints
//!
//! | Method | Path      | Description                                  |
//! |--------|-----------|----------------------------------------------|
//! | GET    | `/count`  | Count records matching `column=value` params |
//! | GET    | `/health` | Health check with dataset summary            |

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::Method,
    response::{Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::count;
use super::types::HealthResponse;
use crate::config::ServerConfig;
use crate::dataset::Dataset;
use crate::error::ServerResult;

/// State shared by every request. The dataset is never written after load.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

/// Build the application router around a loaded dataset.
pub fn router(dataset: Arc<Dataset>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/count", get(count_handler))
        .route("/health", get(health))
        .with_state(AppState { dataset })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process is stopped.
pub async fn start_server(config: &ServerConfig, dataset: Dataset) -> ServerResult<()> {
    let app = router(Arc::new(dataset));
    let addr = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Tally server running on http://{}", listener.local_addr()?);
    tracing::info!("   GET /count?column=value  - Count matching records");
    tracing::info!("   GET /health              - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Count endpoint. Query pairs arrive in order; undecodable escapes are
/// replaced with U+FFFD by the URL decoder.
async fn count_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    count::handle(params, &state.dataset)
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "tally".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.dataset.len(),
        columns: state.dataset.columns().to_vec(),
    })
}
