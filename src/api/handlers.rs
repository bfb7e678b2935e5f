//! API Handlers
//!
//! HTTP request handlers for each lookup service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::lookup::LookupContext;
use crate::models::{ClearResponse, HealthResponse, LookupQuery, LookupResponse, StatsResponse};
use crate::sources::{Source, SourceRegistry};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registered lookup sources
    pub sources: Arc<SourceRegistry<String>>,
}

impl AppState {
    pub fn new(sources: SourceRegistry<String>) -> Self {
        Self {
            sources: Arc::new(sources),
        }
    }

    fn source(&self, name: &str) -> Result<&Source<String>> {
        self.sources
            .get(name)
            .ok_or_else(|| ApiError::UnknownSource(name.to_string()))
    }
}

/// Handler for GET /lookup/:source/:key
///
/// Runs the key through the named source, cache first.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path((source, key)): Path<(String, String)>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>> {
    let source = state.source(&source)?;

    let ctx = match query.timeout() {
        Some(timeout) => LookupContext::new().with_timeout(timeout),
        None => LookupContext::new(),
    };
    let value = source.lookup(&ctx, &key).await?;

    Ok(Json(LookupResponse::new(source.name(), key, value)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let sources = state
        .sources
        .iter()
        .map(|source| (source.name().to_string(), source.stats()))
        .collect();

    Json(StatsResponse { sources })
}

/// Handler for DELETE /cache/:source
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<ClearResponse>> {
    let source = state.source(&source)?;
    let cleared = source.clear_cache();

    Ok(Json(ClearResponse::new(source.name(), cleared)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
