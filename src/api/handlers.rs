//! API Handlers
//!
//! HTTP request handlers for each property service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::response_cache::{ResponseCache, LIST_RESPONSE_KEY};
use crate::cache::CacheBackend;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::metrics::{CacheMetrics, MetricsReporter};
use crate::models::{
    CreatePropertyRequest, DeleteResponse, HealthResponse, PropertyListResponse,
    UpdatePropertyRequest,
};
use crate::properties::{InvalidationHook, MemoryRecordStore, PropertyCache, PropertyRecord};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of truth; its writes invalidate the aggregate
    pub records: Arc<MemoryRecordStore>,
    /// Cache-aside read path
    pub properties: Arc<PropertyCache>,
    pub metrics: Arc<MetricsReporter>,
    pub responses: ResponseCache,
}

impl AppState {
    /// Wires the read path, the invalidation hook and the metrics reporter
    /// around one cache backend and one record store.
    pub async fn new(
        cache: Arc<dyn CacheBackend>,
        records: Arc<MemoryRecordStore>,
        config: &Config,
    ) -> Self {
        let hook = Arc::new(InvalidationHook::new(cache.clone()));
        records.subscribe(hook.clone()).await;

        let properties = PropertyCache::new(cache.clone(), records.clone())
            .with_ttl(config.aggregate_ttl)
            .with_coalescing(config.coalesce_misses);
        let metrics = MetricsReporter::new(cache.clone()).with_invalidation_hook(hook);

        Self {
            records,
            properties: Arc::new(properties),
            metrics: Arc::new(metrics),
            responses: ResponseCache::new(cache, config.response_ttl),
        }
    }
}

/// Handler for GET /properties/
///
/// Serves `{"data": [...]}`, from the response cache while it holds a body,
/// otherwise through the cache-aside accessor.
pub async fn list_properties_handler(State(state): State<AppState>) -> Result<Response> {
    let body = match state.responses.lookup(LIST_RESPONSE_KEY).await? {
        Some(body) => body,
        None => {
            let data = state.properties.get_all_properties().await?;
            let body = serde_json::to_string(&PropertyListResponse::new(data))?;
            state.responses.store(LIST_RESPONSE_KEY, &body).await?;
            body
        }
    };

    let response = match state.responses.cache_control() {
        Some(cache_control) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (header::CACHE_CONTROL, cache_control),
            ],
            body,
        )
            .into_response(),
        None => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
    };
    Ok(response)
}

/// Handler for POST /properties/
pub async fn create_property_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyRecord>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let property = state.records.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(property.project())))
}

/// Handler for PUT /properties/:id
pub async fn update_property_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdatePropertyRequest>,
) -> Result<Json<PropertyRecord>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let property = state.records.update(id, req.into()).await?;
    Ok(Json(property.project()))
}

/// Handler for DELETE /properties/:id
pub async fn delete_property_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    state.records.delete(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /cache/metrics
///
/// Always 200; an unreachable backend is reported inside the body.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<CacheMetrics> {
    Json(state.metrics.get_cache_metrics().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
