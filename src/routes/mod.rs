use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::{Padding, RankOptions},
    services::MetadataProvider,
    store::Dataset,
};

pub mod recommendations;
pub mod titles;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    pub settings: RankSettings,
}

/// Request-independent ranking settings
#[derive(Debug, Clone, Copy)]
pub struct RankSettings {
    pub default_k: usize,
    pub max_k: usize,
    pub pad_results: bool,
    pub metadata_timeout: Duration,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RankSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_k: config.default_k,
            max_k: config.max_k,
            pad_results: config.pad_results,
            metadata_timeout: config.metadata_timeout(),
        }
    }
}

impl RankSettings {
    /// Resolves request overrides into ranker options, rejecting out-of-range `k`
    pub fn options(&self, k: Option<usize>, pad: Option<bool>) -> AppResult<RankOptions> {
        let k = k.unwrap_or(self.default_k);
        if k == 0 || k > self.max_k {
            return Err(AppError::InvalidInput(format!(
                "k must be between 1 and {}",
                self.max_k
            )));
        }

        let padding = if pad.unwrap_or(self.pad_results) {
            Padding::FillFromCatalog
        } else {
            Padding::None
        };

        Ok(RankOptions { k, padding })
    }
}

impl AppState {
    pub fn new(dataset: Dataset, settings: RankSettings) -> Self {
        Self {
            dataset: Arc::new(dataset),
            metadata: None,
            settings,
        }
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dataset", get(titles::dataset_info))
        .route("/titles", get(titles::list))
        .route("/titles/featured", get(titles::featured))
        .route("/titles/:index/similar", get(recommendations::similar))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
