use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Diagnostic, EnrichedRecommendation, Recommendations},
    routes::AppState,
    services::enrich,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default)]
    pub pad: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub k: Option<usize>,
    pub pad: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<EnrichedRecommendation>,
    pub diagnostic: Option<Diagnostic>,
}

/// Handler for title-keyed recommendations
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let options = state.settings.options(request.k, request.pad)?;

    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        k = options.k,
        "Processing recommendation request"
    );

    let result = state.dataset.recommend(&request.title, options);
    let response = respond(&state, request.title, result).await;

    tracing::info!(
        request_id = %request_id,
        returned = response.recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}

/// Handler for index-keyed recommendations
pub async fn similar(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(index): Path<usize>,
    Query(params): Query<SimilarQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let options = state.settings.options(params.k, params.pad)?;

    let item = state
        .dataset
        .catalog()
        .get(index)
        .ok_or_else(|| AppError::NotFound(format!("No title at index {}", index)))?;
    let query = item.title.clone();

    tracing::info!(
        request_id = %request_id,
        index,
        k = options.k,
        "Processing similar-titles request"
    );

    let result = state.dataset.recommend_by_index(index, options);
    Ok(Json(respond(&state, query, result).await))
}

async fn respond(state: &AppState, query: String, result: Recommendations) -> RecommendationResponse {
    let Recommendations { items, diagnostic } = result;
    let recommendations = enrich(
        state.metadata.clone(),
        items,
        state.settings.metadata_timeout,
    )
    .await;

    RecommendationResponse {
        query,
        recommendations,
        diagnostic,
    }
}
