use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::TitleSummary,
    routes::AppState,
    services::featured_titles,
    store::DatasetInfo,
};

const DEFAULT_FEATURED: usize = 3;
const MAX_FEATURED: usize = 20;

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    count: Option<usize>,
}

/// Handler for the title picklist, in catalog order
pub async fn list(State(state): State<AppState>) -> Json<Vec<TitleSummary>> {
    let titles = state
        .dataset
        .catalog()
        .items()
        .iter()
        .map(TitleSummary::from)
        .collect();
    Json(titles)
}

/// Handler for randomly featured titles
pub async fn featured(
    State(state): State<AppState>,
    Query(params): Query<FeaturedQuery>,
) -> AppResult<Json<Vec<TitleSummary>>> {
    let count = params.count.unwrap_or(DEFAULT_FEATURED);
    if count > MAX_FEATURED {
        return Err(AppError::InvalidInput(format!(
            "count must be at most {}",
            MAX_FEATURED
        )));
    }

    let titles = featured_titles(state.dataset.catalog(), count, &mut rand::rng());
    Ok(Json(titles))
}

/// Handler for dataset consistency info
pub async fn dataset_info(State(state): State<AppState>) -> Json<DatasetInfo> {
    Json(state.dataset.info())
}
