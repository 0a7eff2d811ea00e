use axum::{extract::Query, Json};
use contracts::dashboards::d200_category_summary::{
    CategorySummaryRequest, CategorySummaryResponse,
};

use super::{internal_error, ApiError};
use crate::dashboards::d200_category_summary::service;

/// GET /api/analyse/data — whole store when no bounds are given.
pub async fn get_summary(
    Query(request): Query<CategorySummaryRequest>,
) -> Result<Json<CategorySummaryResponse>, ApiError> {
    let response = service::get_summary(request)
        .await
        .map_err(|e| internal_error("Category summary failed", e))?;
    Ok(Json(response))
}

/// POST /api/analyse/data — same view, range in the JSON body.
pub async fn post_summary(
    Json(request): Json<CategorySummaryRequest>,
) -> Result<Json<CategorySummaryResponse>, ApiError> {
    let response = service::get_summary(request)
        .await
        .map_err(|e| internal_error("Category summary failed", e))?;
    Ok(Json(response))
}
