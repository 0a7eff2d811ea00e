use axum::Json;
use contracts::domain::a001_order_line::{
    AvailableDatesResponse, StoreStatsResponse,
};

use super::{internal_error, ApiError};
use crate::domain::a001_order_line::service;
use crate::shared::analytics::refund::RefundPolicy;

/// GET /api/db/stats
pub async fn get_store_stats() -> Result<Json<StoreStatsResponse>, ApiError> {
    let stats = service::store_stats(RefundPolicy::default())
        .await
        .map_err(|e| internal_error("Store stats failed", e))?;

    Ok(Json(StoreStatsResponse {
        success: true,
        stats,
    }))
}

/// GET /api/analyse/dates
pub async fn get_available_dates() -> Result<Json<AvailableDatesResponse>, ApiError> {
    let dates = service::available_dates()
        .await
        .map_err(|e| internal_error("Available dates failed", e))?;

    let count = dates.len();
    Ok(Json(AvailableDatesResponse {
        success: true,
        dates,
        count,
    }))
}
