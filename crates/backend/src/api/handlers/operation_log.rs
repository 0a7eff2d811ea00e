use axum::Json;
use contracts::system::operation_log::OperationLogListResponse;

use super::{internal_error, ApiError};
use crate::system::operation_log::repository;

const DEFAULT_LIMIT: u64 = 200;

/// GET /api/system/operation-log (admin only)
pub async fn list_recent() -> Result<Json<OperationLogListResponse>, ApiError> {
    let data = repository::list_recent(DEFAULT_LIMIT)
        .await
        .map_err(|e| internal_error("Operation log listing failed", e))?;

    Ok(Json(OperationLogListResponse {
        success: true,
        data,
    }))
}
