use axum::Json;
use contracts::usecases::u101_upload_orders::{UploadRequest, UploadResponse};

use super::{bad_request, internal_error, ApiError};
use crate::system::auth::extractor::CurrentUser;
use crate::system::operation_log::repository as operation_log;
use crate::usecases::u101_upload_orders::executor;

/// POST /api/db/upload — ingest one parsed spreadsheet.
pub async fn upload(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    if request.rows.is_empty() {
        return Err(bad_request("没有数据"));
    }

    let file_name = request.file_name.clone();
    tracing::info!("Upload request from {}: {}", claims.username, file_name);

    match executor::upload(request).await {
        Ok(response) => {
            log_upload(&claims, &file_name, Some(&response), "success", None).await;
            Ok(Json(response))
        }
        Err(e) => {
            log_upload(&claims, &file_name, None, "failed", Some(e.to_string())).await;
            Err(internal_error("Upload failed", e))
        }
    }
}

async fn log_upload(
    claims: &contracts::system::auth::TokenClaims,
    file_name: &str,
    response: Option<&UploadResponse>,
    result: &str,
    error_message: Option<String>,
) {
    let detail = match response {
        Some(r) => serde_json::json!({
            "filename": file_name,
            "total": r.total,
            "success_count": r.success_count,
            "duplicate_count": r.duplicate_count,
            "error_count": r.error_count,
            "filtered_count": r.filtered_count,
        }),
        None => serde_json::json!({ "filename": file_name }),
    };

    if let Err(e) = operation_log::log_operation(
        &claims.username,
        &claims.role,
        "upload_orders",
        detail,
        result,
        error_message,
    )
    .await
    {
        tracing::warn!("Failed to write operation log: {}", e);
    }
}
