pub mod a002_product_mapping;
pub mod d200_category_summary;
pub mod d201_product_drilldown;
pub mod d202_period_report;
pub mod operation_log;
pub mod stats;
pub mod u101_upload_orders;

use axum::http::StatusCode;
use axum::Json;

/// JSON error body plus status, the error shape every route shares.
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

pub fn internal_error(context: &str, err: anyhow::Error) -> ApiError {
    tracing::error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}
