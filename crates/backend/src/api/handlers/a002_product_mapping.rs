use axum::{extract::Query, Json};
use contracts::domain::a002_product_mapping::{
    MappingSearchRequest, MappingSearchResponse, MappingUpsertRequest,
};

use super::{bad_request, internal_error, ApiError};
use crate::domain::a002_product_mapping::service;

/// GET /api/product-manage/search
pub async fn search(
    Query(request): Query<MappingSearchRequest>,
) -> Result<Json<MappingSearchResponse>, ApiError> {
    let page = request.page.max(1);
    let page_size = request.page_size.clamp(1, 200);

    let (data, total) = service::search(request.keyword.as_deref(), page, page_size)
        .await
        .map_err(|e| internal_error("Mapping search failed", e))?;

    Ok(Json(MappingSearchResponse {
        success: true,
        data,
        total,
        page,
        page_size,
    }))
}

/// POST /api/product-manage/mapping — curation upsert.
pub async fn upsert(
    Json(request): Json<MappingUpsertRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(bad_request("缺少商品名称"));
    }

    service::upsert(
        request.name.trim(),
        request.alias,
        request.mapped_title,
        request.category,
        request.reviewed,
    )
    .await
    .map_err(|e| internal_error("Mapping upsert failed", e))?;

    Ok(Json(serde_json::json!({ "success": true })))
}
