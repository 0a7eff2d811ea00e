use axum::{extract::Query, Json};
use contracts::dashboards::d201_product_drilldown::{
    ProductDrilldownRequest, ProductDrilldownResponse,
};

use super::{bad_request, internal_error, ApiError};
use crate::dashboards::d201_product_drilldown::service;

/// GET /api/analyse/product-details
pub async fn get_drilldown(
    Query(request): Query<ProductDrilldownRequest>,
) -> Result<Json<ProductDrilldownResponse>, ApiError> {
    if request.product_type.is_empty() {
        return Err(bad_request("缺少商品类型参数"));
    }
    if request.start_date.is_empty() || request.end_date.is_empty() {
        return Err(bad_request("缺少日期参数"));
    }

    let response = service::get_drilldown(request)
        .await
        .map_err(|e| internal_error("Product drilldown failed", e))?;
    Ok(Json(response))
}
