use axum::body::Body;
use axum::http::header;
use axum::response::Response;
use axum::Json;
use contracts::dashboards::d202_period_report::{PeriodReportRequest, PeriodReportResponse};
use contracts::system::auth::TokenClaims;

use super::{bad_request, internal_error, ApiError};
use crate::dashboards::d202_period_report::service;
use crate::system::auth::extractor::CurrentUser;
use crate::system::operation_log::repository as operation_log;

/// POST /api/analyse/generate-report
pub async fn generate_report(
    Json(request): Json<PeriodReportRequest>,
) -> Result<Json<PeriodReportResponse>, ApiError> {
    if request.start_date.is_empty() || request.end_date.is_empty() {
        return Err(bad_request("缺少日期参数"));
    }

    let response = service::get_report(request)
        .await
        .map_err(|e| internal_error("Report generation failed", e))?;
    Ok(Json(response))
}

/// POST /api/analyse/export-weekly-report — returns the PDF byte stream.
pub async fn export_weekly_report(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<PeriodReportRequest>,
) -> Result<Response, ApiError> {
    if request.start_date.is_empty() || request.end_date.is_empty() {
        return Err(bad_request("缺少日期参数"));
    }

    let detail = serde_json::json!({
        "start_date": request.start_date,
        "end_date": request.end_date,
    });

    let (file_name, bytes) = match service::export_pdf(request).await {
        Ok(result) => result,
        Err(e) => {
            log_export(&claims, detail, "failed", Some(e.to_string())).await;
            return Err(internal_error("PDF export failed", e));
        }
    };

    log_export(&claims, detail, "success", None).await;

    // RFC 5987 encoding keeps the CJK file name intact.
    let encoded = urlencoding::encode(&file_name).into_owned();
    Response::builder()
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename*=UTF-8''{}", encoded),
        )
        .body(Body::from(bytes))
        .map_err(|e| internal_error("PDF response build failed", e.into()))
}

async fn log_export(
    claims: &TokenClaims,
    detail: serde_json::Value,
    result: &str,
    error_message: Option<String>,
) {
    if let Err(e) = operation_log::log_operation(
        &claims.username,
        &claims.role,
        "export_weekly_report",
        detail,
        result,
        error_message,
    )
    .await
    {
        tracing::warn!("Failed to write operation log: {}", e);
    }
}
