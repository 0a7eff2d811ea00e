use anyhow::Result;
use chrono::Utc;
use contracts::usecases::u101_upload_orders::{UploadRequest, UploadResponse};
use sea_orm::TransactionTrait;

use super::row::{self, EXCLUDED_SHOP_NAME};
use crate::domain::a001_order_line::repository;
use crate::shared::data::db::get_connection;

/// Ingest one uploaded batch.
///
/// In-file duplicates collapse first; rows from the excluded source
/// channel are filtered before hashing; each remaining row inserts
/// independently (content-hash conflict counts as duplicate, any other
/// failure as error) inside a single transaction committed at the end.
/// Partial success per row is the model, not all-or-nothing.
pub async fn upload(request: UploadRequest) -> Result<UploadResponse> {
    let row_count = request.rows.len();
    let deduped = row::dedupe_rows(request.rows);
    let total = deduped.len();
    tracing::info!(
        "Upload '{}': {} rows, {} after in-file dedup",
        request.file_name,
        row_count,
        total
    );

    let (excluded, candidates): (Vec<_>, Vec<_>) = deduped
        .into_iter()
        .partition(|(_, row)| row::is_excluded_source(row));
    let filtered_count = excluded.len();

    if candidates.is_empty() {
        tracing::warn!("Upload '{}': nothing left after filtering", request.file_name);
        return Ok(UploadResponse {
            success: true,
            total,
            success_count: 0,
            duplicate_count: 0,
            error_count: 0,
            filtered_count,
            warning: None,
        });
    }

    let mut success_count = 0;
    let mut duplicate_count = 0;
    let mut error_count = 0;

    let loaded_at = Utc::now().to_rfc3339();

    // Single transaction per batch; the unique index on record_hash is
    // the only concurrency guard against parallel uploads.
    let db = get_connection();
    let txn = db.begin().await?;

    for (idx, (hash, raw_row)) in candidates.iter().enumerate() {
        if idx > 0 && idx % 100 == 0 {
            tracing::info!("Upload progress: {} rows processed...", idx);
        }

        let model = match row::build_model(hash, raw_row, &loaded_at) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Row {} rejected: {}", idx, e);
                error_count += 1;
                continue;
            }
        };

        match repository::insert_or_ignore(&txn, model).await {
            Ok(true) => success_count += 1,
            Ok(false) => duplicate_count += 1,
            Err(e) => {
                tracing::warn!("Row {} failed to insert: {}", idx, e);
                error_count += 1;
            }
        }
    }

    txn.commit().await?;

    tracing::info!(
        "Upload '{}' finished: success={}, duplicate={}, error={}, filtered={}",
        request.file_name,
        success_count,
        duplicate_count,
        error_count,
        filtered_count
    );

    // Elevated condition: excluded-channel data already present in the
    // store surfaces as a warning on an otherwise successful response.
    let residual = repository::count_by_shop_name(EXCLUDED_SHOP_NAME).await?;
    let warning = if residual > 0 {
        Some(format!(
            "数据库中存在 {} 条\"{}\"记录，请联系管理员处理",
            residual, EXCLUDED_SHOP_NAME
        ))
    } else {
        None
    };

    Ok(UploadResponse {
        success: true,
        total,
        success_count,
        duplicate_count,
        error_count,
        filtered_count,
        warning,
    })
}
