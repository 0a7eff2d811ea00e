use anyhow::Result;
use contracts::dashboards::d200_category_summary::{CategorySummaryRequest, CategorySummaryResponse};

use crate::domain::{a001_order_line, a002_product_mapping, a003_category};
use crate::shared::analytics::pipeline;
use crate::shared::analytics::refund::RefundPolicy;
use crate::shared::analytics::rollup;

/// Category summary: one tab per category with per-type overall and
/// per-channel totals for the (optionally open) date window, plus the
/// unmatched-product work queue.
pub async fn get_summary(request: CategorySummaryRequest) -> Result<CategorySummaryResponse> {
    let categories = a003_category::repository::list_ordered().await?;
    let index = a002_product_mapping::service::load_mapping_index().await?;
    tracing::info!(
        "Category summary: {} categories, {} mapping rows",
        categories.len(),
        index.len()
    );

    let rows = a001_order_line::service::load_window(
        request.start_date.as_deref(),
        request.end_date.as_deref(),
    )
    .await?;
    tracing::info!("Category summary: {} order lines in window", rows.len());

    let batch = pipeline::resolve_lines(&rows, &index, RefundPolicy::default());
    let totals = rollup::accumulate_totals(&batch.lines);
    let tabs = rollup::build_tabs(&categories, index.catalog(), &totals);

    Ok(CategorySummaryResponse {
        tabs,
        unmatched_products: batch.unmatched.into_iter().collect(),
    })
}
