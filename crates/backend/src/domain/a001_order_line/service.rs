use anyhow::Result;
use contracts::domain::a001_order_line::StoreStats;
use std::collections::BTreeSet;

use super::repository::{self, Model};
use crate::shared::analytics::pipeline::{self, RawLine};
use crate::shared::analytics::refund::{self, RefundPolicy};

/// Project a stored row onto the pipeline's input view.
pub fn to_raw_line(model: &Model) -> RawLine {
    RawLine {
        product_name: model.product_name.clone(),
        paid_at: model.paid_at.clone(),
        quantity: model.quantity,
        discounted_amount: model.discounted_amount,
        refund_status: model.refund_status.clone(),
        shop_type: model.shop_type.clone(),
    }
}

/// Load the aggregation window as pipeline input.
pub async fn load_window(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Vec<RawLine>> {
    let models = repository::list_by_date_range(start_date, end_date).await?;
    Ok(models.iter().map(to_raw_line).collect())
}

/// Store-wide statistics. Structural counts come from the store;
/// refund-dependent figures are computed here with the same exclusion
/// predicate the aggregation pipeline uses.
pub async fn store_stats(policy: RefundPolicy) -> Result<StoreStats> {
    let total_records = repository::count_total().await?;
    let unique_orders = repository::count_unique_orders().await?;
    let unique_products = repository::count_unique_products().await?;

    let mut refunded_orders = 0i64;
    let mut valid_orders = 0i64;
    let mut total_order_quantity = 0i64;
    let mut total_discount_amount = 0f64;

    for (refund_status, quantity, discounted_amount) in repository::list_refund_slim().await? {
        if refund::is_excluded(refund_status.as_deref(), policy) {
            refunded_orders += 1;
        } else {
            valid_orders += 1;
            total_order_quantity += quantity.unwrap_or(0.0) as i64;
            total_discount_amount += discounted_amount.unwrap_or(0.0);
        }
    }

    Ok(StoreStats {
        total_records,
        unique_orders,
        unique_products,
        refunded_orders,
        valid_orders,
        total_order_quantity,
        total_discount_amount,
    })
}

/// Distinct calendar dates (`YYYY-MM-DD`) that carry paid orders.
pub async fn available_dates() -> Result<Vec<String>> {
    let timestamps = repository::list_paid_timestamps().await?;

    let dates: BTreeSet<String> = timestamps
        .iter()
        .filter_map(|ts| pipeline::parse_paid_date(ts))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    Ok(dates.into_iter().collect())
}
