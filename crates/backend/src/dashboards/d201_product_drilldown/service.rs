use anyhow::{bail, Result};
use contracts::dashboards::d201_product_drilldown::{
    ProductDrilldownRequest, ProductDrilldownResponse, SalesCurve,
};
use contracts::enums::SalesChannel;
use std::collections::HashMap;

use crate::domain::{a001_order_line, a002_product_mapping};
use crate::shared::analytics::buckets::{BucketSeries, Granularity};
use crate::shared::analytics::pipeline;
use crate::shared::analytics::refund::RefundPolicy;

/// Per-product drill-down: a gap-filled sales curve at range-derived
/// granularity, per-channel series, the average order value and the
/// channel quantity split. Aggregates every raw name that resolves to
/// the requested canonical type.
pub async fn get_drilldown(request: ProductDrilldownRequest) -> Result<ProductDrilldownResponse> {
    if request.product_type.is_empty() {
        bail!("缺少商品类型参数");
    }
    let (start, end) = request.parse_dates()?;

    let granularity = Granularity::for_range(start, end);
    tracing::info!(
        "Drilldown for {}: {} ~ {} ({} granularity)",
        request.product_type,
        request.start_date,
        request.end_date,
        granularity.as_str()
    );

    let index = a002_product_mapping::service::load_mapping_index().await?;
    let rows = a001_order_line::service::load_window(
        Some(&request.start_date),
        Some(&request.end_date),
    )
    .await?;

    let batch = pipeline::resolve_lines(&rows, &index, RefundPolicy::default());

    let mut series = BucketSeries::new(start, end, granularity);
    let mut total_quantity = 0i64;
    let mut total_amount = 0f64;
    let mut channel_sales: HashMap<String, i64> = SalesChannel::named()
        .into_iter()
        .map(|c| (c.key().to_string(), 0))
        .collect();

    for line in batch
        .lines
        .iter()
        .filter(|l| l.mapped_title == request.product_type)
    {
        series.add(line.paid_date, line.channel, line.quantity, line.amount);
        total_quantity += line.quantity;
        total_amount += line.amount;

        if line.channel != SalesChannel::Other {
            *channel_sales.entry(line.channel.key().to_string()).or_insert(0) += line.quantity;
        }
    }

    let average_order_value = if total_quantity > 0 {
        (total_amount / total_quantity as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    Ok(ProductDrilldownResponse {
        success: true,
        product_type: request.product_type,
        aggregation_level: granularity.as_str().to_string(),
        sales_curve: SalesCurve {
            dates: series.labels().to_vec(),
            overall: series.overall_block(),
            channels: series.channel_blocks(),
        },
        average_order_value,
        channel_sales,
    })
}

