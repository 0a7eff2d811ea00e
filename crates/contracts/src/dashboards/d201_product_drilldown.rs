use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request for the per-product drill-down. The date range is required;
/// bucket granularity is derived from its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDrilldownRequest {
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl ProductDrilldownRequest {
    /// Validated inclusive date range; both bounds are required.
    pub fn parse_dates(&self) -> anyhow::Result<(NaiveDate, NaiveDate)> {
        super::d202_period_report::parse_date_range(&self.start_date, &self.end_date)
    }
}

/// Parallel series for one curve: one slot per bucket label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesBlock {
    pub quantities: Vec<i64>,
    pub amounts: Vec<f64>,
    /// round(amount / quantity) per bucket, 0 where quantity is 0.
    pub average_prices: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesCurve {
    /// Gap-filled bucket labels spanning the whole range.
    pub dates: Vec<String>,
    pub overall: SeriesBlock,
    /// Keyed by channel key (`douyin`, `tmall`, `youzan`, `jd`).
    pub channels: HashMap<String, SeriesBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDrilldownResponse {
    pub success: bool,
    pub product_type: String,
    /// `day` | `week` | `month` | `quarter` | `year`.
    pub aggregation_level: String,
    pub sales_curve: SalesCurve,
    pub average_order_value: f64,
    /// Total valid quantity per named channel over the whole range.
    pub channel_sales: HashMap<String, i64>,
}
