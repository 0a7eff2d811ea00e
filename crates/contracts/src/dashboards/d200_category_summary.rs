use serde::{Deserialize, Serialize};

/// Request for the category summary view. Both bounds are optional;
/// an open bound means "from the first / to the last record".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummaryRequest {
    #[serde(default, rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, rename = "endDate")]
    pub end_date: Option<String>,
}

/// One canonical product type inside a tab, with overall and
/// per-channel totals for the filtered window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductTypeRow {
    pub product_type: String,
    pub valid_orders: i64,
    pub discount_amount: f64,
    pub douyin_orders: i64,
    pub douyin_amount: f64,
    pub tmall_orders: i64,
    pub tmall_amount: f64,
    pub youzan_orders: i64,
    pub youzan_amount: f64,
    pub jd_orders: i64,
    pub jd_amount: f64,
}

/// One category tab, in category id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTab {
    pub name: String,
    pub data: Vec<ProductTypeRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummaryResponse {
    pub tabs: Vec<CategoryTab>,
    /// Raw product names with no usable mapping. Never silently dropped;
    /// these are the curation work queue.
    pub unmatched_products: Vec<String>,
}
