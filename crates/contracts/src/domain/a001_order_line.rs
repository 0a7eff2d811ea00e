use serde::{Deserialize, Serialize};

/// Store-wide statistics over raw order rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_records: i64,
    pub unique_orders: i64,
    pub unique_products: i64,
    pub refunded_orders: i64,
    pub valid_orders: i64,
    pub total_order_quantity: i64,
    pub total_discount_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatsResponse {
    pub success: bool,
    pub stats: StoreStats,
}

/// Distinct paid dates available in the store (`YYYY-MM-DD`, sorted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableDatesResponse {
    pub success: bool,
    pub dates: Vec<String>,
    pub count: usize,
}
