pub mod d200_category_summary;
pub mod d201_product_drilldown;
pub mod d202_period_report;
