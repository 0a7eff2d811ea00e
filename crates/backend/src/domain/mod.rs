pub mod a001_order_line;
pub mod a002_product_mapping;
pub mod a003_category;
