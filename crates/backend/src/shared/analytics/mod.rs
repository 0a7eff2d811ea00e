//! The read-side aggregation core: raw order rows are filtered by
//! refund status, resolved to canonical product types, classified into
//! sales channels, grouped into time buckets and rolled up into
//! category tabs. Every output surface (category summary, drill-down,
//! period report, PDF export) goes through these same functions.

pub mod buckets;
pub mod channel;
pub mod pipeline;
pub mod refund;
pub mod resolver;
pub mod rollup;
