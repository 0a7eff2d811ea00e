use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::domain::a001_order_line::repository::Model;

/// Shop name of the operationally excluded data-entry channel. Rows
/// from it are filtered out before hashing and never reach the store.
pub const EXCLUDED_SHOP_NAME: &str = "金蝶对接";

/// Export header carrying the shop name.
pub const SHOP_NAME_HEADER: &str = "店铺名称";

/// Export headers with a typed column in a001_order_line. Everything
/// else ends up in the row's `extra` JSON blob.
const TYPED_HEADERS: [(&str, TypedColumn); 18] = [
    ("店铺类型", TypedColumn::ShopType),
    ("店铺名称", TypedColumn::ShopName),
    ("单据编号", TypedColumn::DocumentNo),
    ("订单类型", TypedColumn::OrderType),
    ("拍单时间", TypedColumn::OrderedAt),
    ("付款时间", TypedColumn::PaidAt),
    ("商品代码", TypedColumn::ProductCode),
    ("商品名称", TypedColumn::ProductName),
    ("规格名称", TypedColumn::SpecName),
    ("订购数", TypedColumn::Quantity),
    ("标准金额", TypedColumn::StandardAmount),
    ("实际金额", TypedColumn::ActualAmount),
    ("让利后金额", TypedColumn::DiscountedAmount),
    ("让利金额", TypedColumn::DiscountAmount),
    ("是否退款", TypedColumn::RefundStatus),
    ("平台单号", TypedColumn::PlatformOrderNo),
    ("平台交易状态", TypedColumn::PlatformStatus),
    ("地区信息", TypedColumn::RegionInfo),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypedColumn {
    ShopType,
    ShopName,
    DocumentNo,
    OrderType,
    OrderedAt,
    PaidAt,
    ProductCode,
    ProductName,
    SpecName,
    Quantity,
    StandardAmount,
    ActualAmount,
    DiscountedAmount,
    DiscountAmount,
    RefundStatus,
    PlatformOrderNo,
    PlatformStatus,
    RegionInfo,
}

/// Per-row coercion failure. Isolated to its row; the batch continues.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("invalid number in column {column}: {value:?}")]
    InvalidNumber { column: String, value: String },
}

/// Stable content hash over every raw field: values sorted by column
/// name, missing/empty normalized to the empty string, joined with a
/// delimiter and digested. Identical field values always produce the
/// same hash regardless of row position or upload batch.
pub fn content_hash(row: &HashMap<String, String>) -> String {
    let sorted: BTreeMap<&str, &str> = row
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let joined = sorted.values().cloned().collect::<Vec<_>>().join("|");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Collapse in-file duplicates, keeping the first occurrence of each
/// content hash.
pub fn dedupe_rows(rows: Vec<HashMap<String, String>>) -> Vec<(String, HashMap<String, String>)> {
    let mut seen = std::collections::HashSet::new();
    let mut deduped = Vec::with_capacity(rows.len());

    for row in rows {
        let hash = content_hash(&row);
        if seen.insert(hash.clone()) {
            deduped.push((hash, row));
        }
    }

    deduped
}

pub fn is_excluded_source(row: &HashMap<String, String>) -> bool {
    row.get(SHOP_NAME_HEADER).map(String::as_str) == Some(EXCLUDED_SHOP_NAME)
}

/// Coerce one raw row into a storable model. Unknown headers are kept
/// as a JSON object with deterministic key order.
pub fn build_model(
    hash: &str,
    row: &HashMap<String, String>,
    loaded_at_utc: &str,
) -> Result<Model, RowError> {
    let mut model = Model {
        record_hash: hash.to_string(),
        shop_type: None,
        shop_name: None,
        document_no: None,
        order_type: None,
        ordered_at: None,
        paid_at: None,
        product_code: None,
        product_name: String::new(),
        spec_name: None,
        quantity: None,
        standard_amount: None,
        actual_amount: None,
        discounted_amount: None,
        discount_amount: None,
        refund_status: None,
        platform_order_no: None,
        platform_status: None,
        region_info: None,
        extra: None,
        loaded_at_utc: loaded_at_utc.to_string(),
    };

    let mut extra: BTreeMap<&str, &str> = BTreeMap::new();

    for (header, value) in row {
        let typed = TYPED_HEADERS
            .iter()
            .find(|(h, _)| *h == header.as_str())
            .map(|(_, c)| *c);

        let Some(column) = typed else {
            if !value.is_empty() {
                extra.insert(header.as_str(), value.as_str());
            }
            continue;
        };

        match column {
            TypedColumn::ShopType => model.shop_type = opt_text(value),
            TypedColumn::ShopName => model.shop_name = opt_text(value),
            TypedColumn::DocumentNo => model.document_no = opt_text(value),
            TypedColumn::OrderType => model.order_type = opt_text(value),
            TypedColumn::OrderedAt => model.ordered_at = opt_text(value),
            TypedColumn::PaidAt => model.paid_at = opt_text(value),
            TypedColumn::ProductCode => model.product_code = opt_text(value),
            TypedColumn::ProductName => model.product_name = value.trim().to_string(),
            TypedColumn::SpecName => model.spec_name = opt_text(value),
            TypedColumn::Quantity => model.quantity = opt_number(header, value)?,
            TypedColumn::StandardAmount => model.standard_amount = opt_number(header, value)?,
            TypedColumn::ActualAmount => model.actual_amount = opt_number(header, value)?,
            TypedColumn::DiscountedAmount => model.discounted_amount = opt_number(header, value)?,
            TypedColumn::DiscountAmount => model.discount_amount = opt_number(header, value)?,
            TypedColumn::RefundStatus => model.refund_status = opt_text(value),
            TypedColumn::PlatformOrderNo => model.platform_order_no = opt_text(value),
            TypedColumn::PlatformStatus => model.platform_status = opt_text(value),
            TypedColumn::RegionInfo => model.region_info = opt_text(value),
        }
    }

    if !extra.is_empty() {
        // BTreeMap keys serialize in sorted order, keeping the blob stable.
        model.extra = serde_json::to_string(&extra).ok();
    }

    Ok(model)
}

fn opt_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn opt_number(column: &str, value: &str) -> Result<Option<f64>, RowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| RowError::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_hash_is_stable_across_identical_rows() {
        let a = row(&[("商品名称", "熊猫挂件"), ("订购数", "2"), ("付款时间", "")]);
        let b = row(&[("付款时间", ""), ("订购数", "2"), ("商品名称", "熊猫挂件")]);
        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_hash_differs_on_any_field_change() {
        let a = row(&[("商品名称", "熊猫挂件"), ("订购数", "2")]);
        let b = row(&[("商品名称", "熊猫挂件"), ("订购数", "3")]);
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let rows = vec![
            row(&[("商品名称", "A"), ("订购数", "1")]),
            row(&[("商品名称", "A"), ("订购数", "1")]),
            row(&[("商品名称", "B"), ("订购数", "1")]),
        ];
        let deduped = dedupe_rows(rows);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].1["商品名称"], "A");
        assert_eq!(deduped[1].1["商品名称"], "B");
    }

    #[test]
    fn test_excluded_source_detection() {
        assert!(is_excluded_source(&row(&[("店铺名称", "金蝶对接")])));
        assert!(!is_excluded_source(&row(&[("店铺名称", "天猫旗舰店")])));
        assert!(!is_excluded_source(&row(&[("商品名称", "A")])));
    }

    #[test]
    fn test_build_model_typed_and_extra() {
        let raw = row(&[
            ("商品名称", "熊猫挂件-蓝"),
            ("订购数", "2.0"),
            ("让利后金额", "100.5"),
            ("是否退款", "退款成功"),
            ("买家备注", "尽快发货"),
        ]);
        let model = build_model("abc", &raw, "2025-01-01T00:00:00Z").unwrap();

        assert_eq!(model.product_name, "熊猫挂件-蓝");
        assert_eq!(model.quantity, Some(2.0));
        assert_eq!(model.discounted_amount, Some(100.5));
        assert_eq!(model.refund_status.as_deref(), Some("退款成功"));
        assert_eq!(
            model.extra.as_deref(),
            Some(r#"{"买家备注":"尽快发货"}"#)
        );
    }

    #[test]
    fn test_empty_numbers_are_null_bad_numbers_are_errors() {
        let ok = row(&[("商品名称", "A"), ("订购数", "")]);
        let model = build_model("h", &ok, "t").unwrap();
        assert_eq!(model.quantity, None);

        let bad = row(&[("商品名称", "A"), ("订购数", "两件")]);
        let err = build_model("h", &bad, "t").unwrap_err();
        assert!(matches!(err, RowError::InvalidNumber { .. }));
    }
}
