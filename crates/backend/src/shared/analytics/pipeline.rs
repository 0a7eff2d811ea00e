use chrono::{NaiveDate, NaiveDateTime};
use contracts::enums::SalesChannel;
use std::collections::BTreeSet;

use super::channel;
use super::refund::{self, RefundPolicy};
use super::resolver::{MappingIndex, Resolution, UnmatchedSet};

/// A raw order line as read from the store, before resolution.
#[derive(Debug, Clone, Default)]
pub struct RawLine {
    pub product_name: String,
    /// Raw timestamp text; unparsable values exclude the line from all
    /// time-based aggregation.
    pub paid_at: Option<String>,
    pub quantity: Option<f64>,
    pub discounted_amount: Option<f64>,
    pub refund_status: Option<String>,
    pub shop_type: Option<String>,
}

/// One fully resolved, refund-filtered, classified order line.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    pub mapped_title: String,
    pub category_id: Option<i64>,
    pub paid_date: NaiveDate,
    pub quantity: i64,
    pub amount: f64,
    pub channel: SalesChannel,
}

/// Result of one pipeline pass over a window of raw rows.
#[derive(Debug, Default)]
pub struct ResolvedBatch {
    pub lines: Vec<ResolvedLine>,
    pub unmatched: UnmatchedSet,
    /// Dates that carry any refund-included data at all, resolved or
    /// not. The period report uses this to render blank cells for days
    /// with no trade versus explicit zeros.
    pub active_dates: BTreeSet<NaiveDate>,
}

/// The single resolution pass shared by every output surface: refund
/// filter, then timestamp validation, then exact-name resolution, then
/// channel classification. Each row is consumed by at most one
/// canonical type; resolution failure is a surfaced outcome, not an
/// error.
pub fn resolve_lines(
    rows: &[RawLine],
    index: &MappingIndex,
    policy: RefundPolicy,
) -> ResolvedBatch {
    let mut batch = ResolvedBatch::default();

    for row in rows {
        if refund::is_excluded(row.refund_status.as_deref(), policy) {
            continue;
        }

        let paid_date = match row.paid_at.as_deref().and_then(parse_paid_date) {
            Some(d) => d,
            None => continue,
        };

        batch.active_dates.insert(paid_date);

        let (mapped_title, category_id) = match index.resolve(&row.product_name) {
            Resolution::Matched {
                mapped_title,
                category_id,
            } => (mapped_title, category_id),
            Resolution::Unmatched => {
                batch.unmatched.insert(row.product_name.clone());
                continue;
            }
        };

        batch.lines.push(ResolvedLine {
            mapped_title,
            category_id,
            paid_date,
            // Quantities arrive as spreadsheet floats but are integral.
            quantity: row.quantity.unwrap_or(0.0) as i64,
            amount: row.discounted_amount.unwrap_or(0.0),
            channel: channel::classify(row.shop_type.as_deref()),
        });
    }

    batch
}

/// Lenient timestamp parsing for store values ("2025-01-03 14:22:05",
/// ISO variants, or bare dates). Anything else is treated as missing.
pub fn parse_paid_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::analytics::resolver::MappingRow;

    fn index() -> MappingIndex {
        MappingIndex::from_rows(vec![
            MappingRow {
                raw_name: "熊猫挂件-蓝".into(),
                mapped_title: Some("熊猫挂件".into()),
                category_id: Some(1),
            },
            MappingRow {
                raw_name: "熊猫挂件-红".into(),
                mapped_title: Some("熊猫挂件".into()),
                category_id: Some(1),
            },
        ])
    }

    fn line(name: &str, paid_at: &str, qty: f64, amount: f64) -> RawLine {
        RawLine {
            product_name: name.into(),
            paid_at: Some(paid_at.into()),
            quantity: Some(qty),
            discounted_amount: Some(amount),
            refund_status: None,
            shop_type: Some("天猫旗舰店".into()),
        }
    }

    #[test]
    fn test_refunded_lines_contribute_nothing() {
        let mut refunded = line("熊猫挂件-蓝", "2025-01-03 10:00:00", 5.0, 500.0);
        refunded.refund_status = Some("退款成功".into());
        let mut in_progress = line("熊猫挂件-红", "2025-01-03 11:00:00", 3.0, 300.0);
        in_progress.refund_status = Some("退款中".into());

        let batch = resolve_lines(
            &[refunded, in_progress],
            &index(),
            RefundPolicy::SucceededAndInProgress,
        );
        assert!(batch.lines.is_empty());
        // Excluded lines do not even mark the day as active.
        assert!(batch.active_dates.is_empty());
    }

    #[test]
    fn test_unmatched_names_are_collected_once() {
        let rows = vec![
            line("未知商品A", "2025-01-01 09:00:00", 1.0, 10.0),
            line("未知商品A", "2025-01-02 09:00:00", 2.0, 20.0),
            line("熊猫挂件-蓝", "2025-01-02 10:00:00", 1.0, 50.0),
        ];
        let batch = resolve_lines(&rows, &index(), RefundPolicy::default());

        assert_eq!(batch.lines.len(), 1);
        assert_eq!(
            batch.unmatched.iter().cloned().collect::<Vec<_>>(),
            vec!["未知商品A".to_string()]
        );
        // Unmatched rows still mark their days as active.
        assert_eq!(batch.active_dates.len(), 2);
    }

    #[test]
    fn test_missing_timestamp_excluded() {
        let mut no_ts = line("熊猫挂件-蓝", "", 1.0, 10.0);
        no_ts.paid_at = None;
        let bad_ts = line("熊猫挂件-蓝", "上午十点", 1.0, 10.0);

        let batch = resolve_lines(&[no_ts, bad_ts], &index(), RefundPolicy::default());
        assert!(batch.lines.is_empty());
    }

    #[test]
    fn test_quantity_treated_as_integral() {
        let rows = vec![line("熊猫挂件-蓝", "2025-01-01 09:00:00", 2.0, 100.0)];
        let batch = resolve_lines(&rows, &index(), RefundPolicy::default());
        assert_eq!(batch.lines[0].quantity, 2);
        assert_eq!(batch.lines[0].amount, 100.0);
        assert_eq!(batch.lines[0].channel, SalesChannel::Tmall);
    }

    #[test]
    fn test_parse_paid_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(parse_paid_date("2025-01-03 14:22:05"), Some(expected));
        assert_eq!(parse_paid_date("2025-01-03T14:22:05"), Some(expected));
        assert_eq!(parse_paid_date("2025-01-03"), Some(expected));
        assert_eq!(parse_paid_date(""), None);
        assert_eq!(parse_paid_date("not a date"), None);
    }
}
