use contracts::dashboards::d200_category_summary::{CategoryTab, ProductTypeRow};
use contracts::domain::a003_category::CategoryDto;
use contracts::enums::SalesChannel;
use std::collections::HashMap;

use super::pipeline::ResolvedLine;

/// Product-type labels carrying this marker are miscellaneous buckets
/// and sort to the bottom of their tab.
const MISC_MARKER: &str = "其他";

/// Accumulated totals for one canonical product type over the window.
#[derive(Debug, Clone, Default)]
pub struct TypeTotals {
    pub valid_orders: i64,
    pub discount_amount: f64,
    pub by_channel: HashMap<SalesChannel, (i64, f64)>,
}

/// Sum resolved lines per canonical type. Channel splits only track the
/// four named channels; `Other` volume is visible in the overall totals
/// but not in any channel column.
pub fn accumulate_totals(lines: &[ResolvedLine]) -> HashMap<String, TypeTotals> {
    let mut totals: HashMap<String, TypeTotals> = HashMap::new();

    for line in lines {
        let entry = totals.entry(line.mapped_title.clone()).or_default();
        entry.valid_orders += line.quantity;
        entry.discount_amount += line.amount;

        if line.channel != SalesChannel::Other {
            let slot = entry.by_channel.entry(line.channel).or_default();
            slot.0 += line.quantity;
            slot.1 += line.amount;
        }
    }

    totals
}

/// Organize per-type totals into category tabs.
///
/// Tabs follow category id order. Each tab lists every canonical type
/// the mapping table assigns to that category — zero-valued when there
/// were no sales in the window — in mapping-table encounter order,
/// except miscellaneous labels which sort last (stable).
pub fn build_tabs(
    categories: &[CategoryDto],
    catalog: &[(String, Option<i64>)],
    totals: &HashMap<String, TypeTotals>,
) -> Vec<CategoryTab> {
    let mut tabs = Vec::with_capacity(categories.len());

    for category in categories {
        let mut regular: Vec<ProductTypeRow> = Vec::new();
        let mut misc: Vec<ProductTypeRow> = Vec::new();

        for (title, category_id) in catalog {
            if *category_id != Some(category.id) {
                continue;
            }

            let row = type_row(title, totals.get(title));
            if title.contains(MISC_MARKER) {
                misc.push(row);
            } else {
                regular.push(row);
            }
        }

        regular.extend(misc);
        tabs.push(CategoryTab {
            name: category.name.clone(),
            data: regular,
        });
    }

    tabs
}

fn type_row(title: &str, totals: Option<&TypeTotals>) -> ProductTypeRow {
    let mut row = ProductTypeRow {
        product_type: title.to_string(),
        ..Default::default()
    };

    if let Some(t) = totals {
        row.valid_orders = t.valid_orders;
        row.discount_amount = t.discount_amount;

        for (channel, &(qty, amount)) in &t.by_channel {
            match channel {
                SalesChannel::Douyin => {
                    row.douyin_orders = qty;
                    row.douyin_amount = amount;
                }
                SalesChannel::Tmall => {
                    row.tmall_orders = qty;
                    row.tmall_amount = amount;
                }
                SalesChannel::Youzan => {
                    row.youzan_orders = qty;
                    row.youzan_amount = amount;
                }
                SalesChannel::Jd => {
                    row.jd_orders = qty;
                    row.jd_amount = amount;
                }
                SalesChannel::Other => {}
            }
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn categories() -> Vec<CategoryDto> {
        vec![
            CategoryDto {
                id: 1,
                name: "挂件".into(),
            },
            CategoryDto {
                id: 2,
                name: "服饰".into(),
            },
        ]
    }

    fn catalog() -> Vec<(String, Option<i64>)> {
        vec![
            ("其他挂件".to_string(), Some(1)),
            ("熊猫挂件".to_string(), Some(1)),
            ("老虎挂件".to_string(), Some(1)),
            ("马甲".to_string(), Some(2)),
            ("无类目款".to_string(), None),
        ]
    }

    fn resolved(title: &str, qty: i64, amount: f64, channel: SalesChannel) -> ResolvedLine {
        ResolvedLine {
            mapped_title: title.into(),
            category_id: Some(1),
            paid_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            quantity: qty,
            amount,
            channel,
        }
    }

    #[test]
    fn test_each_type_lands_in_exactly_one_tab() {
        let tabs = build_tabs(&categories(), &catalog(), &HashMap::new());
        let mut seen: Vec<&str> = Vec::new();
        for tab in &tabs {
            for row in &tab.data {
                assert!(!seen.contains(&row.product_type.as_str()));
                seen.push(&row.product_type);
            }
        }
        // The null-category type belongs to no tab.
        assert_eq!(seen.len(), 4);
        assert!(!seen.contains(&"无类目款"));
    }

    #[test]
    fn test_zero_valued_types_still_appear() {
        let lines = vec![resolved("熊猫挂件", 2, 100.0, SalesChannel::Tmall)];
        let totals = accumulate_totals(&lines);
        let tabs = build_tabs(&categories(), &catalog(), &totals);

        let pendant_tab = &tabs[0];
        assert_eq!(pendant_tab.data.len(), 3);
        let tiger = pendant_tab
            .data
            .iter()
            .find(|r| r.product_type == "老虎挂件")
            .unwrap();
        assert_eq!(tiger.valid_orders, 0);
        assert_eq!(tiger.discount_amount, 0.0);
    }

    #[test]
    fn test_misc_sorts_last_others_keep_encounter_order() {
        let tabs = build_tabs(&categories(), &catalog(), &HashMap::new());
        let order: Vec<&str> = tabs[0].data.iter().map(|r| r.product_type.as_str()).collect();
        assert_eq!(order, vec!["熊猫挂件", "老虎挂件", "其他挂件"]);
    }

    #[test]
    fn test_channel_split_excludes_other() {
        let lines = vec![
            resolved("熊猫挂件", 2, 100.0, SalesChannel::Douyin),
            resolved("熊猫挂件", 3, 150.0, SalesChannel::Other),
        ];
        let totals = accumulate_totals(&lines);
        let tabs = build_tabs(&categories(), &catalog(), &totals);

        let panda = &tabs[0].data[0];
        assert_eq!(panda.product_type, "熊猫挂件");
        // Overall totals include the Other channel volume...
        assert_eq!(panda.valid_orders, 5);
        assert_eq!(panda.discount_amount, 250.0);
        // ...but no channel column does.
        assert_eq!(panda.douyin_orders, 2);
        assert_eq!(
            panda.tmall_orders + panda.youzan_orders + panda.jd_orders,
            0
        );
    }
}
