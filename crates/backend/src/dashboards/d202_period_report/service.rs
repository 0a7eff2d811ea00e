use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d202_period_report::{
    PeriodReportRequest, PeriodReportResponse, ReportRow, ReportRowKind,
};
use std::collections::HashMap;

use crate::domain::{a001_order_line, a002_product_mapping, a003_category};
use crate::shared::analytics::buckets::{self, Granularity};
use crate::shared::analytics::pipeline;
use crate::shared::analytics::refund::RefundPolicy;
use crate::shared::pdf::{LopdfRenderer, PdfRenderer};

use super::pdf_builder;

/// Aggregated report content shared by the web rows and the PDF matrix.
#[derive(Debug)]
pub struct ReportData {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub labels: Vec<String>,
    /// Buckets that carry any trade at all; inactive buckets render as
    /// blank cells rather than explicit zeros.
    pub bucket_active: Vec<bool>,
    /// Non-empty categories in category id order.
    pub sections: Vec<CategorySection>,
}

#[derive(Debug)]
pub struct CategorySection {
    pub name: String,
    pub types: Vec<TypeBlock>,
    pub total_quantity: i64,
    pub total_amount: f64,
}

#[derive(Debug)]
pub struct TypeBlock {
    pub title: String,
    /// One (quantity, amount) pair per bucket label.
    pub per_bucket: Vec<(i64, f64)>,
    pub total_quantity: i64,
    pub total_amount: f64,
}

/// Web report: the same aggregation as the PDF export, shaped as typed
/// table rows.
pub async fn get_report(request: PeriodReportRequest) -> Result<PeriodReportResponse> {
    let data = load_report_data(&request).await?;
    Ok(PeriodReportResponse {
        success: true,
        data: report_rows(&data),
    })
}

/// PDF export: build the cell matrix and hand it to the renderer.
pub async fn export_pdf(request: PeriodReportRequest) -> Result<(String, Vec<u8>)> {
    let data = load_report_data(&request).await?;
    if data.sections.is_empty() {
        bail!("指定日期范围内没有数据");
    }

    let matrix = pdf_builder::build_matrix(&data);
    let bytes = LopdfRenderer::default().render(&matrix)?;

    let file_name = format!(
        "周报_{}_{}.pdf",
        data.start.format("%Y-%m-%d"),
        data.end.format("%Y-%m-%d")
    );
    Ok((file_name, bytes))
}

async fn load_report_data(request: &PeriodReportRequest) -> Result<ReportData> {
    let (start, end) = request.parse_dates()?;

    let granularity = Granularity::for_range(start, end);
    let labels = buckets::enumerate_labels(start, end, granularity);

    let categories = a003_category::repository::list_ordered().await?;
    let index = a002_product_mapping::service::load_mapping_index().await?;
    let rows = a001_order_line::service::load_window(
        Some(&request.start_date),
        Some(&request.end_date),
    )
    .await?;
    tracing::info!(
        "Period report {} ~ {}: {} lines, {} buckets",
        request.start_date,
        request.end_date,
        rows.len(),
        labels.len()
    );

    let batch = pipeline::resolve_lines(&rows, &index, RefundPolicy::default());

    let label_index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let mut bucket_active = vec![false; labels.len()];
    for date in &batch.active_dates {
        if let Some(&idx) = label_index
            .get(buckets::label_for(*date, granularity).as_str())
        {
            bucket_active[idx] = true;
        }
    }

    // Per-type buckets, types in first-encounter order within their
    // category. The report only lists types that traded in the window.
    let mut type_order: Vec<String> = Vec::new();
    let mut per_type: HashMap<String, TypeBlock> = HashMap::new();
    let mut type_category: HashMap<String, i64> = HashMap::new();

    for line in &batch.lines {
        let Some(category_id) = line.category_id else {
            continue;
        };
        let Some(&idx) = label_index
            .get(buckets::label_for(line.paid_date, granularity).as_str())
        else {
            continue;
        };

        let block = per_type.entry(line.mapped_title.clone()).or_insert_with(|| {
            type_order.push(line.mapped_title.clone());
            type_category.insert(line.mapped_title.clone(), category_id);
            TypeBlock {
                title: line.mapped_title.clone(),
                per_bucket: vec![(0, 0.0); labels.len()],
                total_quantity: 0,
                total_amount: 0.0,
            }
        });

        block.per_bucket[idx].0 += line.quantity;
        block.per_bucket[idx].1 += line.amount;
        block.total_quantity += line.quantity;
        block.total_amount += line.amount;
    }

    let mut sections = Vec::new();
    for category in &categories {
        let mut section = CategorySection {
            name: category.name.clone(),
            types: Vec::new(),
            total_quantity: 0,
            total_amount: 0.0,
        };

        for title in &type_order {
            if type_category.get(title) != Some(&category.id) {
                continue;
            }
            if let Some(block) = per_type.remove(title) {
                section.total_quantity += block.total_quantity;
                section.total_amount += block.total_amount;
                section.types.push(block);
            }
        }

        if !section.types.is_empty() {
            sections.push(section);
        }
    }

    Ok(ReportData {
        start,
        end,
        labels,
        bucket_active,
        sections,
    })
}

/// Title line shown above both report shapes.
pub fn title_text(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}年{}月{}日 - {}月{}日",
        start.year(),
        start.month(),
        start.day(),
        end.month(),
        end.day()
    )
}

pub const SUBTITLE_TEXT: &str = "重点商品";
pub const HEADER_TYPE: &str = "商品类型";
pub const HEADER_DATE: &str = "日期";
pub const HEADER_QUANTITY: &str = "支付数量";
pub const HEADER_AMOUNT: &str = "金额";
pub const SUBTOTAL_LABEL: &str = "合计";

fn quantity_cell(quantity: i64) -> String {
    if quantity > 0 {
        quantity.to_string()
    } else {
        "0".to_string()
    }
}

fn amount_cell(amount: f64) -> String {
    if amount > 0.0 {
        format!("{:.2}", amount)
    } else {
        "0.00".to_string()
    }
}

/// Shape report data into web table rows.
pub fn report_rows(data: &ReportData) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    rows.push(ReportRow {
        kind: ReportRowKind::Title,
        value: Some(title_text(data.start, data.end)),
        product_type: None,
        date: None,
        quantity: None,
        amount: None,
        rowspan: None,
    });
    rows.push(ReportRow {
        kind: ReportRowKind::Subtitle,
        value: Some(SUBTITLE_TEXT.to_string()),
        product_type: None,
        date: None,
        quantity: None,
        amount: None,
        rowspan: None,
    });
    rows.push(ReportRow {
        kind: ReportRowKind::Header,
        value: None,
        product_type: Some(HEADER_TYPE.to_string()),
        date: Some(HEADER_DATE.to_string()),
        quantity: Some(HEADER_QUANTITY.to_string()),
        amount: Some(HEADER_AMOUNT.to_string()),
        rowspan: None,
    });

    for section in &data.sections {
        for block in &section.types {
            for (i, label) in data.labels.iter().enumerate() {
                let (quantity, amount) = block.per_bucket[i];
                let (quantity_text, amount_text) = if data.bucket_active[i] {
                    (quantity_cell(quantity), amount_cell(amount))
                } else {
                    (String::new(), String::new())
                };

                rows.push(ReportRow {
                    kind: ReportRowKind::Data,
                    value: None,
                    product_type: Some(if i == 0 {
                        block.title.clone()
                    } else {
                        String::new()
                    }),
                    date: Some(label.clone()),
                    quantity: Some(quantity_text),
                    amount: Some(amount_text),
                    rowspan: if i == 0 { Some(data.labels.len()) } else { None },
                });
            }

            rows.push(ReportRow {
                kind: ReportRowKind::Subtotal,
                value: None,
                product_type: Some(String::new()),
                date: Some(SUBTOTAL_LABEL.to_string()),
                quantity: Some(quantity_cell(block.total_quantity)),
                amount: Some(amount_cell(block.total_amount)),
                rowspan: None,
            });
        }

        rows.push(ReportRow {
            kind: ReportRowKind::Total,
            value: None,
            product_type: Some(format!("{}{}", section.name, SUBTOTAL_LABEL)),
            date: Some(String::new()),
            quantity: Some(if section.total_quantity > 0 {
                section.total_quantity.to_string()
            } else {
                String::new()
            }),
            amount: Some(if section.total_amount > 0.0 {
                format!("{:.2}", section.total_amount)
            } else {
                String::new()
            }),
            rowspan: None,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_data() -> ReportData {
        ReportData {
            start: d(2025, 1, 1),
            end: d(2025, 1, 3),
            labels: vec![
                "2025-01-01".into(),
                "2025-01-02".into(),
                "2025-01-03".into(),
            ],
            bucket_active: vec![true, false, true],
            sections: vec![CategorySection {
                name: "挂件".into(),
                types: vec![TypeBlock {
                    title: "熊猫挂件".into(),
                    per_bucket: vec![(2, 100.0), (0, 0.0), (0, 0.0)],
                    total_quantity: 2,
                    total_amount: 100.0,
                }],
                total_quantity: 2,
                total_amount: 100.0,
            }],
        }
    }

    #[test]
    fn test_report_rows_shape() {
        let rows = report_rows(&sample_data());
        // title + subtitle + header + 3 buckets + subtotal + category total
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].kind, ReportRowKind::Title);
        assert_eq!(rows[3].kind, ReportRowKind::Data);
        assert_eq!(rows[3].rowspan, Some(3));
        assert_eq!(rows[4].rowspan, None);
        assert_eq!(rows[6].kind, ReportRowKind::Subtotal);
        assert_eq!(rows[7].kind, ReportRowKind::Total);
        assert_eq!(rows[7].product_type.as_deref(), Some("挂件合计"));
    }

    #[test]
    fn test_blank_cells_for_inactive_buckets_zero_for_active() {
        let rows = report_rows(&sample_data());
        // 2025-01-01: traded, explicit values.
        assert_eq!(rows[3].quantity.as_deref(), Some("2"));
        assert_eq!(rows[3].amount.as_deref(), Some("100.00"));
        // 2025-01-02: no trade anywhere, blank cells.
        assert_eq!(rows[4].quantity.as_deref(), Some(""));
        assert_eq!(rows[4].amount.as_deref(), Some(""));
        // 2025-01-03: other products traded, explicit zero for this one.
        assert_eq!(rows[5].quantity.as_deref(), Some("0"));
        assert_eq!(rows[5].amount.as_deref(), Some("0.00"));
    }

    #[test]
    fn test_title_text() {
        assert_eq!(
            title_text(d(2025, 1, 1), d(2025, 1, 7)),
            "2025年1月1日 - 1月7日"
        );
    }
}
