use contracts::shared::pdf::{CellSpan, RowBackground, RowStyle, TableMatrix};

use super::service::{
    title_text, ReportData, HEADER_AMOUNT, HEADER_DATE, HEADER_QUANTITY, HEADER_TYPE,
    SUBTITLE_TEXT, SUBTOTAL_LABEL,
};

const TITLE_FONT: f64 = 14.0;
const HEADER_FONT: f64 = 10.0;
const BODY_FONT: f64 = 9.0;

/// Shape report data into the renderer's cell matrix: two title rows
/// spanning all columns, a header row, then per product type a block of
/// `bucket_count` data rows (type cell merged over the block) followed
/// by a subtotal row, and one total row per category.
pub fn build_matrix(data: &ReportData) -> TableMatrix {
    let bucket_count = data.labels.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut spans: Vec<CellSpan> = Vec::new();
    let mut row_styles: Vec<RowStyle> = Vec::new();

    rows.push(vec![
        title_text(data.start, data.end),
        String::new(),
        String::new(),
        String::new(),
    ]);
    rows.push(vec![
        SUBTITLE_TEXT.to_string(),
        String::new(),
        String::new(),
        String::new(),
    ]);
    rows.push(vec![
        HEADER_TYPE.to_string(),
        HEADER_DATE.to_string(),
        HEADER_QUANTITY.to_string(),
        HEADER_AMOUNT.to_string(),
    ]);

    for row in 0..2 {
        spans.push(CellSpan {
            start_col: 0,
            start_row: row,
            end_col: 3,
            end_row: row,
        });
        row_styles.push(RowStyle {
            row,
            background: RowBackground::TitleBand,
            font_size: TITLE_FONT,
        });
    }
    row_styles.push(RowStyle {
        row: 2,
        background: RowBackground::None,
        font_size: HEADER_FONT,
    });

    for section in &data.sections {
        for block in &section.types {
            let base_row = rows.len();

            for (i, label) in data.labels.iter().enumerate() {
                let (quantity, amount) = block.per_bucket[i];
                let (quantity_text, amount_text) = if data.bucket_active[i] {
                    (
                        if quantity > 0 {
                            quantity.to_string()
                        } else {
                            "0".to_string()
                        },
                        if amount > 0.0 {
                            format!("{:.2}", amount)
                        } else {
                            "0.00".to_string()
                        },
                    )
                } else {
                    (String::new(), String::new())
                };

                rows.push(vec![
                    if i == 0 {
                        block.title.clone()
                    } else {
                        String::new()
                    },
                    label.clone(),
                    quantity_text,
                    amount_text,
                ]);
                row_styles.push(RowStyle {
                    row: base_row + i,
                    background: RowBackground::None,
                    font_size: BODY_FONT,
                });
            }

            // Merge the type cell over its whole bucket block.
            spans.push(CellSpan {
                start_col: 0,
                start_row: base_row,
                end_col: 0,
                end_row: base_row + bucket_count - 1,
            });

            rows.push(vec![
                String::new(),
                SUBTOTAL_LABEL.to_string(),
                if block.total_quantity > 0 {
                    block.total_quantity.to_string()
                } else {
                    "0".to_string()
                },
                if block.total_amount > 0.0 {
                    format!("{:.2}", block.total_amount)
                } else {
                    "0.00".to_string()
                },
            ]);
            row_styles.push(RowStyle {
                row: rows.len() - 1,
                background: RowBackground::SubtotalGrey,
                font_size: BODY_FONT,
            });
        }

        rows.push(vec![
            format!("{}{}", section.name, SUBTOTAL_LABEL),
            String::new(),
            if section.total_quantity > 0 {
                section.total_quantity.to_string()
            } else {
                String::new()
            },
            if section.total_amount > 0.0 {
                format!("{:.2}", section.total_amount)
            } else {
                String::new()
            },
        ]);
        row_styles.push(RowStyle {
            row: rows.len() - 1,
            background: RowBackground::TotalGreen,
            font_size: BODY_FONT,
        });
    }

    TableMatrix {
        col_widths: vec![60.0, 30.0, 20.0, 30.0],
        rows,
        spans,
        row_styles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d202_period_report::service::{CategorySection, TypeBlock};
    use chrono::NaiveDate;

    fn data(type_count: usize, bucket_count: usize) -> ReportData {
        let labels: Vec<String> = (1..=bucket_count)
            .map(|d| format!("2025-01-{:02}", d))
            .collect();
        let types = (0..type_count)
            .map(|i| TypeBlock {
                title: format!("类型{}", i),
                per_bucket: vec![(1, 10.0); bucket_count],
                total_quantity: bucket_count as i64,
                total_amount: 10.0 * bucket_count as f64,
            })
            .collect();

        ReportData {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, bucket_count as u32).unwrap(),
            labels,
            bucket_active: vec![true; bucket_count],
            sections: vec![CategorySection {
                name: "挂件".into(),
                types,
                total_quantity: (type_count * bucket_count) as i64,
                total_amount: 10.0 * (type_count * bucket_count) as f64,
            }],
        }
    }

    #[test]
    fn test_matrix_is_rectangular_with_expected_row_count() {
        let matrix = build_matrix(&data(2, 7));
        assert!(matrix.is_rectangular());
        // 3 head rows + 2 types * (7 buckets + 1 subtotal) + 1 total
        assert_eq!(matrix.rows.len(), 3 + 2 * 8 + 1);
        assert_eq!(matrix.row_styles.len(), matrix.rows.len());
    }

    #[test]
    fn test_type_spans_align_to_bucket_count() {
        let bucket_count = 7;
        let matrix = build_matrix(&data(2, bucket_count));

        let type_spans: Vec<_> = matrix
            .spans
            .iter()
            .filter(|s| s.start_col == 0 && s.end_col == 0)
            .collect();
        assert_eq!(type_spans.len(), 2);

        for (i, span) in type_spans.iter().enumerate() {
            assert_eq!(span.start_row, 3 + i * (bucket_count + 1));
            assert_eq!(span.end_row - span.start_row + 1, bucket_count);
        }
    }

    #[test]
    fn test_title_rows_span_all_columns() {
        let matrix = build_matrix(&data(1, 3));
        assert!(matrix
            .spans
            .iter()
            .any(|s| s.start_row == 0 && s.end_row == 0 && s.start_col == 0 && s.end_col == 3));
        assert!(matrix
            .spans
            .iter()
            .any(|s| s.start_row == 1 && s.end_row == 1 && s.end_col == 3));
    }

    #[test]
    fn test_subtotal_and_total_styles() {
        let bucket_count = 3;
        let matrix = build_matrix(&data(1, bucket_count));

        let subtotal_row = 3 + bucket_count;
        assert_eq!(
            matrix.row_styles[subtotal_row].background,
            RowBackground::SubtotalGrey
        );
        let total_row = matrix.rows.len() - 1;
        assert_eq!(
            matrix.row_styles[total_row].background,
            RowBackground::TotalGreen
        );
        assert_eq!(matrix.rows[total_row][0], "挂件合计");
    }
}
