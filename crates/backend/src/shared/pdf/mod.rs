use anyhow::Result;
use contracts::shared::pdf::{RowBackground, TableMatrix};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Seam to the PDF rendering collaborator: a cell matrix with span and
/// style instructions goes in, a byte stream comes out. The layout
/// engine behind it is deliberately thin.
pub trait PdfRenderer {
    fn render(&self, table: &TableMatrix) -> Result<Vec<u8>>;
}

const A4_WIDTH: f64 = 595.28;
const A4_HEIGHT: f64 = 841.89;
const MARGIN: f64 = 28.35; // 1cm in points
const MM_TO_PT: f64 = 72.0 / 25.4;
const DEFAULT_FONT_SIZE: f64 = 9.0;

/// Minimal grid renderer over lopdf. Uses the built-in Helvetica base
/// font; CJK cell text survives structurally but needs an embedded font
/// to display, which mirrors the legacy exporter's fallback behaviour.
#[derive(Debug, Default)]
pub struct LopdfRenderer;

impl PdfRenderer for LopdfRenderer {
    fn render(&self, table: &TableMatrix) -> Result<Vec<u8>> {
        if !table.is_rectangular() {
            anyhow::bail!("table matrix is not rectangular");
        }

        if table
            .rows
            .iter()
            .flatten()
            .any(|cell| !cell.is_ascii())
        {
            tracing::warn!(
                "PDF export contains non-ASCII text; glyphs need an embedded CJK font to display"
            );
        }

        let col_widths: Vec<f64> = table.col_widths.iter().map(|w| w * MM_TO_PT).collect();
        let row_heights: Vec<f64> = (0..table.rows.len())
            .map(|r| font_size_for(table, r) * 1.8)
            .collect();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        let mut row = 0usize;

        while row < table.rows.len() {
            // Fit as many rows as the page height allows.
            let mut page_rows = Vec::new();
            let mut used = 0.0;
            while row < table.rows.len() {
                let h = row_heights[row];
                if !page_rows.is_empty() && used + h > A4_HEIGHT - 2.0 * MARGIN {
                    break;
                }
                page_rows.push(row);
                used += h;
                row += 1;
            }

            let operations = page_operations(table, &page_rows, &col_widths, &row_heights);
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH.into(), A4_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

fn font_size_for(table: &TableMatrix, row: usize) -> f64 {
    table
        .row_styles
        .iter()
        .find(|s| s.row == row)
        .map(|s| s.font_size)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn background_for(table: &TableMatrix, row: usize) -> RowBackground {
    table
        .row_styles
        .iter()
        .find(|s| s.row == row)
        .map(|s| s.background)
        .unwrap_or(RowBackground::None)
}

/// True when a span merges the given cell with the one to its left
/// (suppresses the vertical border between them).
fn merged_with_left(table: &TableMatrix, col: usize, row: usize) -> bool {
    col > 0
        && table.spans.iter().any(|s| {
            row >= s.start_row && row <= s.end_row && col > s.start_col && col <= s.end_col
        })
}

/// True when a span merges the given cell with the one above.
fn merged_with_above(table: &TableMatrix, col: usize, row: usize) -> bool {
    table.spans.iter().any(|s| {
        col >= s.start_col && col <= s.end_col && row > s.start_row && row <= s.end_row
    })
}

/// True when the cell is hidden inside a span (not the head cell).
fn covered_by_span(table: &TableMatrix, col: usize, row: usize) -> bool {
    table.spans.iter().any(|s| {
        col >= s.start_col
            && col <= s.end_col
            && row >= s.start_row
            && row <= s.end_row
            && !(col == s.start_col && row == s.start_row)
    })
}

fn page_operations(
    table: &TableMatrix,
    page_rows: &[usize],
    col_widths: &[f64],
    row_heights: &[f64],
) -> Vec<Operation> {
    let mut ops = Vec::new();
    let table_width: f64 = col_widths.iter().sum();
    let top = A4_HEIGHT - MARGIN;

    // Backgrounds first so grid and text stay visible.
    let mut y = top;
    for &r in page_rows {
        let h = row_heights[r];
        let (cr, cg, cb) = match background_for(table, r) {
            RowBackground::None => (1.0, 1.0, 1.0),
            RowBackground::TitleBand => (0.88, 1.0, 1.0),
            RowBackground::SubtotalGrey => (0.83, 0.83, 0.83),
            RowBackground::TotalGreen => (0.56, 0.93, 0.56),
        };
        if background_for(table, r) != RowBackground::None {
            ops.push(Operation::new("rg", vec![cr.into(), cg.into(), cb.into()]));
            ops.push(Operation::new(
                "re",
                vec![MARGIN.into(), (y - h).into(), table_width.into(), h.into()],
            ));
            ops.push(Operation::new("f", vec![]));
        }
        y -= h;
    }
    let bottom = y;

    // Grid.
    ops.push(Operation::new("w", vec![0.5.into()]));
    ops.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));

    let mut y = top;
    for (i, &r) in page_rows.iter().enumerate() {
        let h = row_heights[r];

        // Top border per cell unless merged with the row above.
        let mut x = MARGIN;
        for (col, w) in col_widths.iter().enumerate() {
            if i == 0 || !merged_with_above(table, col, r) {
                ops.push(Operation::new("m", vec![x.into(), y.into()]));
                ops.push(Operation::new("l", vec![(x + w).into(), y.into()]));
                ops.push(Operation::new("S", vec![]));
            }
            x += w;
        }

        // Vertical borders unless merged with the left neighbour.
        let mut x = MARGIN;
        for col in 0..=col_widths.len() {
            let draw = col == 0
                || col == col_widths.len()
                || !merged_with_left(table, col, r);
            if draw {
                ops.push(Operation::new("m", vec![x.into(), y.into()]));
                ops.push(Operation::new("l", vec![x.into(), (y - h).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            if col < col_widths.len() {
                x += col_widths[col];
            }
        }

        y -= h;
    }

    // Bottom edge of the page's last row.
    ops.push(Operation::new("m", vec![MARGIN.into(), bottom.into()]));
    ops.push(Operation::new(
        "l",
        vec![(MARGIN + table_width).into(), bottom.into()],
    ));
    ops.push(Operation::new("S", vec![]));

    // Cell text.
    ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
    let mut y = top;
    for &r in page_rows {
        let h = row_heights[r];
        let size = font_size_for(table, r);

        let mut x = MARGIN;
        for (col, w) in col_widths.iter().enumerate() {
            let text = &table.rows[r][col];
            if !text.is_empty() && !covered_by_span(table, col, r) {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), size.into()],
                ));
                ops.push(Operation::new(
                    "Td",
                    vec![(x + 2.0).into(), (y - h + (h - size) / 2.0).into()],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(text.as_str())],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            x += w;
        }
        y -= h;
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::pdf::CellSpan;

    fn table() -> TableMatrix {
        TableMatrix {
            col_widths: vec![60.0, 30.0, 20.0, 30.0],
            rows: vec![
                vec!["title".into(), "".into(), "".into(), "".into()],
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ],
            spans: vec![CellSpan {
                start_col: 0,
                start_row: 0,
                end_col: 3,
                end_row: 0,
            }],
            row_styles: vec![],
        }
    }

    #[test]
    fn test_renders_valid_pdf_bytes() {
        let bytes = LopdfRenderer.render(&table()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() > 100);
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        let mut bad = table();
        bad.rows[1].pop();
        assert!(LopdfRenderer.render(&bad).is_err());
    }

    #[test]
    fn test_span_border_suppression() {
        let t = table();
        // Inside the title span: merged with left, head cell is not.
        assert!(merged_with_left(&t, 1, 0));
        assert!(!merged_with_left(&t, 1, 1));
        assert!(!covered_by_span(&t, 0, 0));
        assert!(covered_by_span(&t, 2, 0));
    }
}
