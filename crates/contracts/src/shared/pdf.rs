use serde::{Deserialize, Serialize};

/// A rectangular cell matrix plus span/style instructions — the full
/// contract between the report builder and the PDF rendering
/// collaborator. Coordinates are zero-based (col, row), inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMatrix {
    /// Column widths in millimetres.
    pub col_widths: Vec<f64>,
    pub rows: Vec<Vec<String>>,
    pub spans: Vec<CellSpan>,
    pub row_styles: Vec<RowStyle>,
}

/// Merge a rectangular cell region; text is taken from the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan {
    pub start_col: usize,
    pub start_row: usize,
    pub end_col: usize,
    pub end_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowBackground {
    None,
    TitleBand,
    SubtotalGrey,
    TotalGreen,
}

/// Per-row presentation hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStyle {
    pub row: usize,
    pub background: RowBackground,
    pub font_size: f64,
}

impl TableMatrix {
    /// Every row must have exactly `col_widths.len()` cells.
    pub fn is_rectangular(&self) -> bool {
        let cols = self.col_widths.len();
        self.rows.iter().all(|r| r.len() == cols)
    }
}
