use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request for the period report (web rows) and the PDF export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReportRequest {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

impl PeriodReportRequest {
    /// Validated inclusive date range; both bounds are required.
    pub fn parse_dates(&self) -> anyhow::Result<(NaiveDate, NaiveDate)> {
        parse_date_range(&self.start_date, &self.end_date)
    }
}

pub(crate) fn parse_date_range(start: &str, end: &str) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    if start.is_empty() || end.is_empty() {
        anyhow::bail!("缺少日期参数");
    }
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")?;
    if end < start {
        anyhow::bail!("日期范围无效");
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_range_validation() {
        assert!(parse_date_range("", "2025-01-03").is_err());
        assert!(parse_date_range("2025-01-03", "").is_err());
        assert!(parse_date_range("2025-01-03", "2025-01-01").is_err());
        assert!(parse_date_range("01/03/2025", "2025-01-05").is_err());

        let (s, e) = parse_date_range("2025-01-01", "2025-01-03").unwrap();
        assert_eq!((e - s).num_days(), 2);
    }
}

/// Row kind discriminator for the web report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportRowKind {
    Title,
    Subtitle,
    Header,
    Data,
    Subtotal,
    Total,
}

/// One rendered row of the web report. Empty strings render as blank
/// cells (a bucket with no data at all), `"0"` as an explicit zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "type")]
    pub kind: ReportRowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Set on the first bucket row of a product type; equals the
    /// bucket count so the type cell spans its whole block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReportResponse {
    pub success: bool,
    pub data: Vec<ReportRow>,
}
