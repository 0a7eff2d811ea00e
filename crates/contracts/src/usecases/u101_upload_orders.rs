use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upload payload: parsed spreadsheet rows keyed by the export's
/// original column headers. Excel parsing happens client-side; the
/// backend only sees rows of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub rows: Vec<HashMap<String, String>>,
}

/// Per-batch ingestion outcome. Counts are always returned, never
/// hidden; `warning` flags a non-fatal elevated condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Row count after in-file deduplication.
    pub total: usize,
    pub success_count: usize,
    pub duplicate_count: usize,
    pub error_count: usize,
    pub filtered_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
