use serde::{Deserialize, Serialize};

/// One audit-log entry. `detail` is free-form JSON describing the
/// operation (file name, row counts, date range, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLogEntry {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub operation_type: String,
    pub detail: serde_json::Value,
    pub result: String,
    pub error_message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLogListResponse {
    pub success: bool,
    pub data: Vec<OperationLogEntry>,
}
