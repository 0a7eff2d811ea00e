use serde::{Deserialize, Serialize};

/// One curated product mapping row.
///
/// `mapped_title` is the canonical product type a raw export name resolves
/// to; NULL means the name is still unmatched and waiting for curation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMappingDto {
    pub id: i64,
    pub name: String,
    pub alias: Option<String>,
    pub category: Option<i64>,
    pub category_name: Option<String>,
    pub mapped_title: Option<String>,
    pub reviewed: bool,
}

/// Request for the paginated mapping search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSearchRequest {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSearchResponse {
    pub success: bool,
    pub data: Vec<ProductMappingDto>,
    pub total: i64,
    pub page: u64,
    #[serde(rename = "pageSize")]
    pub page_size: u64,
}

/// Upsert payload for the curation workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingUpsertRequest {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub mapped_title: Option<String>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub reviewed: bool,
}
