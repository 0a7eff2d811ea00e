use serde::{Deserialize, Serialize};

/// A report tab. Categories are administrator-defined and ordered by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub data: Vec<CategoryDto>,
}
