use anyhow::Result;
use contracts::domain::a002_product_mapping::ProductMappingDto;

use super::repository;
use crate::shared::analytics::resolver::{MappingIndex, MappingRow};

/// Build the exact-name resolution index from the full mapping table.
/// Loaded once per aggregation request, never per row.
pub async fn load_mapping_index() -> Result<MappingIndex> {
    let rows = repository::list_all().await?;

    let mapping_rows = rows
        .into_iter()
        .map(|m| MappingRow {
            raw_name: m.name,
            mapped_title: m.mapped_title,
            category_id: m.category,
        })
        .collect();

    Ok(MappingIndex::from_rows(mapping_rows))
}

/// Paginated search with category display names joined on.
pub async fn search(
    keyword: Option<&str>,
    page: u64,
    page_size: u64,
) -> Result<(Vec<ProductMappingDto>, i64)> {
    let (models, total) = repository::search(keyword, page, page_size).await?;
    let category_names = repository::category_names().await?;

    let dtos = models
        .into_iter()
        .map(|m| {
            let category_name = m.category.and_then(|id| category_names.get(&id).cloned());
            ProductMappingDto {
                id: m.id,
                name: m.name,
                alias: m.alias,
                category: m.category,
                category_name,
                mapped_title: m.mapped_title,
                reviewed: m.reviewed != 0,
            }
        })
        .collect();

    Ok((dtos, total))
}

pub async fn upsert(
    name: &str,
    alias: Option<String>,
    mapped_title: Option<String>,
    category: Option<i64>,
    reviewed: bool,
) -> Result<()> {
    // Normalize empty strings to NULL so "no canonical type yet" has
    // exactly one representation in the store.
    let mapped_title = mapped_title.filter(|t| !t.trim().is_empty());
    let alias = alias.filter(|a| !a.trim().is_empty());

    repository::upsert(name, alias, mapped_title, category, reviewed).await
}
