use anyhow::Result;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// Curated mapping from a raw export product name to its canonical
/// type and category. Written by the curation workflow, read-only for
/// the aggregation pipeline.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_product_mapping")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(nullable)]
    pub alias: Option<String>,
    #[sea_orm(nullable)]
    pub mapped_title: Option<String>,
    #[sea_orm(nullable)]
    pub category: Option<i64>,
    pub reviewed: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Full table scan, id order — loaded once per aggregation request.
pub async fn list_all() -> Result<Vec<Model>> {
    let items = Entity::find().order_by_asc(Column::Id).all(conn()).await?;
    Ok(items)
}

/// Paginated LIKE search over raw names for the curation UI.
/// Returns the page plus the total match count.
pub async fn search(keyword: Option<&str>, page: u64, page_size: u64) -> Result<(Vec<Model>, i64)> {
    let mut query = Entity::find();

    if let Some(kw) = keyword {
        if !kw.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(Column::Name.contains(kw))
                    .add(Column::MappedTitle.contains(kw)),
            );
        }
    }

    let total = query.clone().count(conn()).await? as i64;

    let offset = page.saturating_sub(1) * page_size;
    let items = query
        .order_by_asc(Column::Id)
        .limit(page_size)
        .offset(offset)
        .all(conn())
        .await?;

    Ok((items, total))
}

/// Insert or update one mapping row keyed by raw name.
pub async fn upsert(
    name: &str,
    alias: Option<String>,
    mapped_title: Option<String>,
    category: Option<i64>,
    reviewed: bool,
) -> Result<()> {
    let existing = Entity::find()
        .filter(Column::Name.eq(name))
        .one(conn())
        .await?;

    match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.alias = Set(alias);
            active.mapped_title = Set(mapped_title);
            active.category = Set(category);
            active.reviewed = Set(if reviewed { 1 } else { 0 });
            active.update(conn()).await?;
        }
        None => {
            let active = ActiveModel {
                id: sea_orm::ActiveValue::NotSet,
                name: Set(name.to_string()),
                alias: Set(alias),
                mapped_title: Set(mapped_title),
                category: Set(category),
                reviewed: Set(if reviewed { 1 } else { 0 }),
            };
            active.insert(conn()).await?;
        }
    }

    Ok(())
}

/// Category names keyed by id, for joining display names onto search
/// results without a second query per row.
pub async fn category_names() -> Result<std::collections::HashMap<i64, String>> {
    let rows = conn()
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT id, name FROM a003_category".to_string(),
        ))
        .await?;

    let mut names = std::collections::HashMap::with_capacity(rows.len());
    for row in rows {
        names.insert(
            row.try_get::<i64>("", "id")?,
            row.try_get::<String>("", "name")?,
        );
    }
    Ok(names)
}
