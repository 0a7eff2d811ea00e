use anyhow::Result;
use contracts::domain::a003_category::CategoryDto;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// Administrator-defined report tab. Output order always follows the
/// category id, not name order and not first-seen order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_ordered() -> Result<Vec<CategoryDto>> {
    let items = Entity::find().order_by_asc(Column::Id).all(conn()).await?;
    Ok(items
        .into_iter()
        .map(|m| CategoryDto {
            id: m.id,
            name: m.name,
        })
        .collect())
}
