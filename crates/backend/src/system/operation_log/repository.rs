use chrono::Utc;
use contracts::system::operation_log::OperationLogEntry;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

/// Audit row: who did what, with what outcome. Writes are attributed
/// from the request's token claims.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_operation_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub role: String,
    pub operation_type: String,
    pub detail: String,
    pub result: String,
    #[sea_orm(nullable)]
    pub error_message: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

impl From<Model> for OperationLogEntry {
    fn from(m: Model) -> Self {
        OperationLogEntry {
            id: m.id,
            username: m.username,
            role: m.role,
            operation_type: m.operation_type,
            detail: serde_json::from_str(&m.detail).unwrap_or(serde_json::Value::Null),
            result: m.result,
            error_message: m.error_message,
            created_at: m.created_at,
        }
    }
}

/// Append one audit entry.
pub async fn log_operation(
    username: &str,
    role: &str,
    operation_type: &str,
    detail: serde_json::Value,
    result: &str,
    error_message: Option<String>,
) -> anyhow::Result<()> {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        username: Set(username.to_string()),
        role: Set(role.to_string()),
        operation_type: Set(operation_type.to_string()),
        detail: Set(detail.to_string()),
        result: Set(result.to_string()),
        error_message: Set(error_message),
        created_at: Set(now),
    };

    active.insert(conn()).await?;
    Ok(())
}

/// Latest entries first.
pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<OperationLogEntry>> {
    let items = Entity::find()
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(conn())
        .await?;

    Ok(items.into_iter().map(OperationLogEntry::from).collect())
}
