use anyhow::Result;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter, QueryOrder, Set,
    Statement,
};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// One raw order-export row. The natural key is the content hash over
/// every raw field, which doubles as the dedup guard at insert time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_order_line")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub record_hash: String,

    #[sea_orm(nullable)]
    pub shop_type: Option<String>,
    #[sea_orm(nullable)]
    pub shop_name: Option<String>,
    #[sea_orm(nullable)]
    pub document_no: Option<String>,
    #[sea_orm(nullable)]
    pub order_type: Option<String>,
    #[sea_orm(nullable)]
    pub ordered_at: Option<String>,
    #[sea_orm(nullable)]
    pub paid_at: Option<String>,

    #[sea_orm(nullable)]
    pub product_code: Option<String>,
    pub product_name: String,
    #[sea_orm(nullable)]
    pub spec_name: Option<String>,

    #[sea_orm(nullable)]
    pub quantity: Option<f64>,
    #[sea_orm(nullable)]
    pub standard_amount: Option<f64>,
    #[sea_orm(nullable)]
    pub actual_amount: Option<f64>,
    #[sea_orm(nullable)]
    pub discounted_amount: Option<f64>,
    #[sea_orm(nullable)]
    pub discount_amount: Option<f64>,

    #[sea_orm(nullable)]
    pub refund_status: Option<String>,
    #[sea_orm(nullable)]
    pub platform_order_no: Option<String>,
    #[sea_orm(nullable)]
    pub platform_status: Option<String>,
    #[sea_orm(nullable)]
    pub region_info: Option<String>,

    /// Raw columns with no typed counterpart, as a JSON object.
    #[sea_orm(nullable)]
    pub extra: Option<String>,
    pub loaded_at_utc: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Insert one row, ignoring content-hash conflicts.
/// Returns true when the row was actually inserted, false on duplicate.
pub async fn insert_or_ignore<C: ConnectionTrait>(db: &C, model: Model) -> Result<bool> {
    let active = ActiveModel {
        record_hash: Set(model.record_hash),
        shop_type: Set(model.shop_type),
        shop_name: Set(model.shop_name),
        document_no: Set(model.document_no),
        order_type: Set(model.order_type),
        ordered_at: Set(model.ordered_at),
        paid_at: Set(model.paid_at),
        product_code: Set(model.product_code),
        product_name: Set(model.product_name),
        spec_name: Set(model.spec_name),
        quantity: Set(model.quantity),
        standard_amount: Set(model.standard_amount),
        actual_amount: Set(model.actual_amount),
        discounted_amount: Set(model.discounted_amount),
        discount_amount: Set(model.discount_amount),
        refund_status: Set(model.refund_status),
        platform_order_no: Set(model.platform_order_no),
        platform_status: Set(model.platform_status),
        region_info: Set(model.region_info),
        extra: Set(model.extra),
        loaded_at_utc: Set(model.loaded_at_utc),
    };

    let rows_affected = Entity::insert(active)
        .on_conflict(
            OnConflict::column(Column::RecordHash)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(rows_affected > 0)
}

/// Fetch rows in the inclusive paid-at window, ordered by paid time.
/// Bounds compare as ISO-8601 text, the end bound extended to the end
/// of its day — lines with an empty timestamp never pass a lower bound.
pub async fn list_by_date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Vec<Model>> {
    let mut query = Entity::find();

    if let Some(start) = start_date {
        query = query.filter(Column::PaidAt.gte(start.to_string()));
    }
    if let Some(end) = end_date {
        query = query.filter(Column::PaidAt.lte(format!("{} 23:59:59", end)));
    }

    let items = query.order_by_asc(Column::PaidAt).all(conn()).await?;
    Ok(items)
}

/// Distinct non-empty paid timestamps, ordered.
pub async fn list_paid_timestamps() -> Result<Vec<String>> {
    let rows = conn()
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT DISTINCT paid_at FROM a001_order_line
             WHERE paid_at IS NOT NULL AND paid_at != '' ORDER BY paid_at"
                .to_string(),
        ))
        .await?;

    let mut timestamps = Vec::with_capacity(rows.len());
    for row in rows {
        timestamps.push(row.try_get::<String>("", "paid_at")?);
    }
    Ok(timestamps)
}

/// Total row count.
pub async fn count_total() -> Result<i64> {
    scalar_i64("SELECT COUNT(*) AS n FROM a001_order_line").await
}

/// Distinct document numbers.
pub async fn count_unique_orders() -> Result<i64> {
    scalar_i64("SELECT COUNT(DISTINCT document_no) AS n FROM a001_order_line").await
}

/// Distinct product codes.
pub async fn count_unique_products() -> Result<i64> {
    scalar_i64("SELECT COUNT(DISTINCT product_code) AS n FROM a001_order_line").await
}

/// Rows for a specific shop name (the operationally excluded channel
/// check after uploads).
pub async fn count_by_shop_name(shop_name: &str) -> Result<i64> {
    let row = conn()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM a001_order_line WHERE shop_name = ?",
            [shop_name.into()],
        ))
        .await?;
    Ok(row.map(|r| r.try_get::<i64>("", "n")).transpose()?.unwrap_or(0))
}

/// Slim scan for refund-dependent statistics: the refund predicate is
/// applied in memory by the caller so it stays in one place.
pub async fn list_refund_slim() -> Result<Vec<(Option<String>, Option<f64>, Option<f64>)>> {
    let rows = conn()
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT refund_status, quantity, discounted_amount FROM a001_order_line".to_string(),
        ))
        .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push((
            row.try_get::<Option<String>>("", "refund_status")?,
            row.try_get::<Option<f64>>("", "quantity")?,
            row.try_get::<Option<f64>>("", "discounted_amount")?,
        ));
    }
    Ok(out)
}

async fn scalar_i64(sql: &str) -> Result<i64> {
    let row = conn()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    Ok(row.map(|r| r.try_get::<i64>("", "n")).transpose()?.unwrap_or(0))
}
