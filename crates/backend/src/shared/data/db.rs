use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect to the SQLite store and make sure the schema exists.
/// Loads the database path from config.toml (see shared::config).
pub async fn initialize_database() -> anyhow::Result<()> {
    let config = crate::shared::config::load_config()?;
    let db_file = crate::shared::config::get_database_path(&config)?;

    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Normalize path separators and ensure proper URL form on Windows
    let normalized = db_file.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Connecting to database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;

    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection not initialized. Call initialize_database() first.")
}

/// Idempotent schema bootstrap. The content-hash unique index on
/// a001_order_line is the sole concurrency guard for ingestion.
async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS a001_order_line (
            record_hash TEXT PRIMARY KEY NOT NULL,
            shop_type TEXT,
            shop_name TEXT,
            document_no TEXT,
            order_type TEXT,
            ordered_at TEXT,
            paid_at TEXT,
            product_code TEXT,
            product_name TEXT NOT NULL DEFAULT '',
            spec_name TEXT,
            quantity REAL,
            standard_amount REAL,
            actual_amount REAL,
            discounted_amount REAL,
            discount_amount REAL,
            refund_status TEXT,
            platform_order_no TEXT,
            platform_status TEXT,
            region_info TEXT,
            extra TEXT,
            loaded_at_utc TEXT NOT NULL
        );
        "#,
        "CREATE INDEX IF NOT EXISTS idx_a001_paid_at ON a001_order_line (paid_at);",
        "CREATE INDEX IF NOT EXISTS idx_a001_product_name ON a001_order_line (product_name);",
        r#"
        CREATE TABLE IF NOT EXISTS a002_product_mapping (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            alias TEXT,
            mapped_title TEXT,
            category INTEGER,
            reviewed INTEGER NOT NULL DEFAULT 0
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a003_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            role TEXT NOT NULL DEFAULT 'user',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_operation_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            role TEXT NOT NULL,
            operation_type TEXT NOT NULL,
            detail TEXT NOT NULL DEFAULT '{}',
            result TEXT NOT NULL,
            error_message TEXT,
            created_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
        "#,
    ];

    for sql in statements {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    tracing::info!("Schema bootstrap complete");
    Ok(())
}
