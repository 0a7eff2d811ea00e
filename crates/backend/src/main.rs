pub mod api;
pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::{header, Method};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Log to stdout and to a file under target/logs.
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, quiet the SQL layer.
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Request timing middleware.
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = next.run(req).await;

        tracing::info!(
            "{} {} -> {} ({}ms)",
            method,
            path,
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
        response
    }

    let config = shared::config::load_config()?;

    shared::data::db::initialize_database()
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::ensure_admin_user_exists().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let require_auth = || middleware::from_fn(system::auth::middleware::require_auth);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user).layer(require_auth()),
        )
        .route(
            "/api/system/operation-log",
            get(api::handlers::operation_log::list_recent)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        // ========================================
        // ANALYTICS ROUTES
        // ========================================
        .route(
            "/api/analyse/data",
            get(api::handlers::d200_category_summary::get_summary)
                .post(api::handlers::d200_category_summary::post_summary)
                .layer(require_auth()),
        )
        .route(
            "/api/analyse/product-details",
            get(api::handlers::d201_product_drilldown::get_drilldown).layer(require_auth()),
        )
        .route(
            "/api/analyse/generate-report",
            post(api::handlers::d202_period_report::generate_report).layer(require_auth()),
        )
        .route(
            "/api/analyse/export-weekly-report",
            post(api::handlers::d202_period_report::export_weekly_report).layer(require_auth()),
        )
        .route(
            "/api/analyse/dates",
            get(api::handlers::stats::get_available_dates).layer(require_auth()),
        )
        // ========================================
        // STORE ROUTES
        // ========================================
        .route(
            "/api/db/upload",
            post(api::handlers::u101_upload_orders::upload).layer(require_auth()),
        )
        .route("/api/db/stats", get(api::handlers::stats::get_store_stats))
        // ========================================
        // PRODUCT CURATION ROUTES
        // ========================================
        .route(
            "/api/product-manage/search",
            get(api::handlers::a002_product_mapping::search),
        )
        .route(
            "/api/product-manage/mapping",
            post(api::handlers::a002_product_mapping::upsert).layer(require_auth()),
        )
        .fallback_service(ServeDir::new("static"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Stop the other process or change config.toml.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
