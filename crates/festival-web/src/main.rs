//! Festival Web Server
//!
//! Binds the admin and auth API routers from the core library and
//! serves uploaded images as static files.

use std::net::SocketAddr;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use festival::api::{create_api_router, AppContext};
use festival::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "festival_web=debug,festival=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Festival Web Server");

    let config = AppConfig::from_env();
    if config.admin_email.is_empty() {
        tracing::warn!("ADMIN_EMAIL is not set; every mutating admin route will reject");
    }

    let pool = match sqlx::PgPool::connect(&config.database_url).await {
        Ok(p) => {
            tracing::info!("Database connection established");
            p
        }
        Err(e) => {
            tracing::error!("Failed to connect to database at {}: {}", config.database_url, e);
            tracing::error!(
                "Please check DATABASE_URL environment variable and ensure PostgreSQL is running"
            );
            return Err(format!("Database connection failed: {}", e).into());
        }
    };

    let storage_root = config.storage_root.clone();
    let port = config.port;
    let ctx = AppContext::new(pool, config);

    // CORS for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(create_api_router(ctx))
        // Uploaded images, addressed by their public URLs
        .nest_service("/storage", ServeDir::new(&storage_root))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("");
    tracing::info!("===========================================");
    tracing::info!("  Festival Web Server running on http://{}", addr);
    tracing::info!("===========================================");
    tracing::info!("");
    tracing::info!("API Endpoints:");
    tracing::info!("  /api/auth/*                     - Register / login / logout");
    tracing::info!("  /api/admin/events               - Events and fees");
    tracing::info!("  /api/admin/sponsors             - Sponsors (+ /reorder)");
    tracing::info!("  /api/admin/accommodation        - Accommodation packages");
    tracing::info!("  /api/admin/categories           - Event categories");
    tracing::info!("  /api/admin/artists              - Line-up artists");
    tracing::info!("  /api/admin/merchandise/*        - Products and orders");
    tracing::info!("  /api/admin/registrations        - Registrations report");
    tracing::info!("  /storage/*                      - Uploaded images");
    tracing::info!("");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Try: lsof -ti:{} | xargs kill -9",
                    port,
                    port
                );
            }
            return Err(format!("Failed to bind to {}: {}", addr, e).into());
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return Err(format!("Server error: {}", e).into());
    }

    Ok(())
}
