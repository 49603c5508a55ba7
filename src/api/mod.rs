//! REST API module.
//!
//! One router module per resource; each exposes a
//! `create_<resource>_router` builder. [`create_api_router`] merges
//! them all for the server binary and for tests.

pub mod admin_guard;
pub mod validation;

pub mod accommodation_routes;
pub mod artist_routes;
pub mod auth_routes;
pub mod category_routes;
pub mod event_routes;
pub mod merchandise_routes;
pub mod registration_routes;
pub mod sponsor_routes;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::auth::{create_session_store, SessionStore};
use crate::config::AppConfig;
use crate::storage::ImageStore;

pub use accommodation_routes::create_accommodation_router;
pub use admin_guard::AdminUser;
pub use artist_routes::create_artist_router;
pub use auth_routes::create_auth_router;
pub use category_routes::create_category_router;
pub use event_routes::create_event_router;
pub use merchandise_routes::create_merchandise_router;
pub use registration_routes::create_registration_router;
pub use sponsor_routes::create_sponsor_router;

/// Bucket every uploaded image lands in.
pub const IMAGE_BUCKET: &str = "festival";

/// Shared state cloned into every router.
#[derive(Clone)]
pub struct AppContext {
    pub pool: PgPool,
    pub sessions: SessionStore,
    pub images: ImageStore,
    pub config: Arc<AppConfig>,
}

impl AppContext {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let images = ImageStore::new(config.storage_root.clone(), config.public_base_url.clone());
        Self {
            pool,
            sessions: create_session_store(),
            images,
            config: Arc::new(config),
        }
    }
}

/// All API routes: auth plus the admin back-office.
pub fn create_api_router(ctx: AppContext) -> Router {
    Router::new()
        .merge(create_auth_router(ctx.clone()))
        .merge(create_accommodation_router(ctx.clone()))
        .merge(create_sponsor_router(ctx.clone()))
        .merge(create_event_router(ctx.clone()))
        .merge(create_category_router(ctx.clone()))
        .merge(create_artist_router(ctx.clone()))
        .merge(create_merchandise_router(ctx.clone()))
        .merge(create_registration_router(ctx))
}
