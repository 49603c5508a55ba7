//! festival - event operations backend.
//!
//! Core pieces:
//! - the navigation transition core ([`transition`]): a shared state
//!   handle, a timing coordinator, and the overlay phase machine that
//!   together decide when a page-transition overlay may dismiss;
//! - the admin REST API ([`api`], behind the `server` feature):
//!   CRUD routes for events, sponsors, accommodation, merchandise,
//!   artists, categories and the registrations report, plus auth;
//! - the Postgres service layer ([`database`], behind the `database`
//!   feature) and the disk-backed [`storage`] for uploaded images.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use festival::config::AppConfig;
//! use festival::transition::{spawn_coordinator, NavigationState};
//!
//! # async fn demo() {
//! let config = AppConfig::from_env();
//! let nav = NavigationState::new();
//! let _coordinator = spawn_coordinator(nav.clone(), config.transition);
//!
//! nav.start_transition();
//! let guard = nav.register_loading();
//! // ... fetch the blocking resource ...
//! drop(guard);
//! // The coordinator ends the transition once the minimum display
//! // time has passed and no loads remain.
//! # }
//! ```

// Core error handling
pub mod error;

// Environment configuration
pub mod config;

// Navigation transition core
pub mod transition;

// Authentication and sessions
pub mod auth;

// Uploaded image storage
pub mod storage;

// Database integration (when enabled)
#[cfg(feature = "database")]
pub mod database;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

// Public re-exports
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use transition::{
    LoadingGuard, NavSnapshot, NavigationState, OverlayPhase, TransitionConfig,
    TransitionCoordinator,
};

#[cfg(feature = "server")]
pub use api::{create_api_router, AppContext};
