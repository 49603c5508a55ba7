//! Navigation transition core.
//!
//! Coordinates page-transition overlays with asynchronous resource
//! loading: a shared [`NavigationState`] tracks whether a transition
//! is in progress and how many blocking loads are outstanding, the
//! [`TransitionCoordinator`] decides when a transition may end, and
//! the [`OverlayPhase`] machine sequences the overlay animation.

pub mod coordinator;
pub mod overlay;
pub mod state;

pub use coordinator::{spawn_coordinator, TransitionConfig, TransitionCoordinator};
pub use overlay::{OverlayDriver, OverlayEvent, OverlayPhase, OverlayTimings};
pub use state::{LoadingGuard, NavSnapshot, NavigationState};
