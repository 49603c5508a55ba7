//! Shared navigation state.
//!
//! One [`NavigationState`] handle is constructed at startup and cloned
//! into every consumer that needs to know whether a route transition
//! is in progress or hold the overlay open while a resource loads.
//! All mutation goes through the handle; observers subscribe to a
//! watch channel of snapshots.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Point-in-time view of the navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSnapshot {
    /// True until the first transition completes; never true again.
    pub is_first_load: bool,
    /// True while the transition overlay should be up.
    pub is_transitioning: bool,
    /// Outstanding blocking resource loads. Never negative.
    pub loading_count: u32,
}

impl NavSnapshot {
    fn initial() -> Self {
        Self {
            is_first_load: true,
            is_transitioning: false,
            loading_count: 0,
        }
    }
}

struct Shared {
    tx: watch::Sender<NavSnapshot>,
}

/// Cheaply clonable handle to the shared navigation state.
#[derive(Clone)]
pub struct NavigationState {
    shared: Arc<Shared>,
}

impl NavigationState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(NavSnapshot::initial());
        Self {
            shared: Arc::new(Shared { tx }),
        }
    }

    pub fn snapshot(&self) -> NavSnapshot {
        *self.shared.tx.borrow()
    }

    pub fn is_transitioning(&self) -> bool {
        self.snapshot().is_transitioning
    }

    pub fn is_first_load(&self) -> bool {
        self.snapshot().is_first_load
    }

    pub fn loading_count(&self) -> u32 {
        self.snapshot().loading_count
    }

    /// Subscribe to state changes. The receiver sees every mutation.
    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.shared.tx.subscribe()
    }

    /// Begin a route transition. Any loading registrations left over
    /// from the previous page are discarded so a stale count cannot
    /// block the new transition.
    pub fn start_transition(&self) {
        self.shared.tx.send_modify(|s| {
            s.is_transitioning = true;
            s.loading_count = 0;
        });
        debug!("transition started");
    }

    /// End the current transition. Idempotent: calling while not
    /// transitioning leaves the state unchanged apart from latching
    /// `is_first_load` to false.
    pub fn end_transition(&self) {
        self.shared.tx.send_modify(|s| {
            s.is_transitioning = false;
            s.is_first_load = false;
        });
        debug!("transition ended");
    }

    /// Register one blocking resource load. The returned guard holds
    /// the count until it is dropped or released, so the matching
    /// unregister happens on every exit path.
    pub fn register_loading(&self) -> LoadingGuard {
        self.shared.tx.send_modify(|s| s.loading_count += 1);
        LoadingGuard {
            state: self.clone(),
            released: false,
        }
    }

    fn unregister_loading(&self) {
        // Floored at zero: a guard that outlives a start_transition
        // reset must not underflow the fresh count.
        self.shared
            .tx
            .send_modify(|s| s.loading_count = s.loading_count.saturating_sub(1));
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NavigationState")
            .field(&self.snapshot())
            .finish()
    }
}

/// RAII handle for one registered blocking load.
#[must_use = "dropping the guard immediately unregisters the load"]
pub struct LoadingGuard {
    state: NavigationState,
    released: bool,
}

impl LoadingGuard {
    /// Release the guard early. Equivalent to dropping it.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.state.unregister_loading();
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for LoadingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingGuard")
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_track_loading_count() {
        let state = NavigationState::new();
        assert_eq!(state.loading_count(), 0);

        let g1 = state.register_loading();
        let g2 = state.register_loading();
        assert_eq!(state.loading_count(), 2);

        drop(g1);
        assert_eq!(state.loading_count(), 1);
        g2.release();
        assert_eq!(state.loading_count(), 0);
    }

    #[test]
    fn count_never_goes_negative() {
        let state = NavigationState::new();
        let g1 = state.register_loading();
        let g2 = state.register_loading();

        // The reset zeroes the count while both guards are alive.
        state.start_transition();
        assert_eq!(state.loading_count(), 0);

        drop(g1);
        drop(g2);
        assert_eq!(state.loading_count(), 0);
    }

    #[test]
    fn start_resets_stale_count() {
        let state = NavigationState::new();
        let _stale = state.register_loading();
        assert_eq!(state.loading_count(), 1);

        state.start_transition();
        let snap = state.snapshot();
        assert!(snap.is_transitioning);
        assert_eq!(snap.loading_count, 0);
    }

    #[test]
    fn end_is_idempotent() {
        let state = NavigationState::new();
        state.start_transition();
        state.end_transition();
        state.end_transition();
        state.end_transition();

        let snap = state.snapshot();
        assert!(!snap.is_transitioning);
        assert!(!snap.is_first_load);
    }

    #[test]
    fn first_load_latches_false() {
        let state = NavigationState::new();
        assert!(state.is_first_load());

        state.start_transition();
        assert!(state.is_first_load());
        state.end_transition();
        assert!(!state.is_first_load());

        state.start_transition();
        state.end_transition();
        assert!(!state.is_first_load());
    }

    #[test]
    fn subscribers_see_changes() {
        let state = NavigationState::new();
        let rx = state.subscribe();

        state.start_transition();
        assert!(rx.borrow().is_transitioning);

        state.end_transition();
        assert!(!rx.borrow().is_transitioning);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Register,
            DropOne,
            StartTransition,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Register),
                Just(Op::DropOne),
                Just(Op::StartTransition),
            ]
        }

        proptest! {
            /// Any interleaving of registrations, guard drops and
            /// transition resets keeps the count at the floored value:
            /// zero after a reset, never below zero, and exactly the
            /// number of live registrations otherwise.
            #[test]
            fn count_is_floored_under_any_interleaving(
                ops in proptest::collection::vec(op_strategy(), 1..64)
            ) {
                let state = NavigationState::new();
                let mut guards: Vec<LoadingGuard> = Vec::new();
                let mut expected: u32 = 0;

                for op in ops {
                    match op {
                        Op::Register => {
                            guards.push(state.register_loading());
                            expected += 1;
                        }
                        Op::DropOne => {
                            if guards.pop().is_some() {
                                expected = expected.saturating_sub(1);
                            }
                        }
                        Op::StartTransition => {
                            state.start_transition();
                            expected = 0;
                        }
                    }
                    prop_assert_eq!(state.loading_count(), expected);
                }
            }
        }
    }
}
