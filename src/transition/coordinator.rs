//! Transition timing coordinator.
//!
//! Decides when an in-progress transition may end: never before the
//! minimum display duration, as soon as all registered loads have
//! finished after that, and unconditionally once the fail-safe
//! ceiling is hit. Runs as a background task that re-arms for every
//! transition.

use std::time::Duration;

use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

use super::state::NavigationState;

/// Timing policy for dismissing a transition.
#[derive(Debug, Clone)]
pub struct TransitionConfig {
    /// Minimum time the overlay stays up, even when every resource is
    /// already loaded.
    pub min_duration: Duration,
    /// Hard ceiling after which the transition is force-ended, loaded
    /// or not. Guards against a leaked loading registration.
    pub max_duration: Duration,
    /// How often the exit conditions are re-checked.
    pub poll_interval: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            min_duration: Duration::from_secs(4),
            max_duration: Duration::from_secs(20),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Watches a [`NavigationState`] and ends transitions per the
/// configured timing policy.
pub struct TransitionCoordinator {
    state: NavigationState,
    config: TransitionConfig,
}

impl TransitionCoordinator {
    pub fn new(state: NavigationState) -> Self {
        Self::with_config(state, TransitionConfig::default())
    }

    pub fn with_config(state: NavigationState, config: TransitionConfig) -> Self {
        Self { state, config }
    }

    /// Run forever: park until a transition starts, drive it to
    /// completion, repeat. Call inside `tokio::spawn`; aborting the
    /// task stops the polling.
    pub async fn run(self) {
        let mut rx = self.state.subscribe();

        info!(
            min_ms = self.config.min_duration.as_millis() as u64,
            max_ms = self.config.max_duration.as_millis() as u64,
            "transition coordinator started"
        );

        loop {
            while !rx.borrow_and_update().is_transitioning {
                if rx.changed().await.is_err() {
                    debug!("navigation state dropped, coordinator exiting");
                    return;
                }
            }
            self.drive_one().await;
        }
    }

    /// Poll a single in-progress transition until an exit condition
    /// fires or it ends externally.
    async fn drive_one(&self) {
        let started = Instant::now();
        let mut ticker = interval(self.config.poll_interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let snap = self.state.snapshot();
            if !snap.is_transitioning {
                debug!("transition ended externally");
                return;
            }

            let elapsed = started.elapsed();
            if elapsed > self.config.max_duration {
                warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    loading = snap.loading_count,
                    "transition hit fail-safe ceiling, forcing end"
                );
                self.state.end_transition();
                return;
            }

            if elapsed > self.config.min_duration && snap.loading_count == 0 {
                debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "transition complete"
                );
                self.state.end_transition();
                return;
            }
        }
    }
}

/// Spawn the coordinator on its own task. Aborting the returned
/// handle (the unmount path) stops the polling without touching the
/// state.
pub fn spawn_coordinator(
    state: NavigationState,
    config: TransitionConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(TransitionCoordinator::with_config(state, config).run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn default_timings() -> TransitionConfig {
        TransitionConfig {
            min_duration: Duration::from_secs(4),
            max_duration: Duration::from_secs(20),
            poll_interval: Duration::from_millis(100),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn minimum_duration_is_honored() {
        let state = NavigationState::new();
        let handle = spawn_coordinator(state.clone(), default_timings());

        state.start_transition();
        // No loads registered at all; the overlay must still hold for
        // the full minimum duration.
        sleep(Duration::from_millis(3800)).await;
        assert!(state.is_transitioning());

        sleep(Duration::from_millis(500)).await;
        assert!(!state.is_transitioning());
        assert!(!state.is_first_load());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_loads_past_minimum() {
        let state = NavigationState::new();
        let handle = spawn_coordinator(state.clone(), default_timings());

        state.start_transition();
        let guard = state.register_loading();

        sleep(Duration::from_millis(6000)).await;
        assert!(state.is_transitioning(), "load still outstanding");

        drop(guard);
        sleep(Duration::from_millis(300)).await;
        assert!(!state.is_transitioning());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn fail_safe_ceiling_fires() {
        let state = NavigationState::new();
        let handle = spawn_coordinator(state.clone(), default_timings());

        state.start_transition();
        // Leaked registration: the guard is held for the whole test.
        let _leaked = state.register_loading();

        sleep(Duration::from_millis(19800)).await;
        assert!(state.is_transitioning());

        sleep(Duration::from_millis(500)).await;
        assert!(!state.is_transitioning(), "ceiling must force the end");

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn rearms_for_subsequent_transitions() {
        let state = NavigationState::new();
        let handle = spawn_coordinator(state.clone(), default_timings());

        state.start_transition();
        sleep(Duration::from_millis(4300)).await;
        assert!(!state.is_transitioning());

        state.start_transition();
        sleep(Duration::from_millis(3800)).await;
        assert!(state.is_transitioning());
        sleep(Duration::from_millis(500)).await;
        assert!(!state.is_transitioning());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn external_end_disarms_polling() {
        let state = NavigationState::new();
        let handle = spawn_coordinator(state.clone(), default_timings());

        state.start_transition();
        sleep(Duration::from_millis(1000)).await;
        state.end_transition();

        // Well past the minimum: the coordinator must not have
        // restarted or re-ended anything; a fresh transition still
        // gets its full minimum.
        sleep(Duration::from_millis(5000)).await;
        state.start_transition();
        sleep(Duration::from_millis(3800)).await;
        assert!(state.is_transitioning());

        handle.abort();
    }
}
