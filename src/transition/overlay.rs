//! Overlay phase machine.
//!
//! The overlay is purely presentational: it follows `is_transitioning`
//! through a fixed choreography (idle, a short delay, the entry
//! animation, the exit animation) and owes exactly one contract:
//! it never rests outside `Idle` while no transition is in progress.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use super::state::{NavSnapshot, NavigationState};

/// Where the overlay is in its enter/exit choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPhase {
    /// Hidden, parked behind the page content.
    #[default]
    Idle,
    /// Short pause before the entry animation starts.
    Delay,
    /// Entry animation playing; overlay covers the page.
    Enter,
    /// Dismissal animation playing.
    Exit,
}

impl OverlayPhase {
    /// Advance the machine by one event. Events that make no sense in
    /// the current phase leave it unchanged.
    pub fn step(self, event: OverlayEvent) -> OverlayPhase {
        use OverlayEvent::*;
        use OverlayPhase::*;

        match (self, event) {
            (_, TransitionStarted) => Delay,
            (Delay, DelayElapsed) => Enter,
            (Delay | Enter, TransitionEnded) => Exit,
            (Exit, ExitFinished) => Idle,
            (phase, _) => phase,
        }
    }

    /// True while the overlay should be visually hidden.
    pub fn is_hidden(self) -> bool {
        matches!(self, OverlayPhase::Idle)
    }
}

/// What can move the overlay between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    TransitionStarted,
    DelayElapsed,
    TransitionEnded,
    ExitFinished,
}

/// Fixed animation timings.
#[derive(Debug, Clone)]
pub struct OverlayTimings {
    /// Pause between a transition starting and the entry animation.
    pub delay: Duration,
    /// Length of the dismissal animation.
    pub exit: Duration,
}

impl Default for OverlayTimings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
            exit: Duration::from_millis(3200),
        }
    }
}

/// Drives [`OverlayPhase`] from navigation state changes and the fixed
/// timings, publishing the current phase on a watch channel.
pub struct OverlayDriver {
    rx: watch::Receiver<NavSnapshot>,
    phase_tx: watch::Sender<OverlayPhase>,
    timings: OverlayTimings,
}

impl OverlayDriver {
    pub fn new(state: &NavigationState) -> (Self, watch::Receiver<OverlayPhase>) {
        Self::with_timings(state, OverlayTimings::default())
    }

    pub fn with_timings(
        state: &NavigationState,
        timings: OverlayTimings,
    ) -> (Self, watch::Receiver<OverlayPhase>) {
        let (phase_tx, phase_rx) = watch::channel(OverlayPhase::Idle);
        (
            Self {
                rx: state.subscribe(),
                phase_tx,
                timings,
            },
            phase_rx,
        )
    }

    /// Run until the navigation state is dropped. Call inside
    /// `tokio::spawn`.
    pub async fn run(mut self) {
        loop {
            // Park until a transition begins.
            while !self.rx.borrow_and_update().is_transitioning {
                if self.rx.changed().await.is_err() {
                    return;
                }
            }

            self.apply(OverlayEvent::TransitionStarted);
            tokio::time::sleep(self.timings.delay).await;

            if self.rx.borrow().is_transitioning {
                self.apply(OverlayEvent::DelayElapsed);

                // Hold the entry phase until the transition ends.
                while self.rx.borrow_and_update().is_transitioning {
                    if self.rx.changed().await.is_err() {
                        break;
                    }
                }
            }

            self.apply(OverlayEvent::TransitionEnded);
            tokio::time::sleep(self.timings.exit).await;
            self.apply(OverlayEvent::ExitFinished);
        }
    }

    fn apply(&self, event: OverlayEvent) {
        self.phase_tx.send_modify(|phase| {
            let next = phase.step(event);
            if next != *phase {
                debug!(from = ?phase, to = ?next, "overlay phase");
                *phase = next;
            }
        });
    }
}
