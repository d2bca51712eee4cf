// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline lifecycle state machine.
//!
//! `Idle -> Running -> Draining -> Stopped`, one step at a time. Skipping
//! `Draining` is rejected: abrupt termination would lose already-ingested,
//! not-yet-analyzed messages. Observers subscribe via a watch channel and
//! see every transition.

use moodwire_core::{MoodwireError, PipelineState};
use tokio::sync::watch;
use tracing::info;

/// Shared, observable pipeline state with enforced transitions.
pub struct StateCell {
    tx: watch::Sender<PipelineState>,
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell {
    /// Creates a cell in the `Idle` state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PipelineState::Idle);
        Self { tx }
    }

    /// Current state.
    pub fn current(&self) -> PipelineState {
        *self.tx.borrow()
    }

    /// Returns a receiver observing every transition.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.tx.subscribe()
    }

    /// Performs one state transition, rejecting anything but the single
    /// legal successor of the current state.
    pub fn transition(&self, to: PipelineState) -> Result<(), MoodwireError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if is_legal(*state, to) {
                *state = to;
                true
            } else {
                outcome = Err(MoodwireError::Internal(format!(
                    "illegal pipeline transition: {state} -> {to}"
                )));
                false
            }
        });
        if outcome.is_ok() {
            info!(state = %to, "pipeline state transition");
        }
        outcome
    }
}

fn is_legal(from: PipelineState, to: PipelineState) -> bool {
    matches!(
        (from, to),
        (PipelineState::Idle, PipelineState::Running)
            | (PipelineState::Running, PipelineState::Draining)
            | (PipelineState::Draining, PipelineState::Stopped)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_legal_path() {
        let cell = StateCell::new();
        assert_eq!(cell.current(), PipelineState::Idle);
        cell.transition(PipelineState::Running).unwrap();
        cell.transition(PipelineState::Draining).unwrap();
        cell.transition(PipelineState::Stopped).unwrap();
        assert_eq!(cell.current(), PipelineState::Stopped);
    }

    #[test]
    fn draining_cannot_be_skipped() {
        let cell = StateCell::new();
        cell.transition(PipelineState::Running).unwrap();
        assert!(cell.transition(PipelineState::Stopped).is_err());
        assert_eq!(cell.current(), PipelineState::Running);
    }

    #[test]
    fn stopped_is_terminal() {
        let cell = StateCell::new();
        cell.transition(PipelineState::Running).unwrap();
        cell.transition(PipelineState::Draining).unwrap();
        cell.transition(PipelineState::Stopped).unwrap();
        assert!(cell.transition(PipelineState::Running).is_err());
        assert!(cell.transition(PipelineState::Draining).is_err());
    }

    #[test]
    fn idle_cannot_drain() {
        let cell = StateCell::new();
        assert!(cell.transition(PipelineState::Draining).is_err());
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let cell = StateCell::new();
        let mut rx = cell.subscribe();
        assert_eq!(*rx.borrow(), PipelineState::Idle);

        cell.transition(PipelineState::Running).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), PipelineState::Running);
    }
}
