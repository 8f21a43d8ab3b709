//! Controller manages pipeline lifecycle state.

use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for an explicit start (console keypress).
    WaitingForStart,
    /// Capture loop is running.
    Listening,
    /// Terminal state; the capture loop has been cancelled.
    Stopped,
}

/// Events broadcast on controller transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged(ControllerState),
}

/// Event sender type.
pub type EventSender = broadcast::Sender<ControllerEvent>;

/// Coordinates start/stop signaling for the pipeline.
///
/// Stopping cancels the token handed to the engine loop, which stops the
/// audio stream and releases the device. `Stopped` is terminal.
pub struct Controller {
    state: Arc<RwLock<ControllerState>>,
    event_tx: EventSender,
    cancel: CancellationToken,
}

impl Controller {
    /// Create a new controller.
    ///
    /// Starts in `WaitingForStart` when `wait_for_start` is set, otherwise
    /// directly in `Listening`.
    pub fn new(event_tx: EventSender, wait_for_start: bool) -> Self {
        let initial = if wait_for_start {
            ControllerState::WaitingForStart
        } else {
            ControllerState::Listening
        };
        Self {
            state: Arc::new(RwLock::new(initial)),
            event_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Get the current state.
    pub async fn state(&self) -> ControllerState {
        *self.state.read().await
    }

    /// Begin listening.
    pub async fn begin_listening(&self) -> Result<(), String> {
        let mut state = self.state.write().await;
        match *state {
            ControllerState::WaitingForStart => {
                *state = ControllerState::Listening;
                self.broadcast_state_change(ControllerState::Listening);
                Ok(())
            }
            ControllerState::Listening => Ok(()), // Already listening
            ControllerState::Stopped => Err("Pipeline is stopped".to_string()),
        }
    }

    /// Stop the pipeline. Idempotent; cancels the engine loop.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if *state != ControllerState::Stopped {
            *state = ControllerState::Stopped;
            self.broadcast_state_change(ControllerState::Stopped);
        }
        self.cancel.cancel();
    }

    /// Token cancelled when the controller stops.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Broadcast a state change event.
    fn broadcast_state_change(&self, new_state: ControllerState) {
        // Ignore send errors (no subscribers)
        let _ = self.event_tx.send(ControllerEvent::StateChanged(new_state));
    }

    /// Get the event sender for creating subscribers.
    pub fn event_sender(&self) -> EventSender {
        self.event_tx.clone()
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
