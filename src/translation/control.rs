/*!
 * Run control shared between the dispatch loop and whoever drives it.
 *
 * The state is a three-valued `RunState` published through a
 * `tokio::sync::watch` channel, so the dispatch loop can sleep while paused
 * and wake as soon as the state changes. `Cancelled` is terminal.
 */

use log::info;
use std::fmt;
use tokio::sync::watch;

/// Dispatch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// New lines are dispatched
    Running,
    /// Dispatch waits; in-flight work continues
    Paused,
    /// No new lines are dispatched
    Cancelled,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}

/// Cloneable handle to the run state
#[derive(Debug, Clone)]
pub struct RunControl {
    sender: watch::Sender<RunState>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    /// Create a control in the `Running` state
    pub fn new() -> Self {
        let (sender, _) = watch::channel(RunState::Running);
        Self { sender }
    }

    /// Current state
    pub fn state(&self) -> RunState {
        *self.sender.borrow()
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.state() == RunState::Cancelled
    }

    /// Pause dispatch; no effect once cancelled
    pub fn pause(&self) -> bool {
        self.transition(RunState::Paused)
    }

    /// Resume dispatch; no effect once cancelled
    pub fn resume(&self) -> bool {
        self.transition(RunState::Running)
    }

    /// Stop dispatching new lines
    pub fn cancel(&self) -> bool {
        self.transition(RunState::Cancelled)
    }

    // Returns whether the state changed
    fn transition(&self, next: RunState) -> bool {
        let changed = self.sender.send_if_modified(|state| {
            if *state == RunState::Cancelled || *state == next {
                return false;
            }
            *state = next;
            true
        });
        if changed {
            info!("Dispatch {}", next);
        }
        changed
    }

    /// Block while paused; returns the state that ended the wait
    pub async fn wait_while_paused(&self) -> RunState {
        let mut receiver = self.sender.subscribe();
        match receiver.wait_for(|state| *state != RunState::Paused).await {
            Ok(state) => *state,
            // The sender lives in `self`, so the channel cannot close here
            Err(_) => RunState::Cancelled,
        }
    }
}
