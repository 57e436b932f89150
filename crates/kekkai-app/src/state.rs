//! Host state shared between the caller and the game loop thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use kekkai_core::commands::PlayerCommand;
use kekkai_core::state::HudSnapshot;

/// Messages for the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    PlayerCommand(PlayerCommand),
    /// Stop after the current tick.
    Shutdown,
}

/// Snapshot slot written by the game loop and read by pollers.
pub type SnapshotSlot = Arc<Mutex<Option<HudSnapshot>>>;

/// State owned by the host. `Sync`, so it can sit behind a shared reference
/// while the loop thread runs.
#[derive(Default)]
pub struct AppState {
    /// Present only while a game loop is running.
    pub commands: Mutex<Option<Sender<GameLoopCommand>>>,
    pub snapshot: SnapshotSlot,
    running: AtomicBool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flip the running flag. Returns the previous value.
    pub(crate) fn set_running(&self, running: bool) -> bool {
        self.running.swap(running, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.commands.lock().unwrap().is_none());
        assert!(state.snapshot.lock().unwrap().is_none());
        assert!(!state.is_running());
    }

    #[test]
    fn test_set_running_returns_previous() {
        let state = AppState::new();
        assert!(!state.set_running(true));
        assert!(state.is_running());
        assert!(state.set_running(false));
    }
}
