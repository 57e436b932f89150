//! Host-facing operations on `AppState`.
//!
//! - `start_simulation`: spawns the game loop thread
//! - `send_command`: forwards a player command
//! - `get_snapshot`: returns the latest snapshot for polling
//! - `shutdown`: stops the game loop

use std::thread::JoinHandle;

use thiserror::Error;
use tracing::{info, warn};

use kekkai_core::commands::PlayerCommand;
use kekkai_core::state::HudSnapshot;
use kekkai_sim::SimConfig;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop disconnected")]
    Disconnected,
    #[error("host state lock poisoned")]
    Poisoned,
}

/// Start the simulation. Fails if it is already running.
pub fn start_simulation<F>(
    state: &AppState,
    config: SimConfig,
    on_snapshot: F,
) -> Result<JoinHandle<()>, HostError>
where
    F: FnMut(&HudSnapshot) + Send + 'static,
{
    let mut commands = state.commands.lock().map_err(|_| HostError::Poisoned)?;
    if state.set_running(true) {
        return Err(HostError::AlreadyRunning);
    }

    let (tx, handle) = game_loop::spawn_game_loop(config, state.snapshot.clone(), on_snapshot);
    *commands = Some(tx);
    info!("simulation started");
    Ok(handle)
}

/// Forward a player command to the game loop.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), HostError> {
    let commands = state.commands.lock().map_err(|_| HostError::Poisoned)?;
    let tx = commands.as_ref().ok_or(HostError::NotStarted)?;
    tx.send(GameLoopCommand::PlayerCommand(command))
        .map_err(|_| HostError::Disconnected)
}

/// Latest snapshot, or `None` before the first tick.
pub fn get_snapshot(state: &AppState) -> Result<Option<HudSnapshot>, HostError> {
    let snapshot = state.snapshot.lock().map_err(|_| HostError::Poisoned)?;
    Ok(snapshot.clone())
}

/// Stop the game loop. A second call is a no-op.
pub fn shutdown(state: &AppState) -> Result<(), HostError> {
    let tx = state.commands.lock().map_err(|_| HostError::Poisoned)?.take();
    if let Some(tx) = tx {
        if tx.send(GameLoopCommand::Shutdown).is_err() {
            warn!("game loop already gone");
        }
    }
    state.set_running(false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kekkai_core::enums::GameMode;

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        let result = send_command(&state, PlayerCommand::Pause);
        assert!(matches!(result, Err(HostError::NotStarted)));
    }

    #[test]
    fn test_start_twice_fails() {
        let state = AppState::new();
        let handle = start_simulation(&state, SimConfig::default(), |_| {}).unwrap();
        let again = start_simulation(&state, SimConfig::default(), |_| {});
        assert!(matches!(again, Err(HostError::AlreadyRunning)));

        shutdown(&state).unwrap();
        handle.join().unwrap();
        assert!(!state.is_running());
        shutdown(&state).unwrap();
    }

    #[test]
    fn test_command_reaches_engine() {
        let state = AppState::new();
        let handle = start_simulation(&state, SimConfig::default(), |_| {}).unwrap();
        send_command(
            &state,
            PlayerCommand::StartSession {
                mode: GameMode::Standard,
            },
        )
        .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));
        let snapshot = get_snapshot(&state).unwrap().unwrap();
        assert_eq!(snapshot.mission.wave, 1);

        shutdown(&state).unwrap();
        handle.join().unwrap();
    }
}
