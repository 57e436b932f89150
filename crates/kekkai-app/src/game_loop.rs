//! Game loop thread: runs `SimulationEngine` at 60Hz, hands each
//! snapshot to an observer and keeps the latest one for polling.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use kekkai_core::constants::TICK_RATE;
use kekkai_core::state::HudSnapshot;
use kekkai_sim::{SimConfig, SimulationEngine};

use crate::state::{GameLoopCommand, SnapshotSlot};

/// Duration of one simulation tick at 60Hz.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the game loop on a dedicated thread.
///
/// Returns the sender for forwarding commands and the thread handle.
/// `on_snapshot` runs on the game loop thread after every tick.
pub fn spawn_game_loop<F>(
    config: SimConfig,
    slot: SnapshotSlot,
    on_snapshot: F,
) -> (mpsc::Sender<GameLoopCommand>, thread::JoinHandle<()>)
where
    F: FnMut(&HudSnapshot) + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<GameLoopCommand>();

    let handle = thread::Builder::new()
        .name("kekkai-game-loop".into())
        .spawn(move || {
            run_game_loop(config, rx, slot, on_snapshot);
        })
        .expect("failed to spawn game loop thread");

    (tx, handle)
}

/// The main game loop. Runs until Shutdown or the channel disconnects.
fn run_game_loop<F>(
    config: SimConfig,
    rx: mpsc::Receiver<GameLoopCommand>,
    slot: SnapshotSlot,
    mut on_snapshot: F,
) where
    F: FnMut(&HudSnapshot),
{
    info!(seed = config.seed, mode = ?config.mode.mode, "game loop started");
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands (non-blocking)
        loop {
            match rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => {
                    info!("game loop shut down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("command channel disconnected");
                    return;
                }
            }
        }

        // 2. Advance the simulation
        let snapshot = engine.tick();

        // 3. Hand it to the observer
        on_snapshot(&snapshot);

        // 4. Store for polling
        if let Ok(mut latest) = slot.lock() {
            *latest = Some(snapshot);
        }

        // 5. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset rather than spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use kekkai_core::commands::PlayerCommand;
    use kekkai_core::enums::{GameMode, GamePhase};

    fn wait_for_phase(latest: &SnapshotSlot, phase: GamePhase) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if latest
                .lock()
                .unwrap()
                .as_ref()
                .is_some_and(|s| s.phase == phase)
            {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_channel_round_trip() {
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(SimConfig::default(), latest.clone(), |_| {});

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartSession {
            mode: GameMode::Standard,
        }))
        .unwrap();
        assert!(wait_for_phase(&latest, GamePhase::Active));

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();

        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.mission.wave, 1);
        assert!(snapshot.time.tick >= 1);
    }

    #[test]
    fn test_pause_resume() {
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(SimConfig::default(), latest.clone(), |_| {});
        let send = |cmd| tx.send(GameLoopCommand::PlayerCommand(cmd)).unwrap();

        send(PlayerCommand::StartSession {
            mode: GameMode::Standard,
        });
        assert!(wait_for_phase(&latest, GamePhase::Active));

        send(PlayerCommand::Pause);
        assert!(wait_for_phase(&latest, GamePhase::Paused));
        let paused_at = latest.lock().unwrap().as_ref().unwrap().time.tick;
        thread::sleep(Duration::from_millis(50));
        assert_eq!(latest.lock().unwrap().as_ref().unwrap().time.tick, paused_at);

        send(PlayerCommand::Resume);
        assert!(wait_for_phase(&latest, GamePhase::Active));

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_observer_sees_every_tick() {
        let latest = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(0u32));
        let counter = seen.clone();
        let (tx, handle) = spawn_game_loop(SimConfig::default(), latest, move |_| {
            *counter.lock().unwrap() += 1;
        });
        thread::sleep(Duration::from_millis(100));
        drop(tx);
        handle.join().unwrap();
        assert!(*seen.lock().unwrap() >= 1);
    }

    #[test]
    fn test_snapshot_serialization_performance() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.queue_command(PlayerCommand::StartSession {
            mode: GameMode::Standard,
        });
        let mut snapshot = engine.tick();
        for _ in 0..120 {
            snapshot = engine.tick();
        }

        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(!json.is_empty());
        assert!(
            elapsed.as_millis() < 3,
            "serialization took {elapsed:?}, expected < 3ms"
        );
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(TICK_DURATION.as_nanos(), 16_666_666);
    }
}
