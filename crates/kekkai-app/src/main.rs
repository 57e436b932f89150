//! Headless runner: `kekkai-app [mode.json] [seconds] [seed]`.
//!
//! Plays one session with the autopilot and logs wave and phase changes.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use kekkai_app::autopilot::Autopilot;
use kekkai_app::host::{self, HostError};
use kekkai_app::logging::init_tracing;
use kekkai_app::state::AppState;
use kekkai_core::commands::PlayerCommand;
use kekkai_core::config::ModeConfig;
use kekkai_core::enums::GamePhase;
use kekkai_core::events::FeedbackEvent;
use kekkai_core::state::HudSnapshot;
use kekkai_sim::SimConfig;

const DEFAULT_RUN_SECS: u64 = 60;
const DEFAULT_SEED: u64 = 42;
/// How often the autopilot polls the latest snapshot.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = match args.first() {
        Some(path) => match ModeConfig::load(path) {
            Ok(mode) => mode,
            Err(err) => {
                error!(%err, %path, "failed to load mode config");
                return ExitCode::FAILURE;
            }
        },
        None => ModeConfig::standard(),
    };
    let seconds = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RUN_SECS);
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    match run(SimConfig { seed, mode }, Duration::from_secs(seconds)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: SimConfig, duration: Duration) -> Result<(), HostError> {
    let state = AppState::new();
    let game_mode = config.mode.mode;

    let mut watcher = PhaseWatcher::default();
    let handle = host::start_simulation(&state, config, move |snapshot| watcher.observe(snapshot))?;
    host::send_command(&state, PlayerCommand::StartSession { mode: game_mode })?;

    let autopilot = Autopilot::default();
    let deadline = Instant::now() + duration;
    let mut last = None;
    while Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
        let Some(snapshot) = host::get_snapshot(&state)? else {
            continue;
        };
        if snapshot.phase.is_terminal() {
            last = Some(snapshot);
            break;
        }
        for command in autopilot.plan(&snapshot) {
            host::send_command(&state, command)?;
        }
        last = Some(snapshot);
    }

    host::shutdown(&state)?;
    if handle.join().is_err() {
        error!("game loop thread panicked");
    }

    if let Some(snapshot) = last {
        info!(
            phase = ?snapshot.phase,
            wave = snapshot.mission.wave,
            kills = snapshot.stats.kills,
            barriers = snapshot.stats.barriers_created,
            damage_taken = snapshot.stats.damage_taken,
            "session summary"
        );
    }
    Ok(())
}

/// Logs phase and wave transitions as the game loop reports them.
#[derive(Default)]
struct PhaseWatcher {
    phase: GamePhase,
    wave: u32,
}

impl PhaseWatcher {
    fn observe(&mut self, snapshot: &HudSnapshot) {
        if snapshot.phase != self.phase {
            info!(from = ?self.phase, to = ?snapshot.phase, "phase changed");
            self.phase = snapshot.phase;
        }
        if snapshot.mission.wave != self.wave {
            info!(
                wave = snapshot.mission.wave,
                mission = ?snapshot.mission.mission_type,
                remaining = snapshot.mission.remaining,
                "wave started"
            );
            self.wave = snapshot.mission.wave;
        }
        for event in &snapshot.feedback {
            if let FeedbackEvent::Message { text, .. } = event {
                debug!(%text, "message");
            }
        }
    }
}
