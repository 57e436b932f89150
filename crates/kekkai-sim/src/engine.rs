//! Simulation engine: the entry point the host drives.
//!
//! `SimulationEngine` owns the simulation context, processes player
//! commands, runs all systems in a fixed order and produces
//! `HudSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, info};

use kekkai_core::commands::PlayerCommand;
use kekkai_core::components::EnemyProfile;
use kekkai_core::config::ModeConfig;
use kekkai_core::enums::{GameMode, GamePhase};
use kekkai_core::error::ActionRejected;
use kekkai_core::events::FeedbackEvent;
use kekkai_core::state::{HudSnapshot, StatsView};
use kekkai_core::types::{BodyHandle, Rgb, SimTime};

use crate::context::{AimState, PlayerState, SimContext, WaterTank};
use crate::director::{self, MissionState};
use crate::environment::Arena;
use crate::physics::{HeadlessPhysics, PhysicsWorld};
use crate::spawn;
use crate::systems;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Mode the first session starts with. A `StartSession` for a
    /// different mode swaps in that mode's preset.
    pub mode: ModeConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mode: ModeConfig::standard(),
        }
    }
}

type System = fn(&mut SimContext);

/// Per-tick systems in execution order, after command processing.
const SYSTEMS: [(&str, System); 10] = [
    ("physics", step_physics),
    ("deferred", systems::deferred::run),
    ("director", director::update),
    ("player", systems::player::run),
    ("hazards", systems::hazards::run),
    ("behavior", systems::behavior::run),
    ("barriers", systems::barrier::resolve_shrinking),
    ("pickups", systems::pickups::run),
    ("aim", systems::aim::run),
    ("transitions", director::check_transitions),
];

/// The simulation engine. Owns the context and the command queue.
pub struct SimulationEngine {
    sim: SimContext,
    command_queue: VecDeque<PlayerCommand>,
}

impl SimulationEngine {
    /// Create an engine backed by the headless physics adapter.
    pub fn new(config: SimConfig) -> Self {
        Self::with_physics(config, Box::new(HeadlessPhysics::new()))
    }

    /// Create an engine backed by a host-provided physics world.
    pub fn with_physics(config: SimConfig, physics: Box<dyn PhysicsWorld>) -> Self {
        Self {
            sim: SimContext::new(config.mode, physics, config.seed),
            command_queue: VecDeque::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> HudSnapshot {
        self.process_commands();

        if self.sim.is_active() {
            self.run_systems();
            self.sim.time.advance();
        }

        systems::snapshot::build_snapshot(&mut self.sim)
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase
    }

    pub fn time(&self) -> SimTime {
        self.sim.time
    }

    pub fn config(&self) -> &ModeConfig {
        &self.sim.config
    }

    /// Read-only access to the entity registry.
    pub fn world(&self) -> &World {
        &self.sim.world
    }

    pub fn sim(&self) -> &SimContext {
        &self.sim
    }

    #[cfg(test)]
    pub fn sim_mut(&mut self) -> &mut SimContext {
        &mut self.sim
    }

    /// Forward a contact reported by an external physics world.
    pub fn on_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle, impact_speed: f64) {
        handle_contact(&mut self.sim, body_a, body_b, impact_speed);
    }

    // --- Player actions ---

    /// Create a barrier from a completed draw gesture.
    pub fn request_barrier(
        &mut self,
        position: DVec3,
        size: DVec3,
        yaw: f64,
        ghost: bool,
    ) -> Result<Entity, ActionRejected> {
        self.require_active()?;
        Ok(systems::barrier::create_barrier(
            &mut self.sim,
            position,
            size,
            yaw,
            ghost,
        ))
    }

    /// Destroy (metsu) `target`, or the highlighted barrier.
    pub fn perform_destroy(&mut self, target: Option<Entity>) -> Result<(), ActionRejected> {
        self.require_active()?;
        let Some(barrier) = target.or(self.sim.aim.highlighted) else {
            return Err(self.no_target());
        };
        match systems::barrier::destroy_barrier(&mut self.sim, barrier) {
            Err(ActionRejected::NoTarget) => Err(self.no_target()),
            other => other,
        }
    }

    /// Release (kai) `target`, the highlighted barrier, or the most
    /// recently created one.
    pub fn perform_release(&mut self, target: Option<Entity>) -> Result<(), ActionRejected> {
        self.require_active()?;
        let barrier = target
            .or(self.sim.aim.highlighted)
            .or_else(|| systems::barrier::most_recent(&self.sim));
        let Some(barrier) = barrier else {
            return Err(self.no_target());
        };
        systems::barrier::release_barrier(&mut self.sim, barrier)
    }

    /// Destroy every standing barrier. Returns how many were destroyed.
    pub fn perform_global_destroy(&mut self) -> Result<usize, ActionRejected> {
        self.require_active()?;
        systems::barrier::global_destroy(&mut self.sim)
    }

    /// Release every barrier. Returns how many were removed.
    pub fn perform_global_release(&mut self) -> Result<usize, ActionRejected> {
        self.require_active()?;
        Ok(systems::barrier::global_release(&mut self.sim))
    }

    pub fn jump(&mut self) -> Result<bool, ActionRejected> {
        systems::player::jump(&mut self.sim)
    }

    pub fn toggle_focus_aim(&mut self) -> Result<bool, ActionRejected> {
        systems::aim::toggle_focus(&mut self.sim)
    }

    pub fn toggle_area_denial(&mut self) -> Result<bool, ActionRejected> {
        systems::player::toggle_area_denial(&mut self.sim)
    }

    fn require_active(&self) -> Result<(), ActionRejected> {
        if self.sim.is_active() {
            Ok(())
        } else {
            Err(ActionRejected::NotActive)
        }
    }

    fn no_target(&mut self) -> ActionRejected {
        self.sim.feedback.message("NO TARGET", Rgb::RED);
        ActionRejected::NoTarget
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::StartSession { mode } => {
                self.start_session(mode);
                Ok(())
            }
            PlayerCommand::Pause => {
                if self.sim.phase == GamePhase::Active {
                    self.sim.phase = GamePhase::Paused;
                }
                Ok(())
            }
            PlayerCommand::Resume => {
                if self.sim.phase == GamePhase::Paused {
                    self.sim.phase = GamePhase::Active;
                }
                Ok(())
            }
            PlayerCommand::SetAim { origin, direction } => {
                systems::aim::set_aim(&mut self.sim, origin, direction);
                Ok(())
            }
            PlayerCommand::ToggleFocusAim => self.toggle_focus_aim().map(drop),
            PlayerCommand::RequestBarrier {
                position,
                size,
                yaw,
                ghost,
            } => self.request_barrier(position, size, yaw, ghost).map(drop),
            PlayerCommand::Destroy => self.perform_destroy(None),
            PlayerCommand::Release => self.perform_release(None),
            PlayerCommand::GlobalDestroy => self.perform_global_destroy().map(drop),
            PlayerCommand::GlobalRelease => self.perform_global_release().map(drop),
            PlayerCommand::Jump => self.jump().map(drop),
            PlayerCommand::ToggleAreaDenial => self.toggle_area_denial().map(drop),
        };
        if let Err(reason) = result {
            debug!(%reason, "command rejected");
        }
    }

    /// Start a session from the menu or after a terminal phase.
    fn start_session(&mut self, mode: GameMode) {
        if !(self.sim.phase == GamePhase::MainMenu || self.sim.phase.is_terminal()) {
            return;
        }
        let config = if self.sim.config.mode == mode {
            self.sim.config.clone()
        } else {
            ModeConfig::preset(mode)
        };
        self.reset_session(config);

        spawn::spawn_player(&mut self.sim);
        spawn::spawn_tank_mesh(&mut self.sim);
        self.sim.phase = GamePhase::Active;
        info!(?mode, "session started");
        director::start_wave(&mut self.sim, 1);
    }

    /// Tear down everything the previous session left behind.
    fn reset_session(&mut self, config: ModeConfig) {
        let sim = &mut self.sim;
        let entities: Vec<Entity> = sim.world.iter().map(|e| e.entity()).collect();
        for entity in entities {
            spawn::despawn(sim, entity);
        }
        if let Some(body) = sim.player.body.take() {
            sim.physics.remove_body(body);
        }
        if let Some(mesh) = sim.tank.mesh.take() {
            sim.feedback.push(FeedbackEvent::RemoveMesh { mesh });
        }

        sim.arena = Arena::new(&config.field);
        sim.player = PlayerState::new(&config);
        sim.config = config;
        sim.time = SimTime::default();
        sim.scheduler.clear();
        sim.mission = MissionState::default();
        sim.stats = StatsView::default();
        sim.tank = WaterTank::default();
        sim.aim = AimState::default();
    }

    /// Run all systems in order, stopping once the session leaves `Active`.
    fn run_systems(&mut self) {
        for (name, system) in SYSTEMS {
            system(&mut self.sim);
            if !self.sim.is_active() {
                debug!(system = name, phase = ?self.sim.phase, "tick stopped early");
                break;
            }
        }
    }
}

/// Step the physics world and route the contacts it reports.
fn step_physics(sim: &mut SimContext) {
    let dt = sim.dt();
    for contact in sim.physics.step(dt) {
        handle_contact(sim, contact.body_a, contact.body_b, contact.impact_speed);
    }
}

/// Player-enemy impacts damage the player. Other pairs are ignored.
fn handle_contact(sim: &mut SimContext, body_a: BodyHandle, body_b: BodyHandle, impact_speed: f64) {
    if !sim.is_active() {
        return;
    }
    let Some(player_body) = sim.player.body else {
        return;
    };
    let other = if body_a == player_body {
        body_b
    } else if body_b == player_body {
        body_a
    } else {
        return;
    };
    let Some(enemy) = sim.entity_for_body(other) else {
        return;
    };
    if sim.world.get::<&EnemyProfile>(enemy).is_err() {
        return;
    }
    let position = sim.physics.position(other);
    systems::player::on_impact(sim, position, impact_speed);
}
