//! Mission/wave director.
//!
//! Owns the wave sequence: mission selection, objective counting,
//! population caps and terminal transitions. The next wave is never
//! started from inside a clear; it is queued in the [`EventQueue`] so a
//! game over can cancel it.
//!
//! [`EventQueue`]: crate::scheduler::EventQueue

pub mod escort;
pub mod puzzle;

use glam::DVec3;
use hecs::Entity;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, info};

use kekkai_behavior::steering::pick_spawn_point;
use kekkai_core::components::{EnemyProfile, Pickup, WaterSplash};
use kekkai_core::constants::{BOSS_HOVER_MAX_Y, BOSS_HOVER_MIN_Y, BOSS_ORBIT_RADIUS};
use kekkai_core::enums::{EnemyArchetype, GamePhase, MissionType, RemovalCause};
use kekkai_core::types::Rgb;

use crate::context::SimContext;
use crate::scheduler::{DeferredAction, EventId};
use crate::spawn::{self, EnemySpawn};
use crate::systems::combat::{self, RemovedEnemy};

pub use puzzle::PuzzleState;

/// Per-session mission progress.
#[derive(Debug, Clone)]
pub struct MissionState {
    pub wave: u32,
    pub mission_type: MissionType,
    /// Remaining-objective counter.
    pub remaining: u32,
    pub next_spawn_secs: f64,
    pub escort: Option<Entity>,
    pub puzzle: Option<PuzzleState>,
    /// Boss or target whose health the HUD shows.
    pub objective: Option<Entity>,
    /// The objective reached zero this wave.
    pub cleared: bool,
    pub pending_advance: Option<EventId>,
    pub hp_multiplier: f64,
}

impl Default for MissionState {
    fn default() -> Self {
        Self {
            wave: 0,
            mission_type: MissionType::default(),
            remaining: 0,
            next_spawn_secs: 0.0,
            escort: None,
            puzzle: None,
            objective: None,
            cleared: false,
            pending_advance: None,
            hp_multiplier: 1.0,
        }
    }
}

/// Reset per-wave state and start wave `n`.
pub fn start_wave(sim: &mut SimContext, wave: u32) {
    if let Some(id) = sim.mission.pending_advance.take() {
        sim.scheduler.cancel(id);
    }
    clear_hostiles(sim);
    escort::remove(sim);
    clear_transients(sim);

    let rotation = &sim.config.director.mission_rotation;
    let mission_type = rotation
        .get((wave.max(1) as usize - 1) % rotation.len().max(1))
        .copied()
        .unwrap_or_default();

    let now = sim.now();
    let mission = &mut sim.mission;
    mission.wave = wave;
    mission.mission_type = mission_type;
    mission.remaining = sim.config.director.objective_for(mission_type);
    mission.cleared = false;
    mission.objective = None;
    mission.puzzle = None;
    mission.hp_multiplier = sim.config.hp_multiplier(wave);
    mission.next_spawn_secs = now + sim.config.director.ambient_spawn_interval_secs;

    info!(wave, mission = ?mission_type, remaining = sim.mission.remaining, "wave started");
    sim.feedback.message(format!("WAVE {wave} START"), Rgb::WHITE);
    sim.feedback.message(mission_type.label(), Rgb::WHITE);

    setup_mission(sim, mission_type);

    for _ in 0..sim.config.director.initial_spawn_batch {
        request_spawn(sim, None);
    }
}

fn setup_mission(sim: &mut SimContext, mission_type: MissionType) {
    match mission_type {
        MissionType::Normal | MissionType::Infinite => {}
        MissionType::Escort => {
            sim.mission.escort = Some(spawn::spawn_escort(sim));
        }
        MissionType::BossComposite => {
            sim.mission.objective = Some(spawn::spawn_composite_boss(sim));
        }
        MissionType::Hunt => {
            let position = pick_spawn_point(EnemyArchetype::Target, &sim.arena.bounds, &mut sim.rng);
            let target = spawn::spawn_enemy(
                sim,
                EnemyArchetype::Target,
                position,
                EnemySpawn {
                    is_target: true,
                    ..Default::default()
                },
            );
            sim.mission.objective = Some(target);
        }
        MissionType::Puzzle => {
            let state = puzzle::setup(sim);
            sim.mission.objective = Some(state.core);
            sim.mission.puzzle = Some(state);
        }
        MissionType::BossEater => {
            let height = (BOSS_HOVER_MIN_Y + BOSS_HOVER_MAX_Y) * 0.5;
            let boss = spawn::spawn_enemy(
                sim,
                EnemyArchetype::BossCore,
                DVec3::new(BOSS_ORBIT_RADIUS, height, 0.0),
                EnemySpawn {
                    is_boss: true,
                    ..Default::default()
                },
            );
            sim.mission.objective = Some(boss);
        }
    }
}

/// Per-tick director work: ambient spawning, escort steering and the
/// endless-mode ramp.
pub fn update(sim: &mut SimContext) {
    if sim.mission.cleared {
        return;
    }
    let now = sim.now();

    escort::update(sim);

    if now > sim.mission.next_spawn_secs {
        request_spawn(sim, None);
        sim.mission.next_spawn_secs = now + sim.config.director.ambient_spawn_interval_secs;
    }

    if let Some(rule) = sim.config.rules.infinite {
        let cap = rule.base_cap + rule.cap_per_wave * sim.mission.wave as usize;
        if live_counts(sim).0 < cap && sim.rng.gen::<f64>() < rule.spawn_chance {
            request_spawn(sim, None);
        }
        if sim.stats.damage_dealt > sim.mission.wave as f64 * rule.damage_per_level {
            sim.mission.wave += 1;
            sim.mission.hp_multiplier += rule.difficulty_step;
            info!(level = sim.mission.wave, "danger level raised");
            sim.feedback
                .message(format!("DANGER LEVEL {}", sim.mission.wave), Rgb::RED);
        }
    }
}

/// Live enemies (excluding non-physical anchors) and the ambient subset
/// that is not part of a boss or puzzle encounter.
pub fn live_counts(sim: &SimContext) -> (usize, usize) {
    let mut live = 0;
    let mut ambient = 0;
    for (_, profile) in sim.world.query::<&EnemyProfile>().iter() {
        if profile.archetype == EnemyArchetype::CompositeCore {
            continue;
        }
        live += 1;
        if !profile.archetype.is_boss_side() {
            ambient += 1;
        }
    }
    (live, ambient)
}

fn population_allows(sim: &SimContext) -> bool {
    let (live, ambient) = live_counts(sim);
    if let Some(rule) = sim.config.rules.infinite {
        return live < rule.base_cap + rule.cap_per_wave * sim.mission.wave as usize;
    }
    let director = &sim.config.director;
    if live >= director.global_enemy_cap {
        return false;
    }
    match sim.mission.mission_type {
        m if m.is_boss_fight() => ambient < director.boss_fight_enemy_cap,
        MissionType::Puzzle => ambient < director.puzzle_fight_enemy_cap,
        _ => true,
    }
}

fn pick_archetype(sim: &mut SimContext) -> Option<EnemyArchetype> {
    let table = sim.config.spawn_table(sim.mission.mission_type);
    let weights = WeightedIndex::new(table.iter().map(|e| e.weight.max(0.0))).ok()?;
    let archetype = table[weights.sample(&mut sim.rng)].archetype;

    if archetype == EnemyArchetype::BossCore {
        let boss_alive = sim
            .world
            .query::<&EnemyProfile>()
            .iter()
            .any(|(_, p)| p.archetype == EnemyArchetype::BossCore);
        if boss_alive {
            return Some(EnemyArchetype::Normal);
        }
    }
    Some(archetype)
}

/// Ask for one enemy. Returns `None` when a population cap (or a cleared
/// or inactive session) rejects the request.
pub fn request_spawn(sim: &mut SimContext, archetype: Option<EnemyArchetype>) -> Option<Entity> {
    if !sim.is_active() || sim.mission.cleared {
        return None;
    }
    if !population_allows(sim) {
        debug!(mission = ?sim.mission.mission_type, "spawn dropped at population cap");
        return None;
    }
    let archetype = match archetype {
        Some(a) => a,
        None => pick_archetype(sim)?,
    };
    let position = pick_spawn_point(archetype, &sim.arena.bounds, &mut sim.rng);
    Some(spawn::spawn_enemy(
        sim,
        archetype,
        position,
        EnemySpawn {
            is_boss: archetype == EnemyArchetype::BossCore,
            ..Default::default()
        },
    ))
}

fn qualifies(mission: MissionType, removed: &RemovedEnemy) -> bool {
    match mission {
        MissionType::Normal | MissionType::Escort | MissionType::Infinite => {
            !removed.is_boss && !removed.archetype.is_boss_side()
        }
        MissionType::Hunt => removed.is_target,
        MissionType::BossComposite => removed.archetype == EnemyArchetype::CompositeCore,
        MissionType::Puzzle => removed.archetype == EnemyArchetype::PuzzleCore,
        MissionType::BossEater => removed.archetype == EnemyArchetype::BossCore,
    }
}

/// Credit (or replace) an enemy that left the registry.
pub fn on_enemy_removed(sim: &mut SimContext, removed: &RemovedEnemy, cause: RemovalCause) {
    match cause {
        RemovalCause::Cleared => {}
        RemovalCause::Retreated => {
            debug!(archetype = ?removed.archetype, "enemy retreated");
            request_spawn(sim, None);
        }
        RemovalCause::Killed => {
            if qualifies(sim.mission.mission_type, removed) {
                on_objective_progress(sim, 1);
            }
        }
    }
}

/// Decrement the objective counter. Reaching zero clears the wave once.
pub fn on_objective_progress(sim: &mut SimContext, delta: u32) {
    if sim.mission.cleared || !sim.is_active() {
        return;
    }
    sim.mission.remaining = sim.mission.remaining.saturating_sub(delta);
    if sim.mission.remaining == 0 {
        wave_clear(sim);
    }
}

/// Complete the objective regardless of the counter.
pub fn complete_objective(sim: &mut SimContext) {
    let remaining = sim.mission.remaining.max(1);
    on_objective_progress(sim, remaining);
}

fn wave_clear(sim: &mut SimContext) {
    sim.mission.cleared = true;
    clear_hostiles(sim);
    escort::remove(sim);
    sim.mission.puzzle = None;
    sim.mission.objective = None;

    let wave = sim.mission.wave;
    info!(wave, "wave cleared");
    sim.feedback
        .message(format!("WAVE {wave} CLEAR"), Rgb(0xffee00));

    let due = sim.now() + sim.config.director.wave_clear_delay_secs;
    let id = sim.scheduler.schedule(due, None, DeferredAction::AdvanceWave);
    sim.mission.pending_advance = Some(id);
}

/// Move to the next wave, or finish the sequence.
pub fn advance_wave(sim: &mut SimContext) {
    sim.mission.pending_advance = None;
    if !sim.is_active() {
        return;
    }
    let next = sim.mission.wave + 1;
    match sim.config.director.max_waves {
        Some(max) if next > max => end_session(sim, GamePhase::Victory),
        _ => start_wave(sim, next),
    }
}

/// Enter a terminal phase: stop spawning and cancel every deferred event.
pub fn end_session(sim: &mut SimContext, phase: GamePhase) {
    if sim.phase.is_terminal() {
        return;
    }
    sim.phase = phase;
    sim.scheduler.clear();
    sim.mission.pending_advance = None;

    let (text, color) = match phase {
        GamePhase::GameOver => ("GAME OVER", Rgb::RED),
        GamePhase::MissionFailed => ("ESCORT LOST... MISSION FAILED", Rgb::RED),
        GamePhase::Victory => ("ALL WAVES COMPLETE", Rgb(0xffee00)),
        _ => ("", Rgb::WHITE),
    };
    info!(?phase, wave = sim.mission.wave, "session ended");
    sim.feedback.message(text, color);
}

pub fn game_over(sim: &mut SimContext) {
    end_session(sim, GamePhase::GameOver);
}

pub fn mission_failed(sim: &mut SimContext) {
    end_session(sim, GamePhase::MissionFailed);
}

/// End-of-tick checks for failure conditions.
pub fn check_transitions(sim: &mut SimContext) {
    if sim.player.hp <= 0.0 {
        game_over(sim);
        return;
    }
    if escort::hp(sim).is_some_and(|hp| hp <= 0.0) {
        mission_failed(sim);
    }
}

/// Remove every enemy without credit.
pub fn clear_hostiles(sim: &mut SimContext) {
    let enemies: Vec<Entity> = sim
        .world
        .query::<&EnemyProfile>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in enemies {
        combat::remove_enemy(sim, entity);
    }
}

/// Remove splash hazards and uncollected pickups.
fn clear_transients(sim: &mut SimContext) {
    let transients: Vec<Entity> = sim
        .world
        .query::<&WaterSplash>()
        .iter()
        .map(|(e, _)| e)
        .chain(sim.world.query::<&Pickup>().iter().map(|(e, _)| e))
        .collect();
    for entity in transients {
        spawn::despawn(sim, entity);
    }
}
