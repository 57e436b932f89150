//! HUD snapshot: the complete visible state handed to the presentation layer each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::FeedbackEvent;
use crate::types::{Rgb, SimTime};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub player: PlayerView,
    pub mission: MissionView,
    pub escort: Option<EscortView>,
    pub puzzle: Option<PuzzleView>,
    pub tank: TankView,
    pub enemies: Vec<EnemyView>,
    pub barriers: Vec<BarrierView>,
    pub stats: StatsView,
    pub feedback: Vec<FeedbackEvent>,
}

/// Player vitals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: DVec3,
    pub hp: f64,
    pub max_hp: f64,
    /// Spiritual power, the barrier resource.
    pub sp: f64,
    pub max_sp: f64,
    pub focusing: bool,
    pub area_denial: bool,
}

/// Mission progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionView {
    pub wave: u32,
    pub mission_type: MissionType,
    pub label: String,
    /// Remaining-objective counter.
    pub remaining: u32,
    pub boss_present: bool,
    /// Hit points of the current boss, when one has a health bar.
    pub boss_hp: Option<(f64, f64)>,
}

/// Escorted VIP status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EscortView {
    pub position: DVec3,
    pub hp: f64,
    pub max_hp: f64,
    pub waypoint_index: usize,
    pub waypoint_count: usize,
}

/// Puzzle encounter status. The required order stays hidden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PuzzleView {
    pub current_step: usize,
    pub minion_count: usize,
    pub core_vulnerable: bool,
}

/// Water tank status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TankView {
    pub hp: f64,
    pub destroyed: bool,
    /// Seconds until the flooded roof drains, while destroyed.
    pub flood_remaining_secs: Option<f64>,
}

/// A live enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub archetype: EnemyArchetype,
    pub state: BehaviorState,
    pub position: DVec3,
    pub hp: f64,
    pub max_hp: f64,
    pub is_boss: bool,
    pub opacity: f64,
    pub tint: Option<Rgb>,
}

/// A live barrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierView {
    pub id: u64,
    pub position: DVec3,
    pub size: DVec3,
    pub yaw: f64,
    pub scale: f64,
    pub is_ghost: bool,
    pub is_water_cube: bool,
    pub shrinking: bool,
    pub highlighted: bool,
}

/// Session statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    pub kills: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub barriers_created: u32,
    pub barriers_wasted: u32,
}
