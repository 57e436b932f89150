//! Mode configuration.
//!
//! One record parameterizes the whole Director: tuning numbers, palette,
//! spawn tables and the handful of rules where modes genuinely diverge.
//! Presets are built from [`crate::constants`]; a JSON file may override
//! any field (missing fields fall back to the standard preset).

use std::collections::HashMap;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{EnemyArchetype, GameMode, MissionType};
use crate::error::ConfigError;
use crate::types::Rgb;

/// Colors handed to the scene layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky: Rgb,
    pub ground: Rgb,
    pub barrier: Rgb,
    pub ghost: Rgb,
    pub water_cube: Rgb,
    pub highlight: Rgb,
    pub focus_highlight: Rgb,
    pub water: Rgb,
    pub fire: Rgb,
    pub phantom: Rgb,
    pub wet: Rgb,
    pub vip: Rgb,
    pub giant: Rgb,
    pub target: Rgb,
    pub enemy: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Rgb(0x102030),
            ground: Rgb(0x333344),
            barrier: Rgb(0xffff00),
            ghost: Rgb(0x00ffff),
            water_cube: Rgb(0x0088ff),
            highlight: Rgb(0xff0044),
            focus_highlight: Rgb(0xff00ff),
            water: Rgb(0x00aaff),
            fire: Rgb(0xff4400),
            phantom: Rgb(0xaa00ff),
            wet: Rgb(0x4444ff),
            vip: Rgb(0x00ffff),
            giant: Rgb(0x880000),
            target: Rgb(0xffd700),
            enemy: Rgb(0xaa2222),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub speed: f64,
    pub jump: f64,
    pub height: f64,
    pub max_hp: f64,
    pub max_sp: f64,
    pub damage_cooldown_secs: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            jump: PLAYER_JUMP,
            height: PLAYER_HEIGHT,
            max_hp: PLAYER_MAX_HP,
            max_sp: PLAYER_MAX_SP,
            damage_cooldown_secs: PLAYER_DAMAGE_COOLDOWN_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierTuning {
    pub sp_regen_per_sec: f64,
    pub maintain_cost_per_sec: f64,
    pub destroy_cost: f64,
    pub shrink_factor: f64,
    pub min_scale: f64,
}

impl Default for BarrierTuning {
    fn default() -> Self {
        Self {
            sp_regen_per_sec: SP_REGEN_PER_SEC,
            maintain_cost_per_sec: BARRIER_MAINTAIN_COST_PER_SEC,
            destroy_cost: DESTROY_COST,
            shrink_factor: SHRINK_FACTOR,
            min_scale: SHRINK_MIN_SCALE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AimTuning {
    pub base_radius: f64,
    pub max_distance: f64,
}

impl Default for AimTuning {
    fn default() -> Self {
        Self {
            base_radius: AIM_BASE_RADIUS,
            max_distance: AIM_MAX_DISTANCE,
        }
    }
}

/// Arena geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    pub width: f64,
    pub depth: f64,
    pub pool_x: f64,
    pub pool_z: f64,
    pub roof_y: f64,
    pub ceiling_y: f64,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            depth: FIELD_DEPTH,
            pool_x: POOL_X,
            pool_z: POOL_Z,
            roof_y: ROOF_Y,
            ceiling_y: CEILING_Y,
        }
    }
}

/// Wave progression and population tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorTuning {
    /// Mission type of wave n is `mission_rotation[(n - 1) % len]`.
    pub mission_rotation: Vec<MissionType>,
    pub objective_normal: u32,
    pub objective_escort: u32,
    pub objective_boss: u32,
    pub objective_infinite: u32,
    pub ambient_spawn_interval_secs: f64,
    pub initial_spawn_batch: u32,
    pub global_enemy_cap: usize,
    pub boss_fight_enemy_cap: usize,
    pub puzzle_fight_enemy_cap: usize,
    pub wave_clear_delay_secs: f64,
    /// Last wave of the sequence. `None` never ends.
    pub max_waves: Option<u32>,
    pub hp_growth_per_wave: f64,
}

impl Default for DirectorTuning {
    fn default() -> Self {
        Self {
            mission_rotation: vec![
                MissionType::Normal,
                MissionType::Escort,
                MissionType::BossComposite,
                MissionType::Hunt,
                MissionType::Puzzle,
                MissionType::BossEater,
            ],
            objective_normal: OBJECTIVE_NORMAL,
            objective_escort: OBJECTIVE_ESCORT,
            objective_boss: OBJECTIVE_BOSS,
            objective_infinite: OBJECTIVE_INFINITE,
            ambient_spawn_interval_secs: AMBIENT_SPAWN_INTERVAL_SECS,
            initial_spawn_batch: INITIAL_SPAWN_BATCH,
            global_enemy_cap: GLOBAL_ENEMY_CAP,
            boss_fight_enemy_cap: BOSS_FIGHT_ENEMY_CAP,
            puzzle_fight_enemy_cap: PUZZLE_FIGHT_ENEMY_CAP,
            wave_clear_delay_secs: WAVE_CLEAR_DELAY_SECS,
            max_waves: Some(MAX_WAVES),
            hp_growth_per_wave: HP_GROWTH_PER_WAVE,
        }
    }
}

impl DirectorTuning {
    /// Objective count for a mission type.
    pub fn objective_for(&self, mission: MissionType) -> u32 {
        match mission {
            MissionType::Normal => self.objective_normal,
            MissionType::Escort => self.objective_escort,
            MissionType::BossComposite
            | MissionType::Hunt
            | MissionType::Puzzle
            | MissionType::BossEater => self.objective_boss,
            MissionType::Infinite => self.objective_infinite,
        }
    }
}

/// One weighted entry of a spawn table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub archetype: EnemyArchetype,
    pub weight: f64,
}

const fn weight(archetype: EnemyArchetype, weight: f64) -> SpawnWeight {
    SpawnWeight { archetype, weight }
}

/// Jump strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpRule {
    #[default]
    Single,
    /// One extra jump while airborne.
    Double,
}

/// Area-denial field around the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaDenialRule {
    pub radius: f64,
    pub drain_per_sec: f64,
    pub min_sp: f64,
    pub push: f64,
}

impl Default for AreaDenialRule {
    fn default() -> Self {
        Self {
            radius: AREA_DENIAL_RADIUS,
            drain_per_sec: AREA_DENIAL_DRAIN_PER_SEC,
            min_sp: AREA_DENIAL_MIN_SP,
            push: AREA_DENIAL_PUSH,
        }
    }
}

/// What a destroy action does beyond shrinking its barrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestroyRule {
    #[default]
    Single,
    /// Nearby barriers follow after a distance-based delay, and enemies
    /// near the destroyed barrier take a hit.
    ChainReaction {
        range: f64,
        base_delay_secs: f64,
        delay_per_meter: f64,
        blast_radius: f64,
    },
}

/// Endless-mode spawning and difficulty ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfiniteRule {
    pub base_cap: usize,
    pub cap_per_wave: usize,
    pub spawn_chance: f64,
    pub damage_per_level: f64,
    pub difficulty_step: f64,
}

impl Default for InfiniteRule {
    fn default() -> Self {
        Self {
            base_cap: INFINITE_BASE_CAP,
            cap_per_wave: INFINITE_CAP_PER_WAVE,
            spawn_chance: INFINITE_SPAWN_CHANCE,
            damage_per_level: INFINITE_DAMAGE_PER_LEVEL,
            difficulty_step: INFINITE_DIFFICULTY_STEP,
        }
    }
}

/// Named behavior hooks where modes differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeRules {
    pub jump: JumpRule,
    pub area_denial: Option<AreaDenialRule>,
    pub destroy: DestroyRule,
    /// Focus aim locks onto enemies inside a view cone.
    pub smart_aim: bool,
    /// Spawned enemies skip patrol.
    pub always_chase: bool,
    pub infinite: Option<InfiniteRule>,
}

/// The complete per-session configuration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    pub mode: GameMode,
    pub palette: Palette,
    pub player: PlayerTuning,
    pub barrier: BarrierTuning,
    pub aim: AimTuning,
    pub field: FieldLayout,
    pub director: DirectorTuning,
    pub spawn_tables: HashMap<MissionType, Vec<SpawnWeight>>,
    /// Waypoints of the escort path, first point is the VIP spawn.
    pub escort_path: Vec<DVec3>,
    pub rules: ModeRules,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ModeConfig {
    pub fn preset(mode: GameMode) -> Self {
        match mode {
            GameMode::Standard => Self::standard(),
            GameMode::Awakened => Self::awakened(),
            GameMode::Infinite => Self::infinite(),
        }
    }

    pub fn standard() -> Self {
        use EnemyArchetype::*;
        let mixed = vec![
            weight(Fire, 0.3),
            weight(Phantom, 0.21),
            weight(Cube, 0.147),
            weight(Roller, 0.15),
            weight(Jumper, 0.15),
            weight(Cone, 0.03),
            weight(Torus, 0.013),
        ];
        let mut spawn_tables = HashMap::new();
        spawn_tables.insert(
            MissionType::Normal,
            vec![weight(Fire, 0.6), weight(Phantom, 0.4)],
        );
        spawn_tables.insert(MissionType::Escort, vec![weight(Normal, 1.0)]);
        spawn_tables.insert(MissionType::BossComposite, mixed.clone());
        spawn_tables.insert(MissionType::Hunt, mixed.clone());
        spawn_tables.insert(MissionType::Puzzle, mixed.clone());
        let mut eater_fight = mixed;
        eater_fight.push(weight(Eater, 0.2));
        spawn_tables.insert(MissionType::BossEater, eater_fight);

        Self {
            mode: GameMode::Standard,
            palette: Palette::default(),
            player: PlayerTuning::default(),
            barrier: BarrierTuning::default(),
            aim: AimTuning::default(),
            field: FieldLayout::default(),
            director: DirectorTuning::default(),
            spawn_tables,
            escort_path: vec![
                DVec3::new(0.0, 1.0, 55.0),
                DVec3::new(-20.0, 1.0, 30.0),
                DVec3::new(-45.0, 1.0, -10.0),
                DVec3::new(-20.0, 1.0, -45.0),
                DVec3::new(0.0, 1.0, -70.0),
            ],
            rules: ModeRules::default(),
        }
    }

    /// Faster, higher-jumping player with more resource, double jump,
    /// area denial and chain-reaction destroys.
    pub fn awakened() -> Self {
        let mut config = Self::standard();
        config.mode = GameMode::Awakened;
        config.palette.sky = Rgb(0x050011);
        config.palette.ground = Rgb(0x221133);
        config.palette.barrier = Rgb(0xaa00ff);
        config.palette.ghost = Rgb(0xff00ff);
        config.palette.highlight = Rgb(0x00ffff);
        config.player.speed = 20.0;
        config.player.jump = 30.0;
        config.player.max_sp = 200.0;
        config.barrier.sp_regen_per_sec = 15.0;
        config.rules = ModeRules {
            jump: JumpRule::Double,
            area_denial: Some(AreaDenialRule::default()),
            destroy: DestroyRule::ChainReaction {
                range: CHAIN_REACTION_RANGE,
                base_delay_secs: CHAIN_REACTION_BASE_DELAY_SECS,
                delay_per_meter: CHAIN_REACTION_DELAY_PER_METER,
                blast_radius: CHAIN_BLAST_RADIUS,
            },
            smart_aim: true,
            always_chase: false,
            infinite: None,
        };
        config
    }

    /// Endless survival: one mission that never clears, ramping difficulty.
    pub fn infinite() -> Self {
        use EnemyArchetype::*;
        let mut config = Self::standard();
        config.mode = GameMode::Infinite;
        config.palette.sky = Rgb(0x220033);
        config.aim.max_distance = 60.0;
        config.director.mission_rotation = vec![MissionType::Infinite];
        config.director.initial_spawn_batch = INFINITE_INITIAL_SPAWN_BATCH;
        config.director.max_waves = None;
        config.spawn_tables.insert(
            MissionType::Infinite,
            vec![
                weight(BossCore, 0.1),
                weight(Fire, 0.2),
                weight(Phantom, 0.2),
                weight(Eater, 0.1),
                weight(Cone, 0.1),
                weight(Normal, 0.3),
            ],
        );
        config.rules.always_chase = true;
        config.rules.infinite = Some(InfiniteRule::default());
        config
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ModeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.director.mission_rotation.is_empty() {
            return invalid("mission_rotation must not be empty");
        }
        if self.director.global_enemy_cap == 0 {
            return invalid("global_enemy_cap must be positive");
        }
        if !(self.barrier.shrink_factor > 0.0 && self.barrier.shrink_factor < 1.0) {
            return invalid("shrink_factor must be in (0, 1)");
        }
        if self.barrier.min_scale <= 0.0 {
            return invalid("min_scale must be positive");
        }
        // The VIP spawns on the first point and walks toward the second.
        if self.escort_path.len() < 2 {
            return invalid("escort_path needs a start point and at least one waypoint");
        }
        for mission in &self.director.mission_rotation {
            let total: f64 = self
                .spawn_table(*mission)
                .iter()
                .map(|entry| entry.weight.max(0.0))
                .sum();
            if total <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "spawn table for {mission:?} has no positive weight"
                )));
            }
        }
        Ok(())
    }

    /// Spawn table for a mission type (empty when not configured).
    pub fn spawn_table(&self, mission: MissionType) -> &[SpawnWeight] {
        self.spawn_tables
            .get(&mission)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hit-point multiplier for a wave.
    pub fn hp_multiplier(&self, wave: u32) -> f64 {
        1.0 + wave.saturating_sub(1) as f64 * self.director.hp_growth_per_wave
    }
}
