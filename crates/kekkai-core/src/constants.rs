//! Simulation constants and tuning parameters.
//!
//! Mode presets in [`crate::config`] are assembled from these values; a
//! JSON config can override any of them per session.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravity along -Y (m/s²).
pub const GRAVITY: f64 = 30.0;

// --- Field layout ---

/// Play-field width along X (meters).
pub const FIELD_WIDTH: f64 = 120.0;

/// Play-field depth along Z (meters).
pub const FIELD_DEPTH: f64 = 160.0;

/// Pool center X.
pub const POOL_X: f64 = -30.0;

/// Pool center Z.
pub const POOL_Z: f64 = 10.0;

/// Pool half-width along X.
pub const POOL_HALF_WIDTH: f64 = 10.0;

/// Pool half-depth along Z.
pub const POOL_HALF_DEPTH: f64 = 20.0;

/// Height below which a position over the pool counts as on the water.
pub const POOL_SURFACE_HEIGHT: f64 = 3.0;

/// Building roof height.
pub const ROOF_Y: f64 = 30.0;

/// Building center X (the roof flood region is centered here).
pub const BUILDING_X: f64 = 20.0;

/// Building half-width along X.
pub const BUILDING_HALF_WIDTH: f64 = 20.0;

/// Building half-depth along Z.
pub const BUILDING_HALF_DEPTH: f64 = 40.0;

/// World-height ceiling for airborne archetypes.
pub const CEILING_Y: f64 = 40.0;

/// Below this height an entity has fallen out of the world.
pub const FALL_LIMIT_Y: f64 = -10.0;

/// Fraction of the field used for patrol points.
pub const PATROL_FIELD_FRACTION: f64 = 0.8;

/// Window (reflective surface) grid: first row height, row spacing.
pub const WINDOW_ROW_START_Y: f64 = 5.0;
pub const WINDOW_ROW_SPACING: f64 = 7.0;

/// Window grid column spacing along Z.
pub const WINDOW_COLUMN_SPACING: f64 = 10.0;

// --- Player ---

pub const PLAYER_SPEED: f64 = 10.0;
pub const PLAYER_JUMP: f64 = 22.0;
pub const PLAYER_HEIGHT: f64 = 1.7;
pub const PLAYER_MAX_HP: f64 = 100.0;
pub const PLAYER_MAX_SP: f64 = 100.0;
pub const PLAYER_MASS: f64 = 70.0;
pub const PLAYER_RADIUS: f64 = 0.6;

/// Player spawn point.
pub const PLAYER_SPAWN: [f64; 3] = [0.0, 2.0, 60.0];

/// Seconds of invulnerability after taking damage.
pub const PLAYER_DAMAGE_COOLDOWN_SECS: f64 = 1.0;

/// Contact impact speed above which the player takes collision damage.
pub const PLAYER_IMPACT_DAMAGE_THRESHOLD: f64 = 2.0;

/// Collision damage per unit of impact speed.
pub const PLAYER_IMPACT_DAMAGE_FACTOR: f64 = 2.0;

/// Knockback impulse per unit of impact speed.
pub const PLAYER_IMPACT_KNOCKBACK: f64 = 50.0;

/// Vertical speed under which the player counts as grounded for jumping.
pub const JUMP_GROUNDED_SPEED: f64 = 1.0;

/// Vertical speed under which the double-jump counter resets.
pub const JUMP_RESET_SPEED: f64 = 0.1;

// --- Barrier (kekkai) ---

pub const SP_REGEN_PER_SEC: f64 = 5.0;
pub const BARRIER_MAINTAIN_COST_PER_SEC: f64 = 1.0;
pub const DESTROY_COST: f64 = 2.0;

/// Multiplicative scale applied each tick while shrinking.
pub const SHRINK_FACTOR: f64 = 0.7;

/// Scale below which a shrinking barrier is removed.
pub const SHRINK_MIN_SCALE: f64 = 0.05;

/// Thickness of each shell of a ghost barrier.
pub const GHOST_SHELL_THICKNESS: f64 = 0.5;

/// Aim-assist base radius around the aim ray.
pub const AIM_BASE_RADIUS: f64 = 1.5;

/// Maximum aim distance.
pub const AIM_MAX_DISTANCE: f64 = 40.0;

/// Extra reach beyond max distance for the nearest-barrier fallback.
pub const AIM_FALLBACK_EXTRA_REACH: f64 = 20.0;

/// Cosine threshold for the smart-aim enemy lock.
pub const SMART_AIM_MIN_COSINE: f64 = 0.9;

/// Radius around a locked enemy searched for a barrier.
pub const SMART_AIM_BARRIER_RADIUS: f64 = 10.0;

// --- Water hazards ---

pub const SPLASH_RADIUS: f64 = 8.0;
pub const SPLASH_HEIGHT: f64 = 40.0;
pub const SPLASH_DURATION_SECS: f64 = 0.8;

pub const WATER_TANK_MAX_HP: f64 = 100.0;
pub const WATER_TANK_RADIUS: f64 = 5.0;
pub const WATER_TANK_HEIGHT: f64 = 8.0;

/// Damage dealt to the tank by an overlapping shrinking barrier.
pub const WATER_TANK_BARRIER_DAMAGE: f64 = 50.0;

/// Seconds the roof stays flooded after the tank collapses.
pub const WATER_TANK_FLOOD_SECS: f64 = 30.0;

// --- Enemy behavior ---

pub const FIRE_WET_SECS: f64 = 10.0;
pub const PHANTOM_WET_SECS: f64 = 5.0;

/// Wet fire drifts back toward the center beyond this radius.
pub const WET_RETURN_RADIUS: f64 = 50.0;
pub const WET_RETURN_FORCE: f64 = 30.0;
pub const WET_DAMPING: f64 = 0.95;
pub const DRY_DAMPING: f64 = 0.5;
pub const ENEMY_DAMPING: f64 = 0.4;

/// Vertical velocity given to a fire enemy when it rekindles.
pub const REKINDLE_LIFT: f64 = 10.0;

/// Probability per tick that an enemy targets the escort instead of the player.
pub const ESCORT_TARGET_CHANCE: f64 = 0.7;

/// Target distance that forces a patrolling enemy into chase.
pub const CHASE_TRIGGER_DISTANCE: f64 = 18.0;

/// Distance at which a patrol point counts as reached.
pub const PATROL_ARRIVAL_RADIUS: f64 = 2.0;

/// Chance a patrol-capable enemy is seeded in patrol.
pub const PATROL_SEED_CHANCE: f64 = 0.5;

pub const PHANTOM_DETECTION_RADIUS: f64 = 4.0;
pub const PHANTOM_REFLECT_RADIUS: f64 = 8.0;
pub const PHANTOM_VISIBLE_OPACITY: f64 = 0.9;
pub const PHANTOM_HIDDEN_OPACITY: f64 = 0.05;

/// Seconds outside the play rectangle before the recovery impulse.
pub const OOB_GRACE_SECS: f64 = 2.0;

/// Seconds outside the play rectangle before the enemy retreats.
pub const OOB_RETREAT_SECS: f64 = 10.0;

pub const OOB_INWARD_IMPULSE: f64 = 40.0;
pub const OOB_UPWARD_IMPULSE: f64 = 15.0;

/// Hover band for the boss core.
pub const BOSS_HOVER_MIN_Y: f64 = 12.0;
pub const BOSS_HOVER_MAX_Y: f64 = 22.0;
pub const BOSS_HOVER_SPRING: f64 = 40.0;
pub const BOSS_HOVER_DAMPING: f64 = 8.0;
pub const BOSS_ORBIT_RADIUS: f64 = 25.0;
pub const BOSS_ORBIT_RATE: f64 = 0.3;

/// Horizontal spring pulling the boss core onto its orbit.
pub const BOSS_ORBIT_SPRING: f64 = 4.0;
pub const BOSS_ORBIT_DAMPING: f64 = 4.0;

/// Heal received by a barrier eater per barrier consumed.
pub const EATER_HEAL: f64 = 2.0;

/// Dry fire hovers at least this high, and this far above its target.
pub const FIRE_MIN_HOVER_Y: f64 = 5.0;
pub const FIRE_HOVER_OFFSET: f64 = 1.5;
pub const FIRE_LIFT_SPRING: f64 = 20.0;
pub const FIRE_FAR_DISTANCE: f64 = 10.0;
pub const FIRE_FAR_FORCE: f64 = 80.0;
pub const FIRE_NEAR_FORCE: f64 = 40.0;

pub const PHANTOM_FAR_DISTANCE: f64 = 15.0;
pub const PHANTOM_NEAR_FORCE: f64 = 15.0;
/// Phantoms climb when their target is this far above them.
pub const PHANTOM_CLIMB_TRIGGER: f64 = 3.0;
pub const PHANTOM_CLIMB_SPEED: f64 = 5.0;

/// Spin rate of cubes and visible wet phantoms (rad/s).
pub const SPIN_RATE: f64 = 10.0;

pub const JUMPER_JUMP_CHANCE: f64 = 0.05;
pub const JUMPER_JUMP_SPEED: f64 = 15.0;
/// Jumpers only take off below this height.
pub const JUMPER_GROUND_Y: f64 = 1.0;

pub const CONE_CHARGE_INTERVAL_SECS: f64 = 3.0;
pub const CONE_CHARGE_IMPULSE: f64 = 40.0;

pub const TORUS_ORBIT_RADIUS: f64 = 6.0;
pub const TORUS_RADIAL_SPRING: f64 = 5.0;

/// The golden target flees the player inside this radius.
pub const TARGET_FLEE_RADIUS: f64 = 12.0;

/// Downward force per unit mass applied above the ceiling.
pub const CEILING_PUSH: f64 = 10.0;

// --- Damage ---

/// Hit points removed by one player attack on a tough archetype.
pub const ATTACK_DAMAGE: f64 = 1.0;

/// Knockback impulse applied to a tough archetype per attack.
pub const ATTACK_KNOCKBACK: f64 = 30.0;

/// Damage per contact tick.
pub const CONTACT_DAMAGE: f64 = 1.0;

// --- Director ---

pub const AMBIENT_SPAWN_INTERVAL_SECS: f64 = 3.0;
pub const INITIAL_SPAWN_BATCH: u32 = 8;
pub const INFINITE_INITIAL_SPAWN_BATCH: u32 = 5;
pub const GLOBAL_ENEMY_CAP: usize = 15;
pub const BOSS_FIGHT_ENEMY_CAP: usize = 5;
pub const PUZZLE_FIGHT_ENEMY_CAP: usize = 3;
pub const WAVE_CLEAR_DELAY_SECS: f64 = 2.0;
pub const MAX_WAVES: u32 = 10;

/// Per-wave enemy hit-point growth.
pub const HP_GROWTH_PER_WAVE: f64 = 0.2;

pub const OBJECTIVE_NORMAL: u32 = 5;
pub const OBJECTIVE_ESCORT: u32 = 30;
pub const OBJECTIVE_BOSS: u32 = 1;
pub const OBJECTIVE_INFINITE: u32 = 9999;

/// Infinite mode: base live-enemy cap and growth per danger level.
pub const INFINITE_BASE_CAP: usize = 10;
pub const INFINITE_CAP_PER_WAVE: usize = 2;

/// Infinite mode: per-tick spawn chance while below the cap.
pub const INFINITE_SPAWN_CHANCE: f64 = 0.05;

/// Infinite mode: damage dealt per danger level before ramping.
pub const INFINITE_DAMAGE_PER_LEVEL: f64 = 100.0;

/// Infinite mode: hit-point multiplier growth per danger level.
pub const INFINITE_DIFFICULTY_STEP: f64 = 0.2;

// --- Escort ---

pub const ESCORT_MAX_HP: f64 = 100.0;
pub const ESCORT_STEER_FORCE: f64 = 20.0;
pub const ESCORT_ARRIVAL_RADIUS: f64 = 3.0;
pub const ESCORT_MASS: f64 = 10.0;
pub const ESCORT_RADIUS: f64 = 1.0;

// --- Composite boss ---

/// Composite anchor position.
pub const COMPOSITE_ANCHOR: [f64; 3] = [0.0, 20.0, 0.0];

/// Slot spring holding parts near their anchor-relative offsets.
pub const COMPOSITE_SLOT_SPRING: f64 = 20.0;

// --- Puzzle ---

pub const PUZZLE_MINION_COUNT: usize = 3;

/// Two minion kills closer than this are treated as simultaneous.
pub const PUZZLE_SIMULTANEOUS_SECS: f64 = 0.5;

/// Puzzle core position.
pub const PUZZLE_CORE_POSITION: [f64; 3] = [0.0, 6.0, -20.0];

/// Minion offsets relative to the core, by color index.
pub const PUZZLE_MINION_OFFSETS: [[f64; 3]; PUZZLE_MINION_COUNT] =
    [[-6.0, 0.0, 0.0], [6.0, 0.0, 0.0], [0.0, 0.0, 6.0]];

// --- Pickups ---

pub const PICKUP_HEAL: f64 = 20.0;
pub const PICKUP_RADIUS: f64 = 2.0;

// --- Awakened abilities ---

pub const AREA_DENIAL_RADIUS: f64 = 3.0;
pub const AREA_DENIAL_DRAIN_PER_SEC: f64 = 20.0;
pub const AREA_DENIAL_MIN_SP: f64 = 10.0;
pub const AREA_DENIAL_PUSH: f64 = 50.0;

pub const CHAIN_REACTION_RANGE: f64 = 15.0;
pub const CHAIN_REACTION_BASE_DELAY_SECS: f64 = 0.1;
pub const CHAIN_REACTION_DELAY_PER_METER: f64 = 0.02;
pub const CHAIN_BLAST_RADIUS: f64 = 10.0;
