//! Mutable simulation state shared by every system.
//!
//! `SimContext` owns the entity registry, the physics world and the
//! per-session singletons. Systems are free functions over it.

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kekkai_core::components::PhysicsBody;
use kekkai_core::config::ModeConfig;
use kekkai_core::constants::WATER_TANK_MAX_HP;
use kekkai_core::enums::GamePhase;
use kekkai_core::events::FeedbackSink;
use kekkai_core::state::StatsView;
use kekkai_core::types::{BodyHandle, MeshHandle, Ray, SimTime};

use crate::director::MissionState;
use crate::environment::Arena;
use crate::physics::PhysicsWorld;
use crate::scheduler::EventQueue;

/// The player's vitals and ability toggles.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub body: Option<BodyHandle>,
    pub hp: f64,
    pub max_hp: f64,
    /// Spiritual power.
    pub sp: f64,
    pub max_sp: f64,
    pub damage_cooldown: f64,
    pub focusing: bool,
    pub area_denial: bool,
    pub jump_count: u32,
}

impl PlayerState {
    pub fn new(config: &ModeConfig) -> Self {
        Self {
            body: None,
            hp: config.player.max_hp,
            max_hp: config.player.max_hp,
            sp: config.player.max_sp,
            max_sp: config.player.max_sp,
            ..Default::default()
        }
    }
}

/// Rooftop water tank.
#[derive(Debug, Clone)]
pub struct WaterTank {
    pub hp: f64,
    pub destroyed: bool,
    /// Time the flooded roof drains, while destroyed.
    pub flood_until_secs: Option<f64>,
    pub mesh: Option<MeshHandle>,
}

impl Default for WaterTank {
    fn default() -> Self {
        Self {
            hp: WATER_TANK_MAX_HP,
            destroyed: false,
            flood_until_secs: None,
            mesh: None,
        }
    }
}

/// Aim ray and the barrier it currently highlights.
#[derive(Debug, Clone, Default)]
pub struct AimState {
    pub ray: Option<Ray>,
    pub highlighted: Option<Entity>,
    /// Enemy locked by focus aim.
    pub locked_enemy: Option<Entity>,
}

pub struct SimContext {
    pub world: World,
    pub physics: Box<dyn PhysicsWorld>,
    pub rng: ChaCha8Rng,
    pub time: SimTime,
    pub phase: GamePhase,
    pub config: ModeConfig,
    pub arena: Arena,
    pub feedback: FeedbackSink,
    pub scheduler: EventQueue,
    pub player: PlayerState,
    pub mission: MissionState,
    pub stats: StatsView,
    pub tank: WaterTank,
    pub aim: AimState,
    next_mesh: u64,
    next_barrier_serial: u64,
}

impl SimContext {
    pub fn new(config: ModeConfig, physics: Box<dyn PhysicsWorld>, seed: u64) -> Self {
        Self {
            world: World::new(),
            physics,
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            phase: GamePhase::default(),
            arena: Arena::new(&config.field),
            player: PlayerState::new(&config),
            config,
            feedback: FeedbackSink::default(),
            scheduler: EventQueue::default(),
            mission: MissionState::default(),
            stats: StatsView::default(),
            tank: WaterTank::default(),
            aim: AimState::default(),
            next_mesh: 1,
            next_barrier_serial: 0,
        }
    }

    pub fn now(&self) -> f64 {
        self.time.elapsed_secs
    }

    pub fn dt(&self) -> f64 {
        self.time.dt()
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn alloc_mesh(&mut self) -> MeshHandle {
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        handle
    }

    pub fn next_barrier_serial(&mut self) -> u64 {
        self.next_barrier_serial += 1;
        self.next_barrier_serial
    }

    pub fn player_position(&self) -> DVec3 {
        self.player
            .body
            .map(|b| self.physics.position(b))
            .unwrap_or(DVec3::ZERO)
    }

    pub fn player_velocity(&self) -> DVec3 {
        self.player
            .body
            .map(|b| self.physics.velocity(b))
            .unwrap_or(DVec3::ZERO)
    }

    /// Position of an entity's physics body.
    pub fn body_position(&self, entity: Entity) -> Option<DVec3> {
        let body = self.world.get::<&PhysicsBody>(entity).ok()?.0;
        Some(self.physics.position(body))
    }

    /// Entity owning a physics body.
    pub fn entity_for_body(&self, body: BodyHandle) -> Option<Entity> {
        self.world
            .query::<&PhysicsBody>()
            .iter()
            .find(|(_, b)| b.0 == body)
            .map(|(e, _)| e)
    }
}
