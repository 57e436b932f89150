//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{BodyHandle, MeshHandle, Rgb};

/// Identity and behavior of a hostile entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub archetype: EnemyArchetype,
    pub state: BehaviorState,
    pub is_boss: bool,
    /// Golden hunt target.
    pub is_target: bool,
    /// Simulation time the enemy was spawned.
    pub spawned_at_secs: f64,
}

/// Hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
    pub max_hp: f64,
}

/// Rigid body owned by this entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody(pub BodyHandle);

/// Visual owned by this entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh(pub MeshHandle);

/// Half extents of an enemy's collision volume, for overlap tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extent {
    pub half: DVec3,
}

/// Remaining wet time. Present only while the enemy is wet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Wetness {
    pub remaining_secs: f64,
}

/// Accumulated time outside the play rectangle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OutOfBounds {
    pub outside_secs: f64,
    /// Time of the last recovery impulse.
    pub last_recovery_secs: f64,
}

/// Current patrol destination.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Patrol {
    pub waypoint: Option<DVec3>,
}

/// Derived visibility of a phantom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Visibility {
    pub opacity: f64,
    pub tint: Rgb,
}

/// Non-owning link from a composite part or puzzle minion to its parent.
/// Liveness of `parent` is checked against the registry before every use.
#[derive(Debug, Clone, Copy)]
pub struct ParentLink {
    pub parent: hecs::Entity,
}

/// Slot of a composite part relative to its anchor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeSlot {
    pub offset: DVec3,
}

/// Non-physical anchor of a composite boss. Removed when `parts_count`
/// reaches zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeAnchor {
    pub parts_count: u32,
    pub position: DVec3,
}

/// Puzzle minion tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PuzzleMinion {
    /// Color index, also the value checked against the required order.
    pub index: usize,
    /// Position relative to the core at spawn time.
    pub offset: DVec3,
}

/// Puzzle core tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PuzzleCore {
    pub invincible: bool,
    /// Station the core holds.
    pub home: DVec3,
}

/// A player-created capture volume.
#[derive(Debug, Clone)]
pub struct Barrier {
    pub position: DVec3,
    /// Full extents at scale 1.
    pub size: DVec3,
    pub yaw: f64,
    /// Uniform visual scale. Shrinks geometrically while destroying.
    pub scale: f64,
    pub is_ghost: bool,
    pub is_water_cube: bool,
    pub shrinking: bool,
    pub highlighted: bool,
    /// Collision body; detached the moment shrinking begins.
    pub body: Option<BodyHandle>,
    /// Enemies already attacked by this barrier's shrink.
    pub struck: Vec<hecs::Entity>,
    /// Whether this barrier already damaged the water tank.
    pub struck_tank: bool,
    /// Creation order, used by the most-recent fallback.
    pub serial: u64,
}

/// The escorted VIP.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EscortTarget {
    pub hp: f64,
    pub max_hp: f64,
    pub waypoint_index: usize,
}

/// Healing pickup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub heal: f64,
    pub position: DVec3,
}

/// Timed water column that douses fire and phantom enemies inside it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterSplash {
    pub center: DVec3,
    pub radius: f64,
    pub height: f64,
    pub remaining_secs: f64,
}
