//! Steering helpers shared by the FSM and the simulation systems.

use glam::DVec3;
use rand::Rng;

use kekkai_core::constants::*;
use kekkai_core::enums::{BehaviorState, EnemyArchetype};

use crate::profiles::get_profile;

/// Horizontal play rectangle centered on the origin, plus the ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub half_width: f64,
    pub half_depth: f64,
    pub ceiling_y: f64,
    pub floor_y: f64,
}

impl FieldBounds {
    pub fn new(width: f64, depth: f64, ceiling_y: f64) -> Self {
        Self {
            half_width: width * 0.5,
            half_depth: depth * 0.5,
            ceiling_y,
            floor_y: FALL_LIMIT_Y,
        }
    }

    pub fn contains(&self, position: DVec3) -> bool {
        position.x.abs() <= self.half_width
            && position.z.abs() <= self.half_depth
            && position.y >= self.floor_y
    }

    /// Nearest point inside the field, lifted to at least `min_y`.
    pub fn clamp(&self, position: DVec3, min_y: f64) -> DVec3 {
        DVec3::new(
            position.x.clamp(-self.half_width, self.half_width),
            position.y.max(min_y).min(self.ceiling_y),
            position.z.clamp(-self.half_depth, self.half_depth),
        )
    }
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_DEPTH, CEILING_Y)
    }
}

/// Which entity an enemy pursues this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Player,
    Escort,
}

/// With an escort alive, target it with a fixed probability per tick.
pub fn choose_target(escort_alive: bool, rng: &mut impl Rng) -> TargetKind {
    if escort_alive && rng.gen::<f64>() < ESCORT_TARGET_CHANCE {
        TargetKind::Escort
    } else {
        TargetKind::Player
    }
}

/// Random point inside the field rectangle shrunk to the patrol fraction.
pub fn pick_patrol_point(bounds: &FieldBounds, height: f64, rng: &mut impl Rng) -> DVec3 {
    let hw = bounds.half_width * PATROL_FIELD_FRACTION;
    let hd = bounds.half_depth * PATROL_FIELD_FRACTION;
    DVec3::new(rng.gen_range(-hw..=hw), height, rng.gen_range(-hd..=hd))
}

/// Random spawn point for an archetype inside the full field rectangle.
pub fn pick_spawn_point(
    archetype: EnemyArchetype,
    bounds: &FieldBounds,
    rng: &mut impl Rng,
) -> DVec3 {
    let (low, high) = get_profile(archetype).spawn_height;
    let y = if high > low {
        rng.gen_range(low..high)
    } else {
        low
    };
    DVec3::new(
        rng.gen_range(-bounds.half_width..=bounds.half_width),
        y,
        rng.gen_range(-bounds.half_depth..=bounds.half_depth),
    )
}

/// Initial behavioral state of a freshly spawned enemy.
pub fn initial_state(
    archetype: EnemyArchetype,
    always_chase: bool,
    rng: &mut impl Rng,
) -> BehaviorState {
    match archetype {
        EnemyArchetype::Fire | EnemyArchetype::Phantom | EnemyArchetype::Target => {
            BehaviorState::Normal
        }
        _ if always_chase => BehaviorState::Chase,
        a if get_profile(a).can_patrol && rng.gen::<f64>() < PATROL_SEED_CHANCE => {
            BehaviorState::Patrol
        }
        _ => BehaviorState::Chase,
    }
}

/// Wet duration for an archetype that water affects.
pub fn douse_duration(archetype: EnemyArchetype) -> Option<f64> {
    match archetype {
        EnemyArchetype::Fire => Some(FIRE_WET_SECS),
        EnemyArchetype::Phantom => Some(PHANTOM_WET_SECS),
        _ => None,
    }
}

/// Result of the out-of-bounds check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Containment {
    Inside,
    /// Outside but still within the grace period.
    Drifting,
    /// Push back toward the field.
    Recover(DVec3),
    /// Outside too long: despawn without credit.
    Retreat,
}

/// Evaluate out-of-bounds recovery from the accumulated outside time.
///
/// A recovery impulse fires at most once per second after the grace
/// period; `since_recovery_secs` is the time since the last one.
pub fn containment(
    position: DVec3,
    outside_secs: f64,
    since_recovery_secs: f64,
    bounds: &FieldBounds,
) -> Containment {
    if bounds.contains(position) {
        return Containment::Inside;
    }
    if outside_secs >= OOB_RETREAT_SECS {
        return Containment::Retreat;
    }
    if outside_secs >= OOB_GRACE_SECS && since_recovery_secs >= 1.0 {
        let inward = DVec3::new(-position.x, 0.0, -position.z)
            .try_normalize()
            .unwrap_or(DVec3::ZERO);
        return Containment::Recover(
            inward * OOB_INWARD_IMPULSE + DVec3::Y * OOB_UPWARD_IMPULSE,
        );
    }
    Containment::Drifting
}

/// Force that holds a body at `anchor` against gravity with a damped spring.
pub fn station_force(
    position: DVec3,
    velocity: DVec3,
    anchor: DVec3,
    stiffness: f64,
    mass: f64,
) -> DVec3 {
    let damping = 2.0 * stiffness.sqrt();
    let accel = (anchor - position) * stiffness - velocity * damping;
    (accel + DVec3::Y * GRAVITY) * mass
}

/// Horizontal unit vector from `from` toward `to`, zero when coincident.
pub fn horizontal_dir(from: DVec3, to: DVec3) -> DVec3 {
    DVec3::new(to.x - from.x, 0.0, to.z - from.z)
        .try_normalize()
        .unwrap_or(DVec3::ZERO)
}

/// Unit vector from `from` toward `to`, zero when coincident.
pub fn dir(from: DVec3, to: DVec3) -> DVec3 {
    (to - from).try_normalize().unwrap_or(DVec3::ZERO)
}
