//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions and steering for one
//! enemy from its archetype, state and situation. No ECS dependency:
//! operates on plain data and returns the forces and overrides for the
//! simulation to apply.

use glam::DVec3;
use rand::Rng;

use kekkai_core::constants::*;
use kekkai_core::enums::{BehaviorState, EnemyArchetype};

use crate::profiles::{get_profile, ArchetypeProfile};
use crate::steering::{dir, horizontal_dir, pick_patrol_point, station_force, FieldBounds};

/// The barrier closest to an enemy.
#[derive(Debug, Clone, Copy)]
pub struct BarrierSighting {
    pub position: DVec3,
    /// Largest horizontal half extent at the current scale.
    pub half_extent: f64,
}

/// Input to the behavior FSM for a single enemy.
#[derive(Debug, Clone)]
pub struct BehaviorContext {
    pub archetype: EnemyArchetype,
    pub state: BehaviorState,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Position of the entity pursued this tick (player or escort).
    pub target: DVec3,
    pub player: DVec3,
    pub waypoint: Option<DVec3>,
    pub wet_remaining_secs: f64,
    /// Inside a splash column or touching a water surface.
    pub doused: bool,
    pub on_water: bool,
    pub near_reflector: bool,
    pub nearest_barrier: Option<BarrierSighting>,
    /// Station for anchored archetypes (composite slot, puzzle formation).
    pub home: Option<DVec3>,
    pub age_secs: f64,
    pub now_secs: f64,
    pub dt: f64,
    pub bounds: FieldBounds,
}

/// How a phantom should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhantomLook {
    Visible,
    /// Only a reflection gives it away.
    Reflecting,
    Hidden,
}

/// Notable one-shot transitions the simulation reports to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorEvent {
    Extinguished,
    Rekindled,
}

/// Output from the behavior FSM.
#[derive(Debug, Clone, Default)]
pub struct BehaviorUpdate {
    pub new_state: BehaviorState,
    pub state_changed: bool,
    pub force: DVec3,
    pub impulse: DVec3,
    pub torque: DVec3,
    pub velocity: Option<DVec3>,
    pub angular_velocity: Option<DVec3>,
    pub damping: Option<f64>,
    pub wet_remaining_secs: f64,
    /// The enemy is within contact range of its target.
    pub contact: bool,
    /// The enemy reached its nearest barrier and consumes it.
    pub eat_barrier: bool,
    pub waypoint: Option<DVec3>,
    pub look: Option<PhantomLook>,
    pub event: Option<BehaviorEvent>,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &BehaviorContext, rng: &mut impl Rng) -> BehaviorUpdate {
    let profile = get_profile(ctx.archetype);
    let mut update = BehaviorUpdate {
        new_state: ctx.state,
        wet_remaining_secs: ctx.wet_remaining_secs,
        waypoint: ctx.waypoint,
        ..Default::default()
    };
    let dist = ctx.position.distance(ctx.target);

    match ctx.archetype {
        EnemyArchetype::Fire => evaluate_fire(ctx, &profile, dist, &mut update),
        EnemyArchetype::Phantom => evaluate_phantom(ctx, &profile, dist, &mut update),
        EnemyArchetype::Normal
        | EnemyArchetype::Cube
        | EnemyArchetype::Roller
        | EnemyArchetype::Jumper
        | EnemyArchetype::Cone
        | EnemyArchetype::Torus => evaluate_grunt(ctx, &profile, dist, &mut update, rng),
        EnemyArchetype::Target => evaluate_target(ctx, &profile, &mut update, rng),
        EnemyArchetype::Eater => evaluate_eater(ctx, &profile, dist, &mut update),
        EnemyArchetype::BossCore => evaluate_boss(ctx, &profile, dist, &mut update),
        EnemyArchetype::CompositePart | EnemyArchetype::PuzzleCore | EnemyArchetype::PuzzleMinion => {
            evaluate_station(ctx, &profile, dist, &mut update)
        }
        // Non-physical anchor.
        EnemyArchetype::CompositeCore => {}
    }

    if profile.airborne && ctx.archetype != EnemyArchetype::BossCore {
        apply_ceiling(ctx, &profile, &mut update);
    }

    update.state_changed = update.new_state != ctx.state;
    update
}

fn evaluate_fire(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    dist: f64,
    update: &mut BehaviorUpdate,
) {
    let wet = ctx.state == BehaviorState::Wet;

    if ctx.doused && !wet {
        update.new_state = BehaviorState::Wet;
        update.wet_remaining_secs = FIRE_WET_SECS;
        update.velocity = Some(DVec3::ZERO);
        update.angular_velocity = Some(DVec3::ZERO);
        update.damping = Some(WET_DAMPING);
        update.event = Some(BehaviorEvent::Extinguished);
        return;
    }

    if wet {
        update.damping = Some(WET_DAMPING);
        let remaining = ctx.wet_remaining_secs - ctx.dt;
        update.wet_remaining_secs = remaining.max(0.0);

        let flat = DVec3::new(ctx.position.x, 0.0, ctx.position.z);
        if flat.length() > WET_RETURN_RADIUS {
            update.force += -flat.normalize() * WET_RETURN_FORCE;
        }
        if remaining <= 0.0 {
            update.new_state = BehaviorState::Normal;
            update.damping = Some(DRY_DAMPING);
            update.velocity = Some(DVec3::new(
                ctx.velocity.x,
                REKINDLE_LIFT,
                ctx.velocity.z,
            ));
            update.event = Some(BehaviorEvent::Rekindled);
        }
        return;
    }

    update.damping = Some(DRY_DAMPING);
    let hover_y = (ctx.target.y + FIRE_HOVER_OFFSET).max(FIRE_MIN_HOVER_Y);
    let lift = GRAVITY * profile.mass + (hover_y - ctx.position.y) * FIRE_LIFT_SPRING;
    let push = if dist > FIRE_FAR_DISTANCE {
        FIRE_FAR_FORCE
    } else {
        FIRE_NEAR_FORCE
    };
    update.force += DVec3::Y * lift + horizontal_dir(ctx.position, ctx.target) * push;
    update.contact = dist < profile.contact_range;
}

fn evaluate_phantom(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    dist: f64,
    update: &mut BehaviorUpdate,
) {
    let mut wet = ctx.state == BehaviorState::Wet;
    let mut remaining = ctx.wet_remaining_secs;
    if ctx.doused {
        update.new_state = BehaviorState::Wet;
        remaining = PHANTOM_WET_SECS;
        wet = true;
    } else if wet {
        remaining -= ctx.dt;
        if remaining <= 0.0 {
            update.new_state = BehaviorState::Normal;
            wet = false;
        }
    }
    update.wet_remaining_secs = remaining.max(0.0);

    let visible = ctx.on_water || wet || dist < PHANTOM_DETECTION_RADIUS;
    let reflecting = ctx.near_reflector || ctx.on_water;
    update.look = Some(if visible {
        PhantomLook::Visible
    } else if reflecting {
        PhantomLook::Reflecting
    } else {
        PhantomLook::Hidden
    });

    if visible && wet {
        update.angular_velocity = Some(DVec3::Y * SPIN_RATE);
        return;
    }

    if ctx.target.y > ctx.position.y + PHANTOM_CLIMB_TRIGGER {
        update.velocity = Some(DVec3::new(
            ctx.velocity.x,
            PHANTOM_CLIMB_SPEED,
            ctx.velocity.z,
        ));
    }
    let push = if dist > PHANTOM_FAR_DISTANCE {
        profile.drive_force
    } else {
        PHANTOM_NEAR_FORCE
    };
    update.force += dir(ctx.position, ctx.target) * push;
    update.contact = dist < profile.contact_range;
}

/// Ground archetypes that share the patrol/chase machine.
fn evaluate_grunt(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    dist: f64,
    update: &mut BehaviorUpdate,
    rng: &mut impl Rng,
) {
    let goal = if ctx.state == BehaviorState::Patrol {
        if dist < CHASE_TRIGGER_DISTANCE {
            update.new_state = BehaviorState::Chase;
            ctx.target
        } else {
            let waypoint = next_waypoint(ctx, rng);
            update.waypoint = Some(waypoint);
            waypoint
        }
    } else {
        ctx.target
    };
    let chasing = update.new_state != BehaviorState::Patrol;
    let heading = dir(ctx.position, goal);
    let drive = profile.drive_force;

    match ctx.archetype {
        EnemyArchetype::Cube => {
            update.angular_velocity = Some(DVec3::Y * SPIN_RATE);
            update.force += heading * drive;
        }
        EnemyArchetype::Roller => {
            update.torque = DVec3::new(heading.z * drive, 0.0, -heading.x * drive);
        }
        EnemyArchetype::Jumper => {
            if ctx.position.y < JUMPER_GROUND_Y && rng.gen::<f64>() < JUMPER_JUMP_CHANCE {
                update.velocity = Some(DVec3::new(
                    ctx.velocity.x,
                    JUMPER_JUMP_SPEED,
                    ctx.velocity.z,
                ));
            }
            update.force += heading * drive;
        }
        EnemyArchetype::Cone => {
            update.force += heading * drive;
            if chasing && charge_due(ctx.age_secs, ctx.dt) {
                update.impulse += heading * CONE_CHARGE_IMPULSE;
            }
        }
        EnemyArchetype::Torus if chasing => {
            let radial = horizontal_dir(ctx.position, ctx.target);
            let flat_dist = DVec3::new(
                ctx.target.x - ctx.position.x,
                0.0,
                ctx.target.z - ctx.position.z,
            )
            .length();
            let tangent = DVec3::new(-radial.z, 0.0, radial.x);
            update.force +=
                tangent * drive + radial * (flat_dist - TORUS_ORBIT_RADIUS) * TORUS_RADIAL_SPRING;
        }
        _ => update.force += heading * drive,
    }

    if chasing {
        update.contact = dist < profile.contact_range;
    }
}

/// The golden target flees the player when close and wanders otherwise.
fn evaluate_target(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    update: &mut BehaviorUpdate,
    rng: &mut impl Rng,
) {
    if ctx.position.distance(ctx.player) < TARGET_FLEE_RADIUS {
        update.force += horizontal_dir(ctx.player, ctx.position) * profile.drive_force;
        return;
    }
    let waypoint = next_waypoint(ctx, rng);
    update.waypoint = Some(waypoint);
    update.force += horizontal_dir(ctx.position, waypoint) * profile.drive_force;
}

fn evaluate_eater(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    dist: f64,
    update: &mut BehaviorUpdate,
) {
    let goal = match ctx.nearest_barrier {
        Some(barrier) => {
            update.eat_barrier = within_bite(ctx.position, profile, &barrier);
            barrier.position
        }
        None => ctx.target,
    };
    update.force += dir(ctx.position, goal) * profile.drive_force;
    update.contact = dist < profile.contact_range;
}

/// Hover band on a vertical spring, horizontal orbit as a function of time.
fn evaluate_boss(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    dist: f64,
    update: &mut BehaviorUpdate,
) {
    let angle = ctx.now_secs * BOSS_ORBIT_RATE;
    let orbit = DVec3::new(
        angle.cos() * BOSS_ORBIT_RADIUS,
        0.0,
        angle.sin() * BOSS_ORBIT_RADIUS,
    );
    let flat_pos = DVec3::new(ctx.position.x, 0.0, ctx.position.z);
    let flat_vel = DVec3::new(ctx.velocity.x, 0.0, ctx.velocity.z);

    let band_y = ctx.position.y.clamp(BOSS_HOVER_MIN_Y, BOSS_HOVER_MAX_Y);
    let vertical = (band_y - ctx.position.y) * BOSS_HOVER_SPRING
        - ctx.velocity.y * BOSS_HOVER_DAMPING
        + GRAVITY;
    let horizontal = (orbit - flat_pos) * BOSS_ORBIT_SPRING - flat_vel * BOSS_ORBIT_DAMPING;
    update.force += (horizontal + DVec3::Y * vertical) * profile.mass;

    if let Some(barrier) = ctx.nearest_barrier {
        update.eat_barrier = within_bite(ctx.position, profile, &barrier);
    }
    update.contact = dist < profile.contact_range;
}

fn evaluate_station(
    ctx: &BehaviorContext,
    profile: &ArchetypeProfile,
    dist: f64,
    update: &mut BehaviorUpdate,
) {
    if let Some(home) = ctx.home {
        update.force += station_force(
            ctx.position,
            ctx.velocity,
            home,
            COMPOSITE_SLOT_SPRING,
            profile.mass,
        );
    }
    update.contact = dist < profile.contact_range;
}

fn apply_ceiling(ctx: &BehaviorContext, profile: &ArchetypeProfile, update: &mut BehaviorUpdate) {
    if ctx.position.y <= ctx.bounds.ceiling_y {
        return;
    }
    let velocity = update.velocity.unwrap_or(ctx.velocity);
    update.velocity = Some(DVec3::new(velocity.x, velocity.y.min(0.0), velocity.z));
    update.force += DVec3::NEG_Y * CEILING_PUSH * profile.mass;
}

/// Keep the current waypoint until reached, then pick a new one.
fn next_waypoint(ctx: &BehaviorContext, rng: &mut impl Rng) -> DVec3 {
    match ctx.waypoint {
        Some(waypoint) if flat_distance(waypoint, ctx.position) > PATROL_ARRIVAL_RADIUS => waypoint,
        _ => pick_patrol_point(&ctx.bounds, ctx.position.y, rng),
    }
}

fn within_bite(position: DVec3, profile: &ArchetypeProfile, barrier: &BarrierSighting) -> bool {
    position.distance(barrier.position) < profile.radius + barrier.half_extent + 1.0
}

/// True on the tick a charge interval boundary is crossed.
fn charge_due(age_secs: f64, dt: f64) -> bool {
    age_secs >= CONE_CHARGE_INTERVAL_SECS
        && (age_secs / CONE_CHARGE_INTERVAL_SECS).floor()
            != ((age_secs - dt) / CONE_CHARGE_INTERVAL_SECS).floor()
}

fn flat_distance(a: DVec3, b: DVec3) -> f64 {
    DVec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}
