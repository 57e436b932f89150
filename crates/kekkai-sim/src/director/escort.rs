//! Escort VIP: waypoint steering, damage and removal.

use kekkai_behavior::steering::horizontal_dir;
use kekkai_core::components::{EscortTarget, PhysicsBody};
use kekkai_core::constants::{ESCORT_ARRIVAL_RADIUS, ESCORT_STEER_FORCE};
use kekkai_core::types::Rgb;
use tracing::info;

use crate::context::SimContext;
use crate::spawn;

/// Push the VIP toward its current waypoint. Reaching the last one
/// completes the escort objective.
pub fn update(sim: &mut SimContext) {
    let Some(escort) = sim.mission.escort else {
        return;
    };
    let Ok((index, body)) = sim
        .world
        .query_one_mut::<(&EscortTarget, &PhysicsBody)>(escort)
        .map(|(t, b)| (t.waypoint_index, b.0))
    else {
        return;
    };
    let Some(waypoint) = sim.config.escort_path.get(index).copied() else {
        return;
    };

    let position = sim.physics.position(body);
    let flat = (waypoint - position) * glam::DVec3::new(1.0, 0.0, 1.0);
    if flat.length() < ESCORT_ARRIVAL_RADIUS {
        let next = index + 1;
        if let Ok(mut target) = sim.world.get::<&mut EscortTarget>(escort) {
            target.waypoint_index = next;
        }
        if next >= sim.config.escort_path.len() {
            info!(wave = sim.mission.wave, "escort reached destination");
            sim.feedback
                .label("ESCORT COMPLETE", position, sim.config.palette.vip);
            super::complete_objective(sim);
        }
        return;
    }

    let force = horizontal_dir(position, waypoint) * ESCORT_STEER_FORCE;
    sim.physics.apply_force(body, force);
}

/// Damage the VIP. Failure is detected at the end of the tick.
pub fn damage(sim: &mut SimContext, amount: f64) {
    let Some(escort) = sim.mission.escort else {
        return;
    };
    let position = sim.body_position(escort).unwrap_or_default();
    let Ok(mut target) = sim.world.get::<&mut EscortTarget>(escort) else {
        return;
    };
    let before = target.hp;
    target.hp -= amount;
    // Label every ten points lost rather than every contact tick.
    let crossed = (before / 10.0).ceil() != (target.hp / 10.0).ceil();
    drop(target);
    if crossed {
        sim.feedback.label("VIP DAMAGE", position, Rgb::RED);
    }
}

pub fn hp(sim: &SimContext) -> Option<f64> {
    let escort = sim.mission.escort?;
    sim.world.get::<&EscortTarget>(escort).ok().map(|t| t.hp)
}

pub fn remove(sim: &mut SimContext) {
    if let Some(escort) = sim.mission.escort.take() {
        spawn::despawn(sim, escort);
    }
}
