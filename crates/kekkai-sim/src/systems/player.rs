//! Player system: spiritual power economy, damage, healing, jumping and
//! the area-denial field.

use glam::DVec3;
use hecs::Entity;
use tracing::{debug, info};

use kekkai_behavior::steering::dir;
use kekkai_core::components::{EnemyProfile, PhysicsBody};
use kekkai_core::config::JumpRule;
use kekkai_core::constants::{
    JUMP_GROUNDED_SPEED, JUMP_RESET_SPEED, PLAYER_IMPACT_DAMAGE_FACTOR,
    PLAYER_IMPACT_DAMAGE_THRESHOLD, PLAYER_IMPACT_KNOCKBACK,
};
use kekkai_core::error::ActionRejected;
use kekkai_core::types::Rgb;

use crate::context::SimContext;
use crate::director;
use crate::systems::{barrier, combat};

/// Per-tick resource bookkeeping.
pub fn run(sim: &mut SimContext) {
    let dt = sim.dt();
    let regen = sim.config.barrier.sp_regen_per_sec;
    let upkeep = sim.config.barrier.maintain_cost_per_sec;
    let standing = barrier::standing_barriers(sim).len() as f64;

    let player = &mut sim.player;
    player.damage_cooldown = (player.damage_cooldown - dt).max(0.0);
    player.sp = (player.sp + (regen - upkeep * standing) * dt).min(player.max_sp);

    run_area_denial(sim);

    if sim.player.sp <= 0.0 {
        sim.player.sp = 0.0;
        if standing > 0.0 {
            barrier::global_release(sim);
            info!("spiritual power depleted, barriers released");
            sim.feedback.message("SP DEPLETED", Rgb::RED);
        }
    }

    if sim.player_velocity().y.abs() < JUMP_RESET_SPEED {
        sim.player.jump_count = 0;
    }
}

fn run_area_denial(sim: &mut SimContext) {
    if !sim.player.area_denial {
        return;
    }
    let Some(rule) = sim.config.rules.area_denial else {
        sim.player.area_denial = false;
        return;
    };
    sim.player.sp -= rule.drain_per_sec * sim.dt();
    if sim.player.sp <= 0.0 {
        sim.player.area_denial = false;
        sim.feedback.message("AREA DENIAL OFF", Rgb::WHITE);
        return;
    }

    let center = sim.player_position();
    let inside: Vec<(Entity, bool, DVec3)> = sim
        .world
        .query::<(&EnemyProfile, &PhysicsBody)>()
        .iter()
        .filter_map(|(e, (profile, body))| {
            let position = sim.physics.position(body.0);
            (position.distance(center) < rule.radius)
                .then_some((e, profile.archetype.is_tough(), position))
        })
        .collect();
    for (enemy, tough, position) in inside {
        if tough {
            if let Some(body) = sim.world.get::<&PhysicsBody>(enemy).ok().map(|b| b.0) {
                sim.physics.apply_impulse(body, dir(center, position) * rule.push);
            }
        } else {
            combat::attack_enemy(sim, enemy);
        }
    }
}

/// Contact damage, gated by the damage cooldown. Returns whether it landed.
pub fn take_damage(sim: &mut SimContext, amount: f64) -> bool {
    if sim.player.damage_cooldown > 0.0 || !sim.is_active() {
        return false;
    }
    sim.player.hp = (sim.player.hp - amount).max(0.0);
    sim.player.damage_cooldown = sim.config.player.damage_cooldown_secs;
    sim.stats.damage_taken += amount;
    debug!(amount, hp = sim.player.hp, "player damaged");
    if sim.player.hp <= 0.0 {
        director::game_over(sim);
    }
    true
}

pub fn heal(sim: &mut SimContext, amount: f64) {
    sim.player.hp = (sim.player.hp + amount).min(sim.player.max_hp);
}

/// Impact from a physics contact with an enemy body.
pub fn on_impact(sim: &mut SimContext, enemy_position: DVec3, impact_speed: f64) {
    if impact_speed <= PLAYER_IMPACT_DAMAGE_THRESHOLD {
        return;
    }
    let damage = (impact_speed * PLAYER_IMPACT_DAMAGE_FACTOR).floor();
    if take_damage(sim, damage) {
        if let Some(body) = sim.player.body {
            let away = dir(enemy_position, sim.player_position());
            sim.physics.apply_impulse(
                body,
                away * PLAYER_IMPACT_KNOCKBACK * impact_speed,
            );
        }
    }
}

/// Jump when grounded, or once more in the air under the double-jump rule.
/// Returns whether a jump happened.
pub fn jump(sim: &mut SimContext) -> Result<bool, ActionRejected> {
    if !sim.is_active() {
        return Err(ActionRejected::NotActive);
    }
    let Some(body) = sim.player.body else {
        return Ok(false);
    };
    let velocity = sim.physics.velocity(body);
    let grounded = velocity.y.abs() < JUMP_GROUNDED_SPEED;
    let allowed = if grounded {
        sim.player.jump_count = 0;
        true
    } else {
        sim.config.rules.jump == JumpRule::Double && sim.player.jump_count < 2
    };
    if !allowed {
        return Ok(false);
    }
    // An air jump without a ground jump first still spends the first slot.
    sim.player.jump_count = sim.player.jump_count.max(1) + u32::from(!grounded);
    sim.physics.set_velocity(
        body,
        DVec3::new(velocity.x, sim.config.player.jump, velocity.z),
    );
    Ok(true)
}

/// Switch the area-denial field. Returns the new state.
pub fn toggle_area_denial(sim: &mut SimContext) -> Result<bool, ActionRejected> {
    if !sim.is_active() {
        return Err(ActionRejected::NotActive);
    }
    let Some(rule) = sim.config.rules.area_denial else {
        sim.feedback.message("NOT AVAILABLE", Rgb::RED);
        return Err(ActionRejected::AbilityUnavailable);
    };
    if sim.player.area_denial {
        sim.player.area_denial = false;
        sim.feedback.message("AREA DENIAL OFF", Rgb::WHITE);
        return Ok(false);
    }
    if sim.player.sp < rule.min_sp {
        sim.feedback.message("NOT ENOUGH SP", Rgb::RED);
        return Err(ActionRejected::InsufficientResource {
            needed: rule.min_sp,
            available: sim.player.sp,
        });
    }
    sim.player.area_denial = true;
    sim.feedback.message("AREA DENIAL ON", sim.config.palette.highlight);
    Ok(true)
}
