//! Combat system: attacks, kills and enemy removal.
//!
//! Every removal path funnels through [`remove_enemy`] so bodies, visuals
//! and deferred events are released exactly once. Only [`kill_enemy`]
//! reports `Killed` to the director.

use glam::DVec3;
use hecs::Entity;
use tracing::{debug, info};

use kekkai_behavior::steering::dir;
use kekkai_core::components::{
    CompositeAnchor, EnemyProfile, Health, OutOfBounds, ParentLink, PhysicsBody, PuzzleMinion,
};
use kekkai_core::constants::{ATTACK_DAMAGE, ATTACK_KNOCKBACK};
use kekkai_core::enums::{EnemyArchetype, RemovalCause};
use kekkai_core::types::Rgb;

use crate::context::SimContext;
use crate::director::{self, puzzle};
use crate::spawn;

/// Height an out-of-bounds objective enemy is put back at, at minimum.
const RETURN_MIN_Y: f64 = 1.0;

/// What was known about an enemy at the moment it left the registry.
#[derive(Debug, Clone, Copy)]
pub struct RemovedEnemy {
    pub entity: Entity,
    pub archetype: EnemyArchetype,
    pub is_boss: bool,
    pub is_target: bool,
    pub position: DVec3,
    pub parent: Option<Entity>,
    pub minion_index: Option<usize>,
}

/// Remove an enemy and any children linked to it, without credit.
/// Returns `None` if it was already gone.
pub fn remove_enemy(sim: &mut SimContext, entity: Entity) -> Option<RemovedEnemy> {
    let (archetype, is_boss, is_target) = {
        let profile = sim.world.get::<&EnemyProfile>(entity).ok()?;
        (profile.archetype, profile.is_boss, profile.is_target)
    };
    let position = match sim.world.get::<&CompositeAnchor>(entity) {
        Ok(anchor) => anchor.position,
        Err(_) => sim.body_position(entity).unwrap_or_default(),
    };
    let parent = sim.world.get::<&ParentLink>(entity).ok().map(|l| l.parent);
    let minion_index = sim.world.get::<&PuzzleMinion>(entity).ok().map(|m| m.index);

    spawn::despawn(sim, entity);

    let children: Vec<Entity> = sim
        .world
        .query::<&ParentLink>()
        .iter()
        .filter(|(_, link)| link.parent == entity)
        .map(|(e, _)| e)
        .collect();
    for child in children {
        remove_enemy(sim, child);
    }

    Some(RemovedEnemy {
        entity,
        archetype,
        is_boss,
        is_target,
        position,
        parent,
        minion_index,
    })
}

/// Remove an enemy as killed by the player and report it for credit.
pub fn kill_enemy(sim: &mut SimContext, entity: Entity) {
    let Some(removed) = remove_enemy(sim, entity) else {
        return;
    };
    sim.stats.kills += 1;
    let color = sim.config.palette.enemy;
    sim.feedback.particles(removed.position, 30, color, 1.0);
    if removed.archetype.is_tough() {
        spawn::spawn_pickup(sim, removed.position);
    }
    debug!(archetype = ?removed.archetype, "enemy killed");

    director::on_enemy_removed(sim, &removed, RemovalCause::Killed);

    match (removed.archetype, removed.parent, removed.minion_index) {
        (EnemyArchetype::CompositePart, Some(anchor), _) => part_destroyed(sim, anchor),
        (EnemyArchetype::PuzzleMinion, _, Some(index)) => {
            puzzle::on_minion_killed(sim, index, removed.position)
        }
        _ => {}
    }
}

/// Remove an enemy that drifted out of the field for too long.
///
/// Enemies the wave objective depends on are put back inside the field
/// instead, so composite, hunt and puzzle encounters stay completable.
pub fn retreat_enemy(sim: &mut SimContext, entity: Entity) {
    if holds_objective(sim, entity) {
        return_to_field(sim, entity);
        return;
    }
    if let Some(removed) = remove_enemy(sim, entity) {
        director::on_enemy_removed(sim, &removed, RemovalCause::Retreated);
    }
}

/// Boss-side entities and hunt targets. Removing one without credit
/// would strand its encounter.
pub fn holds_objective(sim: &SimContext, entity: Entity) -> bool {
    sim.world
        .get::<&EnemyProfile>(entity)
        .map(|p| {
            p.is_boss
                || p.is_target
                || p.archetype.is_boss_side()
                || p.archetype == EnemyArchetype::Target
        })
        .unwrap_or(false)
}

fn return_to_field(sim: &mut SimContext, entity: Entity) {
    let Some(body) = sim.world.get::<&PhysicsBody>(entity).ok().map(|b| b.0) else {
        return;
    };
    let position = sim.physics.position(body);
    let inside = sim.arena.bounds.clamp(position, RETURN_MIN_Y);
    sim.physics.set_position(body, inside);
    sim.physics.set_velocity(body, DVec3::ZERO);
    if let Ok(mut oob) = sim.world.get::<&mut OutOfBounds>(entity) {
        oob.outside_secs = 0.0;
    }
    debug!(?entity, "objective enemy returned to the field");
}

/// A composite part fell. The anchor goes when its last part does.
fn part_destroyed(sim: &mut SimContext, anchor: Entity) {
    let remaining = match sim.world.get::<&mut CompositeAnchor>(anchor) {
        Ok(mut a) => {
            a.parts_count = a.parts_count.saturating_sub(1);
            a.parts_count
        }
        Err(_) => return,
    };
    if remaining > 0 {
        return;
    }
    if let Some(removed) = remove_enemy(sim, anchor) {
        info!("composite boss dismantled");
        sim.feedback.particles(removed.position, 200, Rgb(0xffaa00), 5.0);
        sim.feedback
            .message("GIANT DESTROYED", sim.config.palette.highlight);
        director::on_enemy_removed(sim, &removed, RemovalCause::Killed);
    }
}

/// One hit from a barrier. Tough enemies lose a hit point and are
/// knocked away from the player; everything else dies outright.
/// Returns whether the enemy died.
pub fn attack_enemy(sim: &mut SimContext, entity: Entity) -> bool {
    let Ok(archetype) = sim.world.get::<&EnemyProfile>(entity).map(|p| p.archetype) else {
        return false;
    };
    if archetype == EnemyArchetype::CompositeCore {
        return false;
    }
    let position = sim.body_position(entity).unwrap_or_default();
    if puzzle::core_is_invincible(sim, entity) {
        sim.feedback.label("INVULNERABLE", position, Rgb(0x888888));
        return false;
    }

    let Ok(mut health) = sim.world.get::<&mut Health>(entity) else {
        return false;
    };
    if !archetype.is_tough() {
        let dealt = health.hp.max(0.0);
        drop(health);
        sim.stats.damage_dealt += dealt;
        kill_enemy(sim, entity);
        return true;
    }

    health.hp -= ATTACK_DAMAGE;
    let dead = health.hp <= 0.0;
    drop(health);
    sim.stats.damage_dealt += ATTACK_DAMAGE;

    let away = dir(sim.player_position(), position);
    if let Some(body) = sim.world.get::<&PhysicsBody>(entity).ok().map(|b| b.0) {
        sim.physics.apply_impulse(body, away * ATTACK_KNOCKBACK);
    }
    sim.feedback.particles(position, 10, Rgb::WHITE, 0.5);

    if dead {
        kill_enemy(sim, entity);
    }
    dead
}

/// Enemies whose body lies within `radius` of `center`.
pub fn enemies_within(sim: &SimContext, center: DVec3, radius: f64) -> Vec<Entity> {
    sim.world
        .query::<(&EnemyProfile, &PhysicsBody)>()
        .iter()
        .filter(|(_, (_, body))| sim.physics.position(body.0).distance(center) < radius)
        .map(|(e, _)| e)
        .collect()
}
