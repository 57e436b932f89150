//! Aim targeting: which barrier a destroy or release would act on.
//!
//! At most one barrier is highlighted at a time. The previous highlight
//! is always cleared before a new one is drawn.

use glam::DVec3;
use hecs::Entity;

use kekkai_core::components::{Barrier, EnemyProfile, Extent, PhysicsBody};
use kekkai_core::constants::{AIM_FALLBACK_EXTRA_REACH, SMART_AIM_BARRIER_RADIUS, SMART_AIM_MIN_COSINE};
use kekkai_core::error::ActionRejected;
use kekkai_core::types::{Aabb, Ray, Rgb};

use crate::context::SimContext;
use crate::systems::barrier::set_highlight;

pub fn set_aim(sim: &mut SimContext, origin: DVec3, direction: DVec3) {
    sim.aim.ray = Some(Ray::new(origin, direction));
}

/// Toggle focus aim. Only modes with smart aim grant it.
pub fn toggle_focus(sim: &mut SimContext) -> Result<bool, ActionRejected> {
    if !sim.is_active() {
        return Err(ActionRejected::NotActive);
    }
    if !sim.config.rules.smart_aim {
        sim.feedback.message("NOT AVAILABLE", Rgb::RED);
        return Err(ActionRejected::AbilityUnavailable);
    }
    sim.player.focusing = !sim.player.focusing;
    if !sim.player.focusing {
        sim.aim.locked_enemy = None;
    }
    let text = if sim.player.focusing { "FOCUS ON" } else { "FOCUS OFF" };
    sim.feedback.message(text, sim.config.palette.focus_highlight);
    Ok(sim.player.focusing)
}

/// Recompute the highlighted barrier from the aim ray.
pub fn run(sim: &mut SimContext) {
    let ray = sim.aim.ray;
    let target = match ray {
        Some(ray) if sim.player.focusing => smart_target(sim, &ray),
        Some(ray) => ray_target(sim, &ray),
        None => None,
    };
    update_highlight(sim, target);
}

struct AimCandidate {
    entity: Entity,
    position: DVec3,
    size: DVec3,
    yaw: f64,
}

fn candidates(sim: &SimContext) -> Vec<AimCandidate> {
    sim.world
        .query::<&Barrier>()
        .iter()
        .filter(|(_, b)| !b.shrinking)
        .map(|(entity, b)| AimCandidate {
            entity,
            position: b.position,
            size: b.size * b.scale,
            yaw: b.yaw,
        })
        .collect()
}

/// Nearest barrier hit by the ray, else the barrier whose center passes
/// closest to the ray within its generous reach.
pub fn ray_target(sim: &SimContext, ray: &Ray) -> Option<Entity> {
    let max_distance = sim.config.aim.max_distance;
    let base_radius = sim.config.aim.base_radius;
    let barriers = candidates(sim);

    let hit = barriers
        .iter()
        .filter_map(|c| {
            ray.cast_yawed_box(c.position, c.size, c.yaw)
                .filter(|t| *t <= max_distance)
                .map(|t| (c.entity, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((entity, _)) = hit {
        return Some(entity);
    }

    barriers
        .iter()
        .filter_map(|c| {
            let t = (c.position - ray.origin).dot(ray.direction);
            if t <= 0.0 || t >= max_distance + AIM_FALLBACK_EXTRA_REACH {
                return None;
            }
            let miss = c.position.distance(ray.at(t));
            let reach = base_radius + c.size.max_element() * 0.5;
            (miss < reach).then_some((c.entity, miss))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Lock the enemy most centered in view, then pick the barrier holding it.
fn smart_target(sim: &mut SimContext, ray: &Ray) -> Option<Entity> {
    let locked = sim
        .world
        .query::<(&EnemyProfile, &PhysicsBody, &Extent)>()
        .iter()
        .filter_map(|(entity, (_, body, extent))| {
            let position = sim.physics.position(body.0);
            let to_enemy = (position - ray.origin).try_normalize()?;
            let cosine = to_enemy.dot(ray.direction);
            (cosine > SMART_AIM_MIN_COSINE).then_some((entity, cosine, position, extent.half))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));
    sim.aim.locked_enemy = locked.map(|(entity, ..)| entity);

    let Some((_, _, enemy_position, enemy_half)) = locked else {
        return ray_target(sim, ray);
    };
    let enemy_bounds = Aabb::from_center_half_extents(enemy_position, enemy_half);
    let barriers = candidates(sim);

    let holding = barriers.iter().find(|c| {
        Aabb::from_yawed_box(c.position, c.size, c.yaw).intersects(&enemy_bounds)
    });
    if let Some(c) = holding {
        return Some(c.entity);
    }
    let nearby = barriers
        .iter()
        .map(|c| (c.entity, c.position.distance(enemy_position)))
        .filter(|(_, d)| *d < SMART_AIM_BARRIER_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    match nearby {
        Some((entity, _)) => Some(entity),
        None => ray_target(sim, ray),
    }
}

fn update_highlight(sim: &mut SimContext, target: Option<Entity>) {
    if sim.aim.highlighted == target {
        return;
    }
    if let Some(previous) = sim.aim.highlighted.take() {
        let color = sim.config.palette.barrier;
        set_highlight(sim, previous, false, color);
    }
    if let Some(entity) = target {
        let color = if sim.player.focusing {
            sim.config.palette.focus_highlight
        } else {
            sim.config.palette.highlight
        };
        set_highlight(sim, entity, true, color);
    }
    sim.aim.highlighted = target;
}
