//! Barrier lifecycle: creation, destroy (shrink), release and the
//! per-tick shrink resolution against enemies and the water tank.
//!
//! A destroyed barrier loses its collision body the moment shrinking
//! begins; from then on it exists only as a volume tested for overlap.

use glam::DVec3;
use hecs::Entity;
use tracing::debug;

use kekkai_core::components::{Barrier, EnemyProfile, Extent, Mesh, PhysicsBody};
use kekkai_core::config::DestroyRule;
use kekkai_core::constants::{GHOST_SHELL_THICKNESS, WATER_TANK_BARRIER_DAMAGE};
use kekkai_core::enums::{BehaviorState, EnemyArchetype, MeshShape};
use kekkai_core::error::ActionRejected;
use kekkai_core::events::FeedbackEvent;
use kekkai_core::types::{Aabb, Rgb};

use crate::context::SimContext;
use crate::physics::{groups, BodyDesc, BodyShape, CollisionFilter};
use crate::scheduler::DeferredAction;
use crate::spawn;
use crate::systems::{behavior, combat, hazards};

/// Create a barrier from a completed draw gesture.
pub fn create_barrier(
    sim: &mut SimContext,
    position: DVec3,
    size: DVec3,
    yaw: f64,
    ghost: bool,
) -> Entity {
    let is_water_cube = !ghost && sim.arena.is_water_surface(position, sim.tank.destroyed);
    let half_extents = size * 0.5;
    let shape = if ghost {
        BodyShape::Shell {
            half_extents,
            thickness: GHOST_SHELL_THICKNESS,
        }
    } else {
        BodyShape::Box { half_extents }
    };
    let body = sim.physics.create_body(&BodyDesc {
        shape,
        mass: 0.0,
        filter: CollisionFilter::new(groups::BARRIER, groups::ALL),
        linear_damping: 0.0,
        position,
        yaw,
    });

    let palette = &sim.config.palette;
    let color = if is_water_cube {
        palette.water_cube
    } else if ghost {
        palette.ghost
    } else {
        palette.barrier
    };
    let mesh = sim.alloc_mesh();
    sim.feedback.push(FeedbackEvent::SpawnMesh {
        mesh,
        shape: MeshShape::Box {
            x: size.x,
            y: size.y,
            z: size.z,
        },
        color,
        opacity: if ghost { 0.15 } else { 0.3 },
        position,
        yaw,
    });

    let serial = sim.next_barrier_serial();
    let entity = sim.world.spawn((
        Barrier {
            position,
            size,
            yaw,
            scale: 1.0,
            is_ghost: ghost,
            is_water_cube,
            shrinking: false,
            highlighted: false,
            body: Some(body),
            struck: Vec::new(),
            struck_tank: false,
            serial,
        },
        Mesh(mesh),
    ));

    if is_water_cube {
        sim.feedback.label("WATER", position, sim.config.palette.water);
    } else {
        let label_color = if ghost { Rgb(0x00ffff) } else { Rgb(0xffff00) };
        sim.feedback.label("KETSU", position, label_color);
        sim.stats.barriers_created += 1;
    }
    debug!(serial, ghost, is_water_cube, "barrier created");
    entity
}

/// Destroy (metsu): detach the body and start shrinking.
pub fn destroy_barrier(sim: &mut SimContext, entity: Entity) -> Result<(), ActionRejected> {
    let (position, shrinking, is_water_cube, body) = match sim.world.get::<&Barrier>(entity) {
        Ok(b) => (b.position, b.shrinking, b.is_water_cube, b.body),
        Err(_) => return Err(ActionRejected::NoTarget),
    };
    if shrinking {
        return Err(ActionRejected::AlreadyShrinking);
    }
    let cost = sim.config.barrier.destroy_cost;
    if sim.player.sp < cost {
        sim.feedback.message("NOT ENOUGH SP", Rgb::RED);
        return Err(ActionRejected::InsufficientResource {
            needed: cost,
            available: sim.player.sp,
        });
    }
    sim.player.sp -= cost;

    if is_water_cube || sim.arena.is_water_surface(position, sim.tank.destroyed) {
        spawn::spawn_splash(sim, position);
    }
    if let Some(body) = body {
        sim.physics.remove_body(body);
    }
    if let Ok(mut b) = sim.world.get::<&mut Barrier>(entity) {
        b.body = None;
        b.shrinking = true;
    }
    sim.feedback.label("METSU", position, Rgb(0xff2244));
    debug!(?entity, "barrier destroyed");

    if let DestroyRule::ChainReaction {
        range,
        base_delay_secs,
        delay_per_meter,
        blast_radius,
    } = sim.config.rules.destroy
    {
        let now = sim.now();
        let neighbors: Vec<(Entity, f64)> = sim
            .world
            .query::<&Barrier>()
            .iter()
            .filter(|(e, b)| *e != entity && !b.shrinking)
            .map(|(e, b)| (e, b.position.distance(position)))
            .filter(|(_, d)| *d < range)
            .collect();
        for (neighbor, distance) in neighbors {
            sim.scheduler.schedule(
                now + base_delay_secs + distance * delay_per_meter,
                Some(neighbor),
                DeferredAction::ChainDestroy { barrier: neighbor },
            );
        }
        for enemy in combat::enemies_within(sim, position, blast_radius) {
            combat::attack_enemy(sim, enemy);
        }
    }
    Ok(())
}

/// Release (kai): remove immediately. Releasing a removed barrier is a no-op.
pub fn release_barrier(sim: &mut SimContext, entity: Entity) -> Result<(), ActionRejected> {
    if !sim.world.contains(entity) {
        return Ok(());
    }
    let position = match sim.world.get::<&Barrier>(entity) {
        Ok(b) => b.position,
        Err(_) => return Err(ActionRejected::NoTarget),
    };
    remove_barrier(sim, entity);
    sim.feedback.label("KAI", position, Rgb(0x00ffff));
    debug!(?entity, "barrier released");
    Ok(())
}

/// Destroy every standing barrier if the player can pay for all of them.
pub fn global_destroy(sim: &mut SimContext) -> Result<usize, ActionRejected> {
    let targets = standing_barriers(sim);
    if targets.is_empty() {
        return Ok(0);
    }
    let needed = targets.len() as f64 * sim.config.barrier.destroy_cost;
    if sim.player.sp < needed {
        sim.feedback.message("NOT ENOUGH SP", Rgb::RED);
        return Err(ActionRejected::InsufficientResource {
            needed,
            available: sim.player.sp,
        });
    }
    let mut destroyed = 0;
    for barrier in targets {
        if destroy_barrier(sim, barrier).is_ok() {
            destroyed += 1;
        }
    }
    sim.feedback.message("GLOBAL METSU", Rgb(0xff2244));
    Ok(destroyed)
}

/// Remove every barrier, shrinking ones included.
pub fn global_release(sim: &mut SimContext) -> usize {
    let all: Vec<Entity> = sim.world.query::<&Barrier>().iter().map(|(e, _)| e).collect();
    let count = all.len();
    for barrier in all {
        remove_barrier(sim, barrier);
    }
    if count > 0 {
        sim.feedback.message("GLOBAL KAI", Rgb(0x00ffff));
    }
    count
}

/// Barriers that still have a body.
pub fn standing_barriers(sim: &SimContext) -> Vec<Entity> {
    sim.world
        .query::<&Barrier>()
        .iter()
        .filter(|(_, b)| !b.shrinking)
        .map(|(e, _)| e)
        .collect()
}

/// Most recently created barrier.
pub fn most_recent(sim: &SimContext) -> Option<Entity> {
    sim.world
        .query::<&Barrier>()
        .iter()
        .max_by_key(|(_, b)| b.serial)
        .map(|(e, _)| e)
}

pub fn remove_barrier(sim: &mut SimContext, entity: Entity) -> bool {
    if sim.world.get::<&Barrier>(entity).is_err() {
        return false;
    }
    spawn::despawn(sim, entity)
}

struct EnemyVolume {
    entity: Entity,
    archetype: EnemyArchetype,
    state: BehaviorState,
    position: DVec3,
    bounds: Aabb,
}

fn enemy_volumes(sim: &SimContext) -> Vec<EnemyVolume> {
    sim.world
        .query::<(&EnemyProfile, &PhysicsBody, &Extent)>()
        .iter()
        .map(|(entity, (profile, body, extent))| {
            let position = sim.physics.position(body.0);
            EnemyVolume {
                entity,
                archetype: profile.archetype,
                state: profile.state,
                position,
                bounds: Aabb::from_center_half_extents(position, extent.half),
            }
        })
        .collect()
}

/// Shrink every destroying barrier one step and resolve its overlaps.
pub fn resolve_shrinking(sim: &mut SimContext) {
    let factor = sim.config.barrier.shrink_factor;
    let min_scale = sim.config.barrier.min_scale;
    let shrinking: Vec<Entity> = sim
        .world
        .query::<&Barrier>()
        .iter()
        .filter(|(_, b)| b.shrinking)
        .map(|(e, _)| e)
        .collect();

    for barrier in shrinking {
        let (bounds, scale, is_water_cube, struck_tank, position) =
            match sim.world.get::<&mut Barrier>(barrier) {
                Ok(mut b) => {
                    b.scale *= factor;
                    (
                        Aabb::from_yawed_box(b.position, b.size * b.scale, b.yaw),
                        b.scale,
                        b.is_water_cube,
                        b.struck_tank,
                        b.position,
                    )
                }
                Err(_) => continue,
            };

        if resolve_enemy_overlaps(sim, barrier, &bounds, is_water_cube) {
            continue;
        }

        if !struck_tank && !sim.tank.destroyed && bounds.intersects(&sim.arena.tank_bounds()) {
            if let Ok(mut b) = sim.world.get::<&mut Barrier>(barrier) {
                b.struck_tank = true;
            }
            hazards::damage_tank(sim, WATER_TANK_BARRIER_DAMAGE);
        }

        if scale < min_scale {
            sim.feedback
                .particles(position, 20, sim.config.palette.barrier, 1.0);
            remove_barrier(sim, barrier);
        }
    }
}

/// Returns true when the barrier was consumed.
fn resolve_enemy_overlaps(
    sim: &mut SimContext,
    barrier: Entity,
    bounds: &Aabb,
    is_water_cube: bool,
) -> bool {
    for enemy in enemy_volumes(sim) {
        if !bounds.intersects(&enemy.bounds) || !sim.world.contains(enemy.entity) {
            continue;
        }
        let already = match sim.world.get::<&mut Barrier>(barrier) {
            Ok(mut b) => {
                if b.struck.contains(&enemy.entity) {
                    true
                } else {
                    b.struck.push(enemy.entity);
                    false
                }
            }
            Err(_) => return true,
        };
        if already {
            continue;
        }

        let dry_fire = enemy.archetype == EnemyArchetype::Fire && enemy.state != BehaviorState::Wet;
        if dry_fire && is_water_cube {
            behavior::douse(sim, enemy.entity);
            continue;
        }
        if dry_fire {
            sim.feedback.label("NULLIFIED", enemy.position, Rgb::RED);
            sim.stats.barriers_wasted += 1;
            debug!(?barrier, "barrier nullified by fire");
            remove_barrier(sim, barrier);
            return true;
        }
        combat::attack_enemy(sim, enemy.entity);
    }
    !sim.world.contains(barrier)
}

/// Toggle the edge highlight of a barrier's visual.
pub(crate) fn set_highlight(sim: &mut SimContext, entity: Entity, on: bool, color: Rgb) {
    let mesh = match sim.world.query_one_mut::<(&mut Barrier, &Mesh)>(entity) {
        Ok((b, mesh)) => {
            b.highlighted = on;
            mesh.0
        }
        Err(_) => return,
    };
    sim.feedback.push(FeedbackEvent::HighlightEdges {
        mesh,
        color,
        width: if on { 3.0 } else { 1.0 },
    });
}
