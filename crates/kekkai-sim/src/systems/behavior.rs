//! Enemy behavior system. Runs the behavior FSM for every enemy each tick.
//!
//! Builds a `BehaviorContext` per enemy from the registry and physics,
//! calls `kekkai_behavior::fsm::evaluate`, then applies the returned
//! forces, overrides and state changes. Also handles contact damage,
//! barrier eating, dry-fire burning and out-of-bounds recovery.

use glam::DVec3;
use hecs::Entity;

use kekkai_behavior::fsm::{evaluate, BarrierSighting, BehaviorContext, BehaviorEvent, PhantomLook};
use kekkai_behavior::profiles::get_profile;
use kekkai_behavior::steering::{choose_target, containment, douse_duration, Containment, TargetKind};
use kekkai_core::components::*;
use kekkai_core::constants::{
    CONTACT_DAMAGE, EATER_HEAL, PHANTOM_HIDDEN_OPACITY, PHANTOM_VISIBLE_OPACITY, WET_DAMPING,
};
use kekkai_core::enums::{BehaviorState, EnemyArchetype};
use kekkai_core::events::FeedbackEvent;
use kekkai_core::types::{BodyHandle, MeshHandle, Rgb};

use crate::context::SimContext;
use crate::director::escort;
use crate::physics::groups;
use crate::spawn::DRY_FIRE_MASK;
use crate::systems::{barrier, combat, hazards, player};

/// Per-enemy data gathered before evaluation.
struct EnemyRow {
    entity: Entity,
    archetype: EnemyArchetype,
    state: BehaviorState,
    body: BodyHandle,
    mesh: Option<MeshHandle>,
    waypoint: Option<DVec3>,
    wet_remaining_secs: f64,
    spawned_at_secs: f64,
    parent: Option<Entity>,
    slot: Option<DVec3>,
    minion_offset: Option<DVec3>,
    core_home: Option<DVec3>,
}

/// A standing barrier as seen by enemies.
struct StandingBarrier {
    entity: Entity,
    position: DVec3,
    half_extent: f64,
    is_ghost: bool,
}

fn collect_enemies(sim: &SimContext) -> Vec<EnemyRow> {
    let mut rows = Vec::new();
    let mut query = sim.world.query::<(&EnemyProfile, &PhysicsBody)>();
    for (entity, (profile, body)) in query.iter() {
        rows.push(EnemyRow {
            entity,
            archetype: profile.archetype,
            state: profile.state,
            body: body.0,
            mesh: sim.world.get::<&Mesh>(entity).ok().map(|m| m.0),
            waypoint: sim.world.get::<&Patrol>(entity).ok().and_then(|p| p.waypoint),
            wet_remaining_secs: sim
                .world
                .get::<&Wetness>(entity)
                .map(|w| w.remaining_secs)
                .unwrap_or(0.0),
            spawned_at_secs: profile.spawned_at_secs,
            parent: sim.world.get::<&ParentLink>(entity).ok().map(|l| l.parent),
            slot: sim.world.get::<&CompositeSlot>(entity).ok().map(|s| s.offset),
            minion_offset: sim.world.get::<&PuzzleMinion>(entity).ok().map(|m| m.offset),
            core_home: sim.world.get::<&PuzzleCore>(entity).ok().map(|c| c.home),
        });
    }
    rows
}

fn collect_barriers(sim: &SimContext) -> Vec<StandingBarrier> {
    sim.world
        .query::<&Barrier>()
        .iter()
        .filter(|(_, b)| !b.shrinking)
        .map(|(entity, b)| StandingBarrier {
            entity,
            position: b.position,
            half_extent: b.size.x.max(b.size.z) * 0.5 * b.scale,
            is_ghost: b.is_ghost,
        })
        .collect()
}

/// Station for anchored archetypes. `None` when the parent is gone.
fn home_for(sim: &SimContext, row: &EnemyRow) -> Option<DVec3> {
    if let Some(home) = row.core_home {
        return Some(home);
    }
    let parent = row.parent.filter(|p| sim.world.contains(*p))?;
    if let Some(offset) = row.slot {
        let anchor = sim.world.get::<&CompositeAnchor>(parent).ok()?.position;
        return Some(anchor + offset);
    }
    let offset = row.minion_offset?;
    Some(sim.body_position(parent)? + offset)
}

/// Run the behavior system for one tick.
pub fn run(sim: &mut SimContext) {
    let player_pos = sim.player_position();
    let escort_pos = sim.mission.escort.and_then(|e| sim.body_position(e));
    let now = sim.now();
    let dt = sim.dt();
    let bounds = sim.arena.bounds;

    for row in collect_enemies(sim) {
        if !sim.world.contains(row.entity) {
            continue;
        }
        let position = sim.physics.position(row.body);
        let velocity = sim.physics.velocity(row.body);

        let target_kind = choose_target(escort_pos.is_some(), &mut sim.rng);
        let target = match (target_kind, escort_pos) {
            (TargetKind::Escort, Some(p)) => p,
            _ => player_pos,
        };

        let on_water = sim.arena.is_water_surface(position, sim.tank.destroyed);
        let doused = douse_duration(row.archetype).is_some()
            && (on_water || hazards::in_splash(sim, position));

        let barriers = if get_profile(row.archetype).eats_barriers {
            collect_barriers(sim)
        } else {
            Vec::new()
        };
        let nearest = barriers.iter().min_by(|a, b| {
            a.position
                .distance(position)
                .total_cmp(&b.position.distance(position))
        });

        let ctx = BehaviorContext {
            archetype: row.archetype,
            state: row.state,
            position,
            velocity,
            target,
            player: player_pos,
            waypoint: row.waypoint,
            wet_remaining_secs: row.wet_remaining_secs,
            doused,
            on_water,
            near_reflector: sim.arena.near_reflector(position),
            nearest_barrier: nearest.map(|b| BarrierSighting {
                position: b.position,
                half_extent: b.half_extent,
            }),
            home: home_for(sim, &row),
            age_secs: now - row.spawned_at_secs,
            now_secs: now,
            dt,
            bounds,
        };
        let update = evaluate(&ctx, &mut sim.rng);

        // Physics overrides and forces.
        if let Some(damping) = update.damping {
            sim.physics.set_linear_damping(row.body, damping);
        }
        if let Some(v) = update.velocity {
            sim.physics.set_velocity(row.body, v);
        }
        if let Some(w) = update.angular_velocity {
            sim.physics.set_angular_velocity(row.body, w);
        }
        sim.physics.apply_force(row.body, update.force);
        sim.physics.apply_impulse(row.body, update.impulse);
        sim.physics.apply_torque(row.body, update.torque);

        // Components.
        if let Ok(mut profile) = sim.world.get::<&mut EnemyProfile>(row.entity) {
            profile.state = update.new_state;
        }
        if let Ok(mut patrol) = sim.world.get::<&mut Patrol>(row.entity) {
            patrol.waypoint = update.waypoint;
        }
        set_wetness(sim, row.entity, update.new_state, update.wet_remaining_secs);
        if update.state_changed && row.archetype == EnemyArchetype::Fire {
            let mask = if update.new_state == BehaviorState::Wet {
                groups::ALL
            } else {
                DRY_FIRE_MASK
            };
            sim.physics.set_collision_mask(row.body, mask);
        }
        if let (Some(look), Some(mesh)) = (update.look, row.mesh) {
            apply_look(sim, row.entity, mesh, look);
        }
        match update.event {
            Some(BehaviorEvent::Extinguished) => announce_doused(sim, row.mesh, position),
            Some(BehaviorEvent::Rekindled) => {
                sim.feedback.label("REKINDLED", position, Rgb(0xff4400));
                if let Some(mesh) = row.mesh {
                    sim.feedback.push(FeedbackEvent::StyleMesh {
                        mesh,
                        color: sim.config.palette.fire,
                        opacity: 1.0,
                    });
                }
            }
            None => {}
        }

        if update.contact {
            match (target_kind, escort_pos) {
                (TargetKind::Escort, Some(_)) => escort::damage(sim, CONTACT_DAMAGE),
                _ => {
                    player::take_damage(sim, CONTACT_DAMAGE);
                }
            }
        }

        if update.eat_barrier {
            if let Some(eaten) = nearest {
                eat_barrier(sim, row.entity, eaten.entity, eaten.position);
            }
        }

        if row.archetype == EnemyArchetype::Fire && update.new_state != BehaviorState::Wet {
            burn_barriers(sim, position);
        }

        contain(sim, row.entity, row.body, position);
    }
}

fn set_wetness(sim: &mut SimContext, entity: Entity, state: BehaviorState, remaining_secs: f64) {
    if state == BehaviorState::Wet {
        let _ = sim.world.insert_one(entity, Wetness { remaining_secs });
    } else if sim.world.get::<&Wetness>(entity).is_ok() {
        let _ = sim.world.remove_one::<Wetness>(entity);
    }
}

fn apply_look(sim: &mut SimContext, entity: Entity, mesh: MeshHandle, look: PhantomLook) {
    let (opacity, tint) = match look {
        PhantomLook::Visible => (PHANTOM_VISIBLE_OPACITY, sim.config.palette.phantom),
        PhantomLook::Reflecting => (PHANTOM_VISIBLE_OPACITY, Rgb::MAGENTA),
        PhantomLook::Hidden => (PHANTOM_HIDDEN_OPACITY, Rgb::WHITE),
    };
    let changed = match sim.world.get::<&mut Visibility>(entity) {
        Ok(mut v) => {
            let changed = v.opacity != opacity || v.tint != tint;
            v.opacity = opacity;
            v.tint = tint;
            changed
        }
        Err(_) => false,
    };
    if changed {
        sim.feedback.push(FeedbackEvent::StyleMesh {
            mesh,
            color: tint,
            opacity,
        });
    }
}

fn announce_doused(sim: &mut SimContext, mesh: Option<MeshHandle>, position: DVec3) {
    let wet = sim.config.palette.wet;
    sim.feedback.label("EXTINGUISHED", position, Rgb(0x00aaff));
    sim.feedback.particles(position, 20, Rgb::WHITE, 1.0);
    if let Some(mesh) = mesh {
        sim.feedback.push(FeedbackEvent::StyleMesh {
            mesh,
            color: wet,
            opacity: 1.0,
        });
    }
}

/// Drench an enemy outside the FSM (water-cube contact).
pub fn douse(sim: &mut SimContext, entity: Entity) {
    let Some(archetype) = sim.world.get::<&EnemyProfile>(entity).ok().map(|p| p.archetype) else {
        return;
    };
    let Some(duration) = douse_duration(archetype) else {
        return;
    };
    if let Ok(mut profile) = sim.world.get::<&mut EnemyProfile>(entity) {
        profile.state = BehaviorState::Wet;
    }
    let _ = sim.world.insert_one(
        entity,
        Wetness {
            remaining_secs: duration,
        },
    );
    let body = sim.world.get::<&PhysicsBody>(entity).ok().map(|b| b.0);
    let mesh = sim.world.get::<&Mesh>(entity).ok().map(|m| m.0);
    let Some(body) = body else {
        return;
    };
    if archetype == EnemyArchetype::Fire {
        sim.physics.set_velocity(body, DVec3::ZERO);
        sim.physics.set_angular_velocity(body, DVec3::ZERO);
        sim.physics.set_linear_damping(body, WET_DAMPING);
        sim.physics.set_collision_mask(body, groups::ALL);
    }
    let position = sim.physics.position(body);
    announce_doused(sim, mesh, position);
}

fn eat_barrier(sim: &mut SimContext, eater: Entity, barrier: Entity, position: DVec3) {
    if !barrier::remove_barrier(sim, barrier) {
        return;
    }
    if let Ok(mut health) = sim.world.get::<&mut Health>(eater) {
        health.hp = (health.hp + EATER_HEAL).min(health.max_hp);
    }
    sim.feedback.label("DEVOURED", position, Rgb::RED);
}

/// Dry fire burns through any solid barrier it touches.
fn burn_barriers(sim: &mut SimContext, position: DVec3) {
    let burned: Vec<(Entity, DVec3)> = collect_barriers(sim)
        .into_iter()
        .filter(|b| !b.is_ghost)
        .filter(|b| {
            DVec3::new(position.x - b.position.x, 0.0, position.z - b.position.z).length()
                < b.half_extent
        })
        .map(|b| (b.entity, b.position))
        .collect();
    for (entity, at) in burned {
        if barrier::remove_barrier(sim, entity) {
            sim.feedback.label("BURNED", at, Rgb(0xff4400));
        }
    }
}

/// Out-of-bounds bookkeeping: recover after the grace period, retreat
/// after too long outside.
fn contain(sim: &mut SimContext, entity: Entity, body: BodyHandle, position: DVec3) {
    let now = sim.now();
    let dt = sim.dt();
    let bounds = sim.arena.bounds;
    let verdict = match sim.world.get::<&mut OutOfBounds>(entity) {
        Ok(mut oob) => {
            if bounds.contains(position) {
                oob.outside_secs = 0.0;
                Containment::Inside
            } else {
                oob.outside_secs += dt;
                let verdict = containment(
                    position,
                    oob.outside_secs,
                    now - oob.last_recovery_secs,
                    &bounds,
                );
                if matches!(verdict, Containment::Recover(_)) {
                    oob.last_recovery_secs = now;
                }
                verdict
            }
        }
        Err(_) => return,
    };
    match verdict {
        Containment::Recover(impulse) => sim.physics.apply_impulse(body, impulse),
        Containment::Retreat => combat::retreat_enemy(sim, entity),
        Containment::Inside | Containment::Drifting => {}
    }
}
