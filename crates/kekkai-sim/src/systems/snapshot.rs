//! Snapshot system: queries the simulation state and builds a complete
//! HudSnapshot.
//!
//! Read-only apart from draining the tick's feedback buffer.

use hecs::Entity;

use kekkai_core::components::*;
use kekkai_core::state::*;

use crate::context::SimContext;
use crate::director::puzzle;

/// Build a complete HudSnapshot from the current state.
pub fn build_snapshot(sim: &mut SimContext) -> HudSnapshot {
    HudSnapshot {
        time: sim.time,
        phase: sim.phase,
        mode: sim.config.mode,
        player: build_player(sim),
        mission: build_mission(sim),
        escort: build_escort(sim),
        puzzle: puzzle::view(sim),
        tank: build_tank(sim),
        enemies: build_enemies(sim),
        barriers: build_barriers(sim),
        stats: sim.stats.clone(),
        feedback: sim.feedback.drain(),
    }
}

fn build_player(sim: &SimContext) -> PlayerView {
    let player = &sim.player;
    PlayerView {
        position: sim.player_position(),
        hp: player.hp,
        max_hp: player.max_hp,
        sp: player.sp,
        max_sp: player.max_sp,
        focusing: player.focusing,
        area_denial: player.area_denial,
    }
}

fn build_mission(sim: &SimContext) -> MissionView {
    let mission = &sim.mission;
    let boss_present = sim
        .world
        .query::<&EnemyProfile>()
        .iter()
        .any(|(_, p)| p.is_boss);
    MissionView {
        wave: mission.wave,
        mission_type: mission.mission_type,
        label: mission.mission_type.label().to_string(),
        remaining: mission.remaining,
        boss_present,
        boss_hp: mission.objective.and_then(|e| objective_hp(sim, e)),
    }
}

/// A composite boss reports the summed health of its parts.
fn objective_hp(sim: &SimContext, objective: Entity) -> Option<(f64, f64)> {
    if sim.world.get::<&CompositeAnchor>(objective).is_ok() {
        let (hp, max_hp) = sim
            .world
            .query::<(&ParentLink, &Health)>()
            .iter()
            .filter(|(_, (link, _))| link.parent == objective)
            .fold((0.0, 0.0), |(hp, max), (_, (_, h))| (hp + h.hp, max + h.max_hp));
        return Some((hp, max_hp));
    }
    sim.world
        .get::<&Health>(objective)
        .ok()
        .map(|h| (h.hp, h.max_hp))
}

fn build_escort(sim: &SimContext) -> Option<EscortView> {
    let escort = sim.mission.escort?;
    let position = sim.body_position(escort)?;
    let target = sim.world.get::<&EscortTarget>(escort).ok()?;
    Some(EscortView {
        position,
        hp: target.hp,
        max_hp: target.max_hp,
        waypoint_index: target.waypoint_index,
        waypoint_count: sim.config.escort_path.len(),
    })
}

fn build_tank(sim: &SimContext) -> TankView {
    TankView {
        hp: sim.tank.hp,
        destroyed: sim.tank.destroyed,
        flood_remaining_secs: sim
            .tank
            .flood_until_secs
            .map(|until| (until - sim.now()).max(0.0)),
    }
}

fn build_enemies(sim: &SimContext) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = sim
        .world
        .query::<(&EnemyProfile, &PhysicsBody, &Health, Option<&Visibility>)>()
        .iter()
        .map(|(entity, (profile, body, health, visibility))| EnemyView {
            id: entity.to_bits().get(),
            archetype: profile.archetype,
            state: profile.state,
            position: sim.physics.position(body.0),
            hp: health.hp,
            max_hp: health.max_hp,
            is_boss: profile.is_boss,
            opacity: visibility.map_or(1.0, |v| v.opacity),
            tint: visibility.map(|v| v.tint),
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_barriers(sim: &SimContext) -> Vec<BarrierView> {
    let mut barriers: Vec<(u64, BarrierView)> = sim
        .world
        .query::<&Barrier>()
        .iter()
        .map(|(entity, b)| {
            (
                b.serial,
                BarrierView {
                    id: entity.to_bits().get(),
                    position: b.position,
                    size: b.size,
                    yaw: b.yaw,
                    scale: b.scale,
                    is_ghost: b.is_ghost,
                    is_water_cube: b.is_water_cube,
                    shrinking: b.shrinking,
                    highlighted: b.highlighted,
                },
            )
        })
        .collect();
    barriers.sort_by_key(|(serial, _)| *serial);
    barriers.into_iter().map(|(_, view)| view).collect()
}
