//! Entity spawn factories.
//!
//! Creates the player body, enemies, the escort VIP, boss assemblies,
//! pickups and splash hazards with their component bundles, and tears
//! them down again.

use glam::DVec3;
use hecs::Entity;

use kekkai_behavior::profiles::get_profile;
use kekkai_behavior::steering::initial_state;
use kekkai_core::components::*;
use kekkai_core::constants::*;
use kekkai_core::enums::*;
use kekkai_core::events::FeedbackEvent;
use kekkai_core::types::{BodyHandle, MeshHandle, Rgb};

use crate::context::SimContext;
use crate::physics::{groups, BodyDesc, BodyShape, CollisionFilter};

/// Composite boss parts: anchor-relative offset, full size, hit points.
const COMPOSITE_PARTS: [([f64; 3], [f64; 3], f64); 4] = [
    ([0.0, 0.0, 0.0], [6.0, 10.0, 4.0], 10.0),
    ([-8.0, 5.0, 0.0], [3.0, 8.0, 3.0], 5.0),
    ([8.0, 5.0, 0.0], [3.0, 8.0, 3.0], 5.0),
    ([0.0, 8.0, 0.0], [4.0, 4.0, 4.0], 5.0),
];

/// Puzzle minion colors by index.
pub const MINION_COLORS: [Rgb; PUZZLE_MINION_COUNT] =
    [Rgb(0xff0000), Rgb(0x00ff00), Rgb(0x0000ff)];

/// Collision mask of a dry fire enemy: passes through barriers.
pub const DRY_FIRE_MASK: u32 = groups::PLAYER | groups::ENEMY;

/// Options for an enemy spawn beyond archetype and position.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemySpawn {
    pub is_boss: bool,
    pub is_target: bool,
    /// Hit points override before the wave multiplier.
    pub hp: Option<f64>,
    /// Box geometry override (full size).
    pub size: Option<DVec3>,
    pub color: Option<Rgb>,
}

/// Create the player's body at the spawn point.
pub fn spawn_player(sim: &mut SimContext) -> BodyHandle {
    let body = sim.physics.create_body(&BodyDesc {
        shape: BodyShape::Sphere {
            radius: PLAYER_RADIUS,
        },
        mass: PLAYER_MASS,
        filter: CollisionFilter::new(groups::PLAYER, groups::ALL),
        linear_damping: 0.9,
        position: DVec3::from(PLAYER_SPAWN),
        yaw: 0.0,
    });
    sim.player.body = Some(body);
    body
}

/// Emit the tank visual.
pub fn spawn_tank_mesh(sim: &mut SimContext) {
    let mesh = sim.alloc_mesh();
    sim.feedback.push(FeedbackEvent::SpawnMesh {
        mesh,
        shape: MeshShape::Cylinder {
            radius: WATER_TANK_RADIUS,
            height: WATER_TANK_HEIGHT,
        },
        color: Rgb(0xcccccc),
        opacity: 1.0,
        position: sim.arena.tank_center,
        yaw: 0.0,
    });
    sim.tank.mesh = Some(mesh);
}

fn spawn_mesh(
    sim: &mut SimContext,
    shape: MeshShape,
    color: Rgb,
    opacity: f64,
    position: DVec3,
) -> MeshHandle {
    let mesh = sim.alloc_mesh();
    sim.feedback.push(FeedbackEvent::SpawnMesh {
        mesh,
        shape,
        color,
        opacity,
        position,
        yaw: 0.0,
    });
    mesh
}

fn archetype_color(sim: &SimContext, archetype: EnemyArchetype) -> Rgb {
    let palette = &sim.config.palette;
    match archetype {
        EnemyArchetype::Fire => palette.fire,
        EnemyArchetype::Phantom => Rgb::WHITE,
        EnemyArchetype::Target => palette.target,
        EnemyArchetype::BossCore => Rgb::RED,
        EnemyArchetype::CompositePart => palette.giant,
        EnemyArchetype::PuzzleCore => Rgb(0x888888),
        _ => palette.enemy,
    }
}

/// Spawn an enemy with its body, visual and behavior components.
pub fn spawn_enemy(
    sim: &mut SimContext,
    archetype: EnemyArchetype,
    position: DVec3,
    options: EnemySpawn,
) -> Entity {
    let profile = get_profile(archetype);
    let shape = match (options.size, archetype) {
        (Some(size), _) => BodyShape::Box {
            half_extents: size * 0.5,
        },
        (None, EnemyArchetype::Cube) => BodyShape::Box {
            half_extents: DVec3::splat(profile.radius),
        },
        _ => BodyShape::Sphere {
            radius: profile.radius,
        },
    };
    let mask = if archetype == EnemyArchetype::Fire {
        DRY_FIRE_MASK
    } else {
        groups::ALL
    };
    let half = match shape {
        BodyShape::Box { half_extents } => half_extents,
        _ => DVec3::splat(profile.radius),
    };
    let body = sim.physics.create_body(&BodyDesc {
        shape,
        mass: profile.mass,
        filter: CollisionFilter::new(groups::ENEMY, mask),
        linear_damping: ENEMY_DAMPING,
        position,
        yaw: 0.0,
    });

    let visual = match options.size {
        Some(size) => MeshShape::Box {
            x: size.x,
            y: size.y,
            z: size.z,
        },
        None => profile.shape,
    };
    let color = options
        .color
        .unwrap_or_else(|| archetype_color(sim, archetype));
    let opacity = if archetype == EnemyArchetype::Phantom {
        PHANTOM_HIDDEN_OPACITY
    } else {
        1.0
    };
    let mesh = spawn_mesh(sim, visual, color, opacity, position);

    let hp = options.hp.unwrap_or(profile.base_hp) * sim.mission.hp_multiplier;
    let state = initial_state(archetype, sim.config.rules.always_chase, &mut sim.rng);
    let entity = sim.world.spawn((
        EnemyProfile {
            archetype,
            state,
            is_boss: options.is_boss,
            is_target: options.is_target,
            spawned_at_secs: sim.time.elapsed_secs,
        },
        Health { hp, max_hp: hp },
        PhysicsBody(body),
        Mesh(mesh),
        Extent { half },
        OutOfBounds::default(),
        Patrol::default(),
    ));
    if archetype == EnemyArchetype::Phantom {
        let _ = sim.world.insert_one(
            entity,
            Visibility {
                opacity,
                tint: Rgb::WHITE,
            },
        );
    }
    entity
}

/// Spawn the escorted VIP at the start of the escort path.
pub fn spawn_escort(sim: &mut SimContext) -> Entity {
    let start = sim.config.escort_path.first().copied().unwrap_or(DVec3::ZERO);
    let body = sim.physics.create_body(&BodyDesc {
        shape: BodyShape::Sphere {
            radius: ESCORT_RADIUS,
        },
        mass: ESCORT_MASS,
        filter: CollisionFilter::new(groups::PLAYER, groups::ALL),
        linear_damping: 0.5,
        position: start,
        yaw: 0.0,
    });
    let color = sim.config.palette.vip;
    let mesh = spawn_mesh(
        sim,
        MeshShape::Icosahedron {
            radius: ESCORT_RADIUS,
        },
        color,
        1.0,
        start,
    );
    sim.feedback.label("ESCORT START", start, color);
    sim.world.spawn((
        EscortTarget {
            hp: ESCORT_MAX_HP,
            max_hp: ESCORT_MAX_HP,
            waypoint_index: 1,
        },
        PhysicsBody(body),
        Mesh(mesh),
    ))
}

/// Spawn a composite boss: a non-physical anchor and its parts.
/// Returns the anchor.
pub fn spawn_composite_boss(sim: &mut SimContext) -> Entity {
    let anchor_position = DVec3::from(COMPOSITE_ANCHOR);
    let anchor = sim.world.spawn((
        EnemyProfile {
            archetype: EnemyArchetype::CompositeCore,
            state: BehaviorState::Chase,
            is_boss: true,
            is_target: false,
            spawned_at_secs: sim.time.elapsed_secs,
        },
        Health { hp: 1.0, max_hp: 1.0 },
        CompositeAnchor {
            parts_count: 0,
            position: anchor_position,
        },
    ));

    let mut count = 0;
    for (offset, size, hp) in COMPOSITE_PARTS {
        let offset = DVec3::from(offset);
        let part = spawn_enemy(
            sim,
            EnemyArchetype::CompositePart,
            anchor_position + offset,
            EnemySpawn {
                is_boss: true,
                hp: Some(hp),
                size: Some(DVec3::from(size)),
                ..Default::default()
            },
        );
        let _ = sim.world.insert(
            part,
            (ParentLink { parent: anchor }, CompositeSlot { offset }),
        );
        count += 1;
    }
    if let Ok(mut a) = sim.world.get::<&mut CompositeAnchor>(anchor) {
        a.parts_count = count;
    }
    let color = sim.config.palette.highlight;
    sim.feedback
        .label("DEMOLITION TARGET", anchor_position + DVec3::Y * 10.0, color);
    anchor
}

/// Spawn the invincible puzzle core.
pub fn spawn_puzzle_core(sim: &mut SimContext) -> Entity {
    let home = DVec3::from(PUZZLE_CORE_POSITION);
    let core = spawn_enemy(
        sim,
        EnemyArchetype::PuzzleCore,
        home,
        EnemySpawn {
            is_boss: true,
            ..Default::default()
        },
    );
    let _ = sim.world.insert_one(
        core,
        PuzzleCore {
            invincible: true,
            home,
        },
    );
    core
}

/// Spawn one puzzle minion at `core_position + offset`.
pub fn spawn_puzzle_minion(
    sim: &mut SimContext,
    core: Entity,
    core_position: DVec3,
    index: usize,
    offset: DVec3,
) -> Entity {
    let color = MINION_COLORS.get(index).copied().unwrap_or(Rgb::WHITE);
    let minion = spawn_enemy(
        sim,
        EnemyArchetype::PuzzleMinion,
        core_position + offset,
        EnemySpawn {
            is_boss: true,
            color: Some(color),
            ..Default::default()
        },
    );
    let _ = sim.world.insert(
        minion,
        (ParentLink { parent: core }, PuzzleMinion { index, offset }),
    );
    minion
}

/// Drop a heal pickup.
pub fn spawn_pickup(sim: &mut SimContext, position: DVec3) -> Entity {
    let mesh = spawn_mesh(
        sim,
        MeshShape::Box {
            x: 0.5,
            y: 0.5,
            z: 0.5,
        },
        Rgb(0x00ff00),
        1.0,
        position,
    );
    sim.world.spawn((
        Pickup {
            heal: PICKUP_HEAL,
            position,
        },
        Mesh(mesh),
    ))
}

/// Create a water column that douses fire and phantoms.
pub fn spawn_splash(sim: &mut SimContext, center: DVec3) -> Entity {
    let color = sim.config.palette.water;
    sim.feedback.label("WATER PILLAR", center, color);
    sim.feedback.particles(center, 80, color, 4.0);
    sim.world.spawn((WaterSplash {
        center,
        radius: SPLASH_RADIUS,
        height: SPLASH_HEIGHT,
        remaining_secs: SPLASH_DURATION_SECS,
    },))
}

/// Remove an entity, its body and its visual. Events it owns are cancelled.
/// Returns false if the entity was already gone.
pub fn despawn(sim: &mut SimContext, entity: Entity) -> bool {
    if !sim.world.contains(entity) {
        return false;
    }
    if let Ok(body) = sim.world.get::<&PhysicsBody>(entity).map(|b| b.0) {
        sim.physics.remove_body(body);
    }
    let barrier_body = sim
        .world
        .get::<&Barrier>(entity)
        .ok()
        .and_then(|b| b.body);
    if let Some(body) = barrier_body {
        sim.physics.remove_body(body);
    }
    if let Ok(mesh) = sim.world.get::<&Mesh>(entity).map(|m| m.0) {
        sim.feedback.push(FeedbackEvent::RemoveMesh { mesh });
    }
    sim.scheduler.cancel_owner(entity);
    if sim.aim.highlighted == Some(entity) {
        sim.aim.highlighted = None;
    }
    if sim.aim.locked_enemy == Some(entity) {
        sim.aim.locked_enemy = None;
    }
    sim.world.despawn(entity).is_ok()
}
