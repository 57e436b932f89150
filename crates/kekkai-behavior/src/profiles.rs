//! Archetype-specific behavioral profiles.
//!
//! Consolidates per-archetype parameters for the behavior FSM and the
//! spawn factories.

use kekkai_core::enums::{EnemyArchetype, MeshShape};

/// Behavioral profile for an enemy archetype.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeProfile {
    /// Body mass (kg). Zero for non-physical archetypes.
    pub mass: f64,
    /// Collision radius (m).
    pub radius: f64,
    /// Hit points before the per-wave multiplier.
    pub base_hp: f64,
    /// Distance to the target at which contact damage applies (m). Zero
    /// never attacks.
    pub contact_range: f64,
    /// Steering force toward the target (N).
    pub drive_force: f64,
    /// Cancels gravity and is subject to the vertical ceiling.
    pub airborne: bool,
    /// Consumes barriers it reaches.
    pub eats_barriers: bool,
    /// May be seeded in the patrol state.
    pub can_patrol: bool,
    /// Spawn height range (m).
    pub spawn_height: (f64, f64),
    pub shape: MeshShape,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> ArchetypeProfile {
    use kekkai_core::constants::*;

    let icosahedron = |radius| MeshShape::Icosahedron { radius };
    let grunt = ArchetypeProfile {
        mass: 15.0,
        radius: 0.8,
        base_hp: 3.0,
        contact_range: 1.5,
        drive_force: 20.0,
        airborne: false,
        eats_barriers: false,
        can_patrol: false,
        spawn_height: (10.0, 10.0),
        shape: icosahedron(0.8),
    };

    match archetype {
        EnemyArchetype::Normal => ArchetypeProfile {
            can_patrol: true,
            ..grunt
        },
        EnemyArchetype::Fire => ArchetypeProfile {
            base_hp: 5.0,
            contact_range: 2.0,
            drive_force: FIRE_FAR_FORCE,
            airborne: true,
            spawn_height: (15.0, 25.0),
            ..grunt
        },
        EnemyArchetype::Phantom => ArchetypeProfile {
            radius: 1.0,
            contact_range: 2.0,
            drive_force: 25.0,
            airborne: true,
            spawn_height: (15.0, 25.0),
            shape: icosahedron(1.0),
            ..grunt
        },
        EnemyArchetype::Cube => ArchetypeProfile {
            radius: 0.6,
            can_patrol: true,
            spawn_height: (15.0, 25.0),
            shape: MeshShape::Box {
                x: 1.2,
                y: 1.2,
                z: 1.2,
            },
            ..grunt
        },
        EnemyArchetype::Roller => ArchetypeProfile {
            radius: 1.0,
            shape: MeshShape::Tetrahedron { radius: 1.0 },
            ..grunt
        },
        EnemyArchetype::Jumper => ArchetypeProfile {
            radius: 1.0,
            drive_force: 15.0,
            can_patrol: true,
            shape: MeshShape::Torus {
                radius: 0.6,
                tube: 0.2,
            },
            ..grunt
        },
        EnemyArchetype::Cone => ArchetypeProfile {
            shape: MeshShape::Cone {
                radius: 0.5,
                height: 1.2,
            },
            ..grunt
        },
        EnemyArchetype::Torus => ArchetypeProfile {
            can_patrol: true,
            shape: MeshShape::Torus {
                radius: 0.8,
                tube: 0.25,
            },
            ..grunt
        },
        EnemyArchetype::Eater => ArchetypeProfile {
            mass: 40.0,
            radius: 1.5,
            base_hp: 20.0,
            drive_force: 25.0,
            eats_barriers: true,
            shape: icosahedron(1.5),
            ..grunt
        },
        EnemyArchetype::Target => ArchetypeProfile {
            contact_range: 0.0,
            drive_force: 30.0,
            ..grunt
        },
        EnemyArchetype::BossCore => ArchetypeProfile {
            mass: 500.0,
            radius: 3.0,
            base_hp: 50.0,
            contact_range: 4.0,
            drive_force: 0.0,
            airborne: true,
            eats_barriers: true,
            spawn_height: (BOSS_HOVER_MIN_Y, BOSS_HOVER_MAX_Y),
            shape: icosahedron(3.0),
            ..grunt
        },
        EnemyArchetype::CompositePart => ArchetypeProfile {
            mass: 50.0,
            radius: 2.0,
            base_hp: 5.0,
            contact_range: 0.0,
            drive_force: 0.0,
            airborne: true,
            spawn_height: (COMPOSITE_ANCHOR[1], COMPOSITE_ANCHOR[1]),
            shape: MeshShape::Box {
                x: 4.0,
                y: 4.0,
                z: 4.0,
            },
            ..grunt
        },
        EnemyArchetype::CompositeCore => ArchetypeProfile {
            mass: 0.0,
            radius: 0.0,
            base_hp: 1.0,
            contact_range: 0.0,
            drive_force: 0.0,
            spawn_height: (COMPOSITE_ANCHOR[1], COMPOSITE_ANCHOR[1]),
            ..grunt
        },
        EnemyArchetype::PuzzleCore => ArchetypeProfile {
            mass: 100.0,
            radius: 2.0,
            base_hp: 20.0,
            contact_range: 0.0,
            drive_force: 0.0,
            airborne: true,
            spawn_height: (PUZZLE_CORE_POSITION[1], PUZZLE_CORE_POSITION[1]),
            shape: icosahedron(2.0),
            ..grunt
        },
        EnemyArchetype::PuzzleMinion => ArchetypeProfile {
            mass: 30.0,
            radius: 1.0,
            drive_force: 0.0,
            airborne: true,
            spawn_height: (PUZZLE_CORE_POSITION[1], PUZZLE_CORE_POSITION[1]),
            shape: icosahedron(1.0),
            ..grunt
        },
    }
}
