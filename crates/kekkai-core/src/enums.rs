//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    Normal,
    /// Hovering fire spirit. Passes through barriers while dry.
    Fire,
    /// Nearly invisible unless near water, a reflector or its target.
    Phantom,
    Cube,
    Roller,
    Jumper,
    /// Charges its target in periodic bursts.
    Cone,
    /// Circles its target.
    Torus,
    /// Seeks out and consumes barriers.
    Eater,
    /// Golden hunt target. Flees the player.
    Target,
    /// Hovering boss that orbits the arena and consumes barriers.
    BossCore,
    /// Destructible part of a composite boss.
    CompositePart,
    /// Non-physical anchor owning the parts of a composite boss.
    CompositeCore,
    /// Invincible core of a puzzle encounter until its minions fall in order.
    PuzzleCore,
    PuzzleMinion,
}

impl EnemyArchetype {
    /// Archetypes that take multiple hits to kill.
    pub fn is_tough(self) -> bool {
        matches!(
            self,
            EnemyArchetype::BossCore
                | EnemyArchetype::PuzzleMinion
                | EnemyArchetype::PuzzleCore
                | EnemyArchetype::CompositePart
                | EnemyArchetype::Eater
        )
    }

    /// Archetypes that count against the boss side of population caps.
    pub fn is_boss_side(self) -> bool {
        matches!(
            self,
            EnemyArchetype::BossCore
                | EnemyArchetype::CompositePart
                | EnemyArchetype::CompositeCore
                | EnemyArchetype::PuzzleCore
                | EnemyArchetype::PuzzleMinion
        )
    }
}

/// Per-enemy behavioral state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Wandering between random points until the target comes close.
    Patrol,
    /// Pursuing the current target. Never reverts to patrol.
    Chase,
    /// Dry default for fire and phantom archetypes.
    #[default]
    Normal,
    /// Doused: aggression suppressed until the wet timer expires.
    Wet,
}

/// Mission type of the current wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    /// Annihilation: destroy a number of enemies.
    #[default]
    Normal,
    /// Protect a VIP along its waypoint path.
    Escort,
    /// Demolition: dismantle every part of a composite boss.
    BossComposite,
    /// Destroy the golden target.
    Hunt,
    /// Kill the puzzle minions in the hidden order, then the core.
    Puzzle,
    /// Defeat the barrier-eating boss core.
    BossEater,
    /// Endless survival with difficulty ramping.
    Infinite,
}

impl MissionType {
    /// On-screen mission text.
    pub fn label(self) -> &'static str {
        match self {
            MissionType::Normal => "Standard mission: eliminate hostile forces",
            MissionType::Escort => "Escort mission: protect the VIP",
            MissionType::BossComposite => "Demolition mission: dismantle the giant structure",
            MissionType::Hunt => "Hunt mission: destroy the golden target",
            MissionType::Puzzle => "Seal mission: break the guardians in the right order",
            MissionType::BossEater => "Final battle: the barrier eater",
            MissionType::Infinite => "INFINITE SURVIVAL",
        }
    }

    /// Whether the mission is a boss fight with a tighter ambient cap.
    pub fn is_boss_fight(self) -> bool {
        matches!(self, MissionType::BossComposite | MissionType::BossEater)
    }
}

/// Game mode preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Standard,
    Awakened,
    Infinite,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    /// Player hit points reached zero.
    GameOver,
    /// Escort target hit points reached zero.
    MissionFailed,
    /// The configured wave sequence was completed.
    Victory,
}

impl GamePhase {
    /// Terminal phases halt gameplay input until an external restart.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GamePhase::GameOver | GamePhase::MissionFailed | GamePhase::Victory
        )
    }
}

/// How an enemy left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCause {
    /// Destroyed by the player; eligible for objective credit.
    Killed,
    /// Out of bounds for too long; no credit.
    Retreated,
    /// Swept by a wave clear, puzzle reset or parent removal; no credit.
    Cleared,
}

/// Geometry requested from the scene layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshShape {
    Sphere { radius: f64 },
    Icosahedron { radius: f64 },
    Box { x: f64, y: f64, z: f64 },
    Tetrahedron { radius: f64 },
    Torus { radius: f64, tube: f64 },
    Cone { radius: f64, height: f64 },
    Cylinder { radius: f64, height: f64 },
}
