//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::GameMode;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session ---
    /// Start a new session in the given mode.
    StartSession { mode: GameMode },
    Pause,
    Resume,

    // --- Aim ---
    /// Update the camera aim ray used for barrier targeting.
    SetAim { origin: DVec3, direction: DVec3 },
    /// Toggle focus (smart) aim.
    ToggleFocusAim,

    // --- Barriers ---
    /// A draw gesture completed: create a barrier.
    RequestBarrier {
        position: DVec3,
        size: DVec3,
        yaw: f64,
        ghost: bool,
    },
    /// Destroy (metsu) the targeted barrier.
    Destroy,
    /// Release (kai) the targeted barrier.
    Release,
    /// Destroy every barrier.
    GlobalDestroy,
    /// Release every barrier.
    GlobalRelease,

    // --- Player ---
    Jump,
    /// Toggle the area-denial field (modes that grant it).
    ToggleAreaDenial,
}
