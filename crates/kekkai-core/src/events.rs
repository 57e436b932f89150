//! Feedback emitted by the simulation for the scene and HUD layers.
//!
//! The simulation never touches a renderer directly: it appends these
//! events, and the host drains them from each snapshot.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::MeshShape;
use crate::types::{MeshHandle, Rgb};

/// Scene-side effects requested during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedbackEvent {
    /// Create a visual.
    SpawnMesh {
        mesh: MeshHandle,
        shape: MeshShape,
        color: Rgb,
        opacity: f64,
        position: DVec3,
        yaw: f64,
    },
    /// Dispose a visual.
    RemoveMesh { mesh: MeshHandle },
    /// Recolor a visual (wet fire, phantom visibility, exposed core).
    StyleMesh {
        mesh: MeshHandle,
        color: Rgb,
        opacity: f64,
    },
    /// Set the edge highlight of a barrier.
    HighlightEdges {
        mesh: MeshHandle,
        color: Rgb,
        width: f64,
    },
    /// Floating text that rises and fades.
    FloatingLabel {
        text: String,
        position: DVec3,
        color: Rgb,
    },
    /// Particle burst.
    Particles {
        position: DVec3,
        count: u32,
        color: Rgb,
        scale: f64,
    },
    /// Flash message in the HUD.
    Message { text: String, color: Rgb },
}

/// Buffer of feedback events for one tick.
#[derive(Debug, Clone, Default)]
pub struct FeedbackSink {
    events: Vec<FeedbackEvent>,
}

impl FeedbackSink {
    pub fn push(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }

    pub fn label(&mut self, text: impl Into<String>, position: DVec3, color: Rgb) {
        self.push(FeedbackEvent::FloatingLabel {
            text: text.into(),
            position,
            color,
        });
    }

    pub fn particles(&mut self, position: DVec3, count: u32, color: Rgb, scale: f64) {
        self.push(FeedbackEvent::Particles {
            position,
            count,
            color,
            scale,
        });
    }

    pub fn message(&mut self, text: impl Into<String>, color: Rgb) {
        self.push(FeedbackEvent::Message {
            text: text.into(),
            color,
        });
    }

    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    /// Take every buffered event, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }
}
