//! Simulation engine for the kekkai barrier game.
//!
//! Owns the hecs entity registry and the physics contract, runs systems
//! at a fixed tick rate, and produces HudSnapshots for the host.

pub mod context;
pub mod director;
pub mod engine;
pub mod environment;
pub mod physics;
pub mod scheduler;
pub mod spawn;
pub mod systems;

pub use engine::{SimConfig, SimulationEngine};
pub use kekkai_core as core;
