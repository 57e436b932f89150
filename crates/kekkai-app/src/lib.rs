//! Headless host for the kekkai simulation.
//!
//! Runs the engine on a fixed-rate game loop thread, forwards player
//! commands over a channel and keeps the latest snapshot for polling.

pub mod autopilot;
pub mod game_loop;
pub mod host;
pub mod logging;
pub mod state;

pub use kekkai_core as core;
