//! Per-tick systems over the simulation context.
//!
//! Systems are free functions taking `&mut SimContext`. They do not own
//! state; everything lives in the context and its entity registry.

pub mod aim;
pub mod barrier;
pub mod behavior;
pub mod combat;
pub mod deferred;
pub mod hazards;
pub mod pickups;
pub mod player;
pub mod snapshot;
