//! Enemy behavior for the kekkai simulation.
//!
//! Implements the per-archetype behavior state machine, archetype
//! profiles and the steering helpers shared with the simulation systems.

pub mod fsm;
pub mod profiles;
pub mod steering;

pub use kekkai_core as core;

#[cfg(test)]
mod tests;
