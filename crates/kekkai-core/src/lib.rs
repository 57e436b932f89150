//! Core types and definitions for the kekkai combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshots, feedback events, mode configuration
//! and constants. It has no dependency on any runtime or renderer.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
