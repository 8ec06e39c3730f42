//! Core types and definitions for the volley projectile simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! ids, geometry, spawn options, engine configuration, events, snapshots,
//! errors, and the traits the host game engine implements.
//! It contains no simulation logic.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod host;
pub mod ids;
pub mod options;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
