//! Headless reference host for the volley engine.
//!
//! Provides units (hecs), terrain (heightmap grid), and a recording effect
//! system behind the collaborator traits in `volley_core::host`.

pub mod arena;
pub mod components;
pub mod effects;
pub mod terrain;
pub mod world_setup;

pub use arena::{Arena, DamageRecord};
pub use terrain::TerrainGrid;

#[cfg(test)]
mod tests;
