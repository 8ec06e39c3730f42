//! Projectile simulation engine for volley.
//!
//! Owns the instance pool and the shared clock, advances every active
//! projectile once per tick, and talks to the host only through the
//! collaborator traits in `volley_core::host`.

pub mod collision;
pub mod effects;
pub mod engine;
pub mod instance;
pub mod orientation;
pub mod pool;
pub mod scheduler;
pub mod trajectory;

pub use engine::MissileEngine;
pub use instance::{MissileHooks, ProjectileInstance};
