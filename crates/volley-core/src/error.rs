//! Error types surfaced by spawning and by host collaborators.

use thiserror::Error;

use crate::enums::CollisionShape;

/// Errors returned synchronously from `spawn`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissileError {
    /// An option was out of range.
    #[error("invalid option `{field}`: {reason}")]
    InvalidOption {
        /// Option name as it appears in the options struct.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The collision shape has no hit test.
    #[error("collision shape {0:?} is not supported")]
    UnsupportedCollisionShape(CollisionShape),
    /// No free slot and no room to grow.
    #[error("instance pool exhausted: capacity {capacity}")]
    PoolExhausted { capacity: usize },
}

/// Failures reported by the host binding layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("terrain height unavailable at ({x}, {y})")]
    TerrainUnavailable { x: f64, y: f64 },
    #[error("unit {0} does not exist")]
    UnknownUnit(u64),
}
