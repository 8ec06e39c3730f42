//! Engine-wide configuration, fixed for the lifetime of a `MissileEngine`.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::UnitTag;
use crate::error::MissileError;

/// Host convention mapping a terrain level to a visual height:
/// `level * level_scale + level_base`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConvention {
    pub level_scale: f64,
    pub level_base: f64,
}

impl Default for TerrainConvention {
    fn default() -> Self {
        Self {
            level_scale: TERRAIN_LEVEL_SCALE,
            level_base: TERRAIN_LEVEL_BASE,
        }
    }
}

impl TerrainConvention {
    pub fn to_height(&self, level: f64) -> f64 {
        level * self.level_scale + self.level_base
    }
}

/// Configuration for constructing a `MissileEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of one shared tick in seconds.
    pub tick_interval_secs: f64,
    /// Assign the computed heading to roll instead of yaw.
    pub fixed_rotation_axes: bool,
    pub terrain: TerrainConvention,
    /// Z filter tolerance in host units.
    pub max_collision_height: f64,
    /// Default for instances that do not override it.
    pub use_z_filter: bool,
    /// Upper bound on simultaneously live instances. `None` = bounded by the id space.
    pub pool_capacity: Option<usize>,
    /// Units carrying any of these tags are never hit.
    pub untargetable_tags: Vec<UnitTag>,
    /// Where parked effect handles are moved.
    pub effect_park_position: (f64, f64),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: TICK_INTERVAL,
            fixed_rotation_axes: false,
            terrain: TerrainConvention::default(),
            max_collision_height: MAXIMUM_COLLISION_SIZE,
            use_z_filter: true,
            pool_capacity: None,
            untargetable_tags: vec![UnitTag::Ward, UnitTag::Invulnerable],
            effect_park_position: EFFECT_PARK_POSITION,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), MissileError> {
        if !(self.tick_interval_secs.is_finite() && self.tick_interval_secs > 0.0) {
            return Err(MissileError::InvalidOption {
                field: "tick_interval_secs",
                reason: format!("must be greater than zero, got {}", self.tick_interval_secs),
            });
        }
        if !(self.max_collision_height.is_finite() && self.max_collision_height >= 0.0) {
            return Err(MissileError::InvalidOption {
                field: "max_collision_height",
                reason: format!("must not be negative, got {}", self.max_collision_height),
            });
        }
        Ok(())
    }
}
