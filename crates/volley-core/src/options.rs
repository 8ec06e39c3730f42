//! Per-spawn configuration.
//!
//! Every field has a documented default so callers only name what they change.
//! Unknown fields are rejected when options are parsed from data.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{AttackType, CollisionShape, DamageType};
use crate::error::MissileError;
use crate::ids::UnitRef;

/// Options recognized by `MissileEngine::spawn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MissileOptions {
    /// Distance to travel before finishing (default 600).
    pub distance: f64,
    /// Seconds to cover `distance` (default 1.5).
    pub duration: f64,
    /// Hit test radius around the projectile (default 65).
    pub hit_radius: f64,
    /// Whether the projectile damages anything at all (default true).
    pub collides: bool,
    /// Hit allies of the owner instead of enemies (default false).
    pub ally_targeting: bool,
    /// A unit that can never be hit by this projectile.
    pub exclude_entity: Option<UnitRef>,
    /// Optional unit of interest, read by steering hooks.
    pub target: Option<UnitRef>,
    /// Damage per hit (default 100).
    pub damage_amount: f64,
    pub attack_type: AttackType,
    pub damage_type: DamageType,
    /// Model path passed to the host effect system.
    pub effect_model: String,
    /// Visual height above terrain (default 60).
    pub height_offset: f64,
    /// Effect scale (default 1.0).
    pub scale: f64,
    /// Speed change in units/s² (default 0, off).
    pub acceleration: f64,
    /// Heading change in degrees/s (default 0, off).
    pub turn_rate: f64,
    /// Park the effect for reuse instead of destroying it (default true).
    pub recyclable: bool,
    pub collision_shape: CollisionShape,
    /// Per-spawn override of the engine's Z filter setting.
    pub use_z_filter: Option<bool>,
    /// Opaque caller payload.
    pub user_data: u64,
}

impl Default for MissileOptions {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            duration: DEFAULT_DURATION,
            hit_radius: DEFAULT_HIT_RADIUS,
            collides: true,
            ally_targeting: false,
            exclude_entity: None,
            target: None,
            damage_amount: DEFAULT_DAMAGE,
            attack_type: AttackType::default(),
            damage_type: DamageType::default(),
            effect_model: DEFAULT_EFFECT_MODEL.to_string(),
            height_offset: DEFAULT_HEIGHT_OFFSET,
            scale: DEFAULT_SCALE,
            acceleration: 0.0,
            turn_rate: 0.0,
            recyclable: true,
            collision_shape: CollisionShape::Circle,
            use_z_filter: None,
            user_data: 0,
        }
    }
}

impl MissileOptions {
    /// Check ranges before an instance is created from these options.
    pub fn validate(&self) -> Result<(), MissileError> {
        positive("distance", self.distance)?;
        positive("duration", self.duration)?;
        non_negative("hit_radius", self.hit_radius)?;
        non_negative("damage_amount", self.damage_amount)?;
        non_negative("scale", self.scale)?;
        finite("height_offset", self.height_offset)?;
        finite("acceleration", self.acceleration)?;
        finite("turn_rate", self.turn_rate)?;

        if self.collision_shape != CollisionShape::Circle {
            return Err(MissileError::UnsupportedCollisionShape(
                self.collision_shape,
            ));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), MissileError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MissileError::InvalidOption {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), MissileError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(MissileError::InvalidOption {
            field,
            reason: format!("must be greater than zero, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), MissileError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(MissileError::InvalidOption {
            field,
            reason: format!("must not be negative, got {value}"),
        })
    }
}
