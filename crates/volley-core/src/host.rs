//! Collaborators provided by the host game engine.
//!
//! The engine never owns units, terrain, or visuals. It asks the host
//! through these traits, once per call site, from the simulation thread.

use crate::enums::{AttackType, DamageType, UnitTag};
use crate::error::HostError;
use crate::ids::{EffectHandle, FactionId, UnitRef};
use crate::types::{Orientation, Position};

/// Spatial and classification queries over the host's unit population.
pub trait UnitQuery {
    /// Units whose position lies within `radius` of `(x, y)`, horizontally.
    fn find_units_in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<UnitRef>;
    fn position(&self, unit: UnitRef) -> Result<Position, HostError>;
    fn owner(&self, unit: UnitRef) -> Result<FactionId, HostError>;
    fn is_ally(&self, unit: UnitRef, faction: FactionId) -> bool;
    fn is_alive(&self, unit: UnitRef) -> bool;
    fn is_unit_type(&self, unit: UnitRef, tag: UnitTag) -> bool;
}

/// Visual effect handles.
pub trait EffectSystem {
    fn create_effect(&mut self, model: &str, x: f64, y: f64) -> EffectHandle;
    fn set_position(&mut self, handle: EffectHandle, x: f64, y: f64, z: f64);
    fn set_orientation(&mut self, handle: EffectHandle, orientation: Orientation);
    fn set_scale(&mut self, handle: EffectHandle, scale: f64);
    fn destroy_effect(&mut self, handle: EffectHandle);
}

/// Terrain level sampling.
pub trait TerrainSampler {
    /// Raw terrain level at a point, before the visual-height convention.
    fn terrain_level(&self, x: f64, y: f64) -> Result<f64, HostError>;
}

/// Damage application.
pub trait DamageSink {
    fn apply_damage(
        &mut self,
        unit: UnitRef,
        amount: f64,
        attack: AttackType,
        damage: DamageType,
    );
}

/// Everything the engine needs from the host in one bound.
pub trait Host: UnitQuery + EffectSystem + TerrainSampler + DamageSink {}

impl<T> Host for T where T: UnitQuery + EffectSystem + TerrainSampler + DamageSink {}
