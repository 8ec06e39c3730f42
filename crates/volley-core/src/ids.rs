//! Identifiers for instances, host units, factions, and effects.

use serde::{Deserialize, Serialize};

/// Generation-checked handle to a projectile instance.
///
/// `index` is the pool slot and is reused after recycling; `generation`
/// changes on every release so a stale handle never reaches the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    pub index: u32,
    pub generation: u32,
}

impl InstanceId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{}g{}", self.index, self.generation)
    }
}

/// Opaque reference to a host unit. Never owns the unit's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRef(pub u64);

/// Owning player or team of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// Host handle to a spawned visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectHandle(pub u64);
