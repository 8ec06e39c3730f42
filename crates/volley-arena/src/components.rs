//! ECS components for arena units.
//!
//! Components are plain data structs with no methods.
//! Units also carry a `volley_core::types::Position`.

use serde::{Deserialize, Serialize};

use volley_core::enums::UnitTag;
use volley_core::ids::FactionId;

/// Marker for entities that projectiles can query and damage.
#[derive(Debug, Clone, Copy)]
pub struct Unit;

/// Owning faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction(pub FactionId);

/// Hit points left. A unit at zero is dead until `cleanup_dead` despawns it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
}

/// Classifications answered by `is_unit_type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tags(pub Vec<UnitTag>);
