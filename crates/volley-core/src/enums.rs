//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Footprint used for the hit test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionShape {
    #[default]
    Circle,
    /// Declared for host compatibility; rejected at spawn.
    Rectangle,
}

/// Attack classification forwarded to the host damage call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    #[default]
    Normal,
    Pierce,
    Siege,
    Magic,
    Chaos,
    Spells,
    Hero,
}

/// Damage classification forwarded to the host damage call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Normal,
    Magic,
    Fire,
    Lightning,
    Universal,
}

impl DamageType {
    /// Unit classification that makes a target immune to this damage type.
    pub fn immunity_tag(self) -> Option<UnitTag> {
        match self {
            DamageType::Normal => Some(UnitTag::Ethereal),
            DamageType::Magic | DamageType::Fire | DamageType::Lightning => {
                Some(UnitTag::MagicImmune)
            }
            DamageType::Universal => None,
        }
    }
}

/// Unit classifications the host can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitTag {
    Structure,
    Mechanical,
    Flying,
    Ward,
    Invulnerable,
    Ethereal,
    MagicImmune,
}

/// State of the shared clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
}

/// Why an instance left the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishCause {
    /// Travelled its full distance.
    DistanceReached,
    /// Outlived its duration.
    DurationExpired,
    /// Destroyed on request (handle or hook).
    Destroyed,
}
