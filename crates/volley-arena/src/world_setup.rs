//! Unit spawn factories for populating an arena.

use std::f64::consts::TAU;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use volley_core::enums::UnitTag;
use volley_core::ids::{FactionId, UnitRef};
use volley_core::types::Position;

use crate::components::*;

/// A single unit placed by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub x: f64,
    pub y: f64,
    pub faction: FactionId,
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default)]
    pub tags: Vec<UnitTag>,
    /// Height above the terrain surface.
    #[serde(default)]
    pub altitude: f64,
}

/// A group of units scattered uniformly over a disc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadSpec {
    pub faction: FactionId,
    pub center: (f64, f64),
    pub radius: f64,
    pub count: usize,
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default)]
    pub tags: Vec<UnitTag>,
}

fn default_health() -> f64 {
    500.0
}

/// Map a hecs entity to the opaque reference handed to the engine.
pub fn unit_ref(entity: hecs::Entity) -> UnitRef {
    UnitRef(entity.to_bits().get())
}

/// Inverse of `unit_ref`. None for a value no entity could have produced.
pub fn entity_of(unit: UnitRef) -> Option<hecs::Entity> {
    hecs::Entity::from_bits(unit.0)
}

/// Spawn one unit at `surface_z` plus its altitude.
pub fn spawn_unit(world: &mut World, spec: &UnitSpec, surface_z: f64) -> UnitRef {
    let entity = world.spawn((
        Unit,
        Position::new(spec.x, spec.y, surface_z + spec.altitude),
        Faction(spec.faction),
        Health {
            current: spec.health,
        },
        Tags(spec.tags.clone()),
    ));
    unit_ref(entity)
}

/// Pick `count` unit placements for a squad. Heights are filled in by the caller.
pub fn scatter_squad(rng: &mut ChaCha8Rng, squad: &SquadSpec) -> Vec<UnitSpec> {
    (0..squad.count)
        .map(|_| {
            // sqrt keeps the density uniform over the disc.
            let bearing: f64 = rng.gen_range(0.0..TAU);
            let range = squad.radius * rng.gen::<f64>().sqrt();
            UnitSpec {
                x: squad.center.0 + range * bearing.cos(),
                y: squad.center.1 + range * bearing.sin(),
                faction: squad.faction,
                health: squad.health,
                tags: squad.tags.clone(),
                altitude: if squad.tags.contains(&UnitTag::Flying) {
                    FLYING_ALTITUDE
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Altitude given to squad members tagged `Flying`.
pub const FLYING_ALTITUDE: f64 = 240.0;
