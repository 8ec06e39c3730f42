//! Hit detection against the host unit population.
//!
//! Each tick an instance asks the host for units inside its hit radius, then
//! filters them: the excluded unit, anything already damaged by this
//! instance, units outside the vertical band (when the Z filter is on), and
//! units that fail the alliance test. Committing a hit records the unit in the
//! instance's damaged set before damage is applied, so it is never hit twice.

use volley_core::config::EngineConfig;
use volley_core::enums::UnitTag;
use volley_core::host::{DamageSink, UnitQuery};
use volley_core::ids::UnitRef;

use crate::instance::ProjectileInstance;

#[derive(Debug, Clone)]
pub struct CollisionIndex {
    max_collision_height: f64,
    untargetable_tags: Vec<UnitTag>,
}

impl CollisionIndex {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_collision_height: config.max_collision_height,
            untargetable_tags: config.untargetable_tags.clone(),
        }
    }

    /// Units the instance would hit this tick, sorted and without repeats.
    pub fn query_candidates<U: UnitQuery + ?Sized>(
        &self,
        missile: &ProjectileInstance,
        units: &U,
    ) -> Vec<UnitRef> {
        let mut found = units.find_units_in_radius(
            missile.position.x,
            missile.position.y,
            missile.hit_radius,
        );
        found.sort_unstable();
        found.dedup();
        found.retain(|&unit| self.accepts(missile, units, unit));
        found
    }

    fn accepts<U: UnitQuery + ?Sized>(
        &self,
        missile: &ProjectileInstance,
        units: &U,
        unit: UnitRef,
    ) -> bool {
        if missile.exclude_entity == Some(unit) || missile.damaged.contains(&unit) {
            return false;
        }

        if missile.use_z_filter {
            match units.position(unit) {
                Ok(pos) if (pos.z - missile.position.z).abs() <= self.max_collision_height => {}
                // Out of the vertical band, or gone since the spatial query.
                _ => return false,
            }
        }

        if !units.is_alive(unit)
            || self
                .untargetable_tags
                .iter()
                .any(|&tag| units.is_unit_type(unit, tag))
        {
            return false;
        }

        if missile.ally_targeting {
            units.is_ally(unit, missile.owner)
        } else {
            let immune = missile
                .damage_type
                .immunity_tag()
                .is_some_and(|tag| units.is_unit_type(unit, tag));
            !units.is_ally(unit, missile.owner) && !immune
        }
    }

    /// Record `unit` as damaged by `missile` and apply the damage.
    ///
    /// Returns false (and applies nothing) if the unit was already damaged.
    pub fn commit<D: DamageSink + ?Sized>(
        &self,
        missile: &mut ProjectileInstance,
        unit: UnitRef,
        sink: &mut D,
    ) -> bool {
        if !missile.damaged.insert(unit) {
            return false;
        }
        sink.apply_damage(
            unit,
            missile.damage_amount,
            missile.attack_type,
            missile.damage_type,
        );
        true
    }
}
