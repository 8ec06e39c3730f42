//! Arena: a headless host for the projectile engine.
//!
//! Units live in a hecs world, terrain in a `TerrainGrid`, and effects in a
//! recording `EffectLog`. The arena implements every host collaborator trait,
//! so a `MissileEngine` can be driven against it directly.

use std::collections::HashSet;

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, warn};

use volley_core::config::TerrainConvention;
use volley_core::enums::{AttackType, DamageType, UnitTag};
use volley_core::error::HostError;
use volley_core::host::{DamageSink, EffectSystem, TerrainSampler, UnitQuery};
use volley_core::ids::{EffectHandle, FactionId, UnitRef};
use volley_core::types::{Orientation, Position};

use crate::components::*;
use crate::effects::EffectLog;
use crate::terrain::TerrainGrid;
use crate::world_setup::{self, entity_of, unit_ref, SquadSpec, UnitSpec};

/// One damage application, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageRecord {
    pub unit: UnitRef,
    pub amount: f64,
    pub attack: AttackType,
    pub damage: DamageType,
    /// Health left after the hit.
    pub remaining: f64,
}

pub struct Arena {
    pub world: World,
    pub terrain: TerrainGrid,
    pub convention: TerrainConvention,
    pub effects: EffectLog,
    /// Unordered pairs of allied factions. A faction is always allied with itself.
    alliances: HashSet<(FactionId, FactionId)>,
    damage_log: Vec<DamageRecord>,
    despawn_buffer: Vec<Entity>,
}

impl Arena {
    pub fn new(terrain: TerrainGrid, convention: TerrainConvention) -> Self {
        Self {
            world: World::new(),
            terrain,
            convention,
            effects: EffectLog::new(),
            alliances: HashSet::new(),
            damage_log: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Visual height of the terrain surface, or 0 outside the grid.
    pub fn surface_z(&self, x: f64, y: f64) -> f64 {
        self.terrain
            .level_at(x, y)
            .map_or(0.0, |level| self.convention.to_height(level))
    }

    pub fn spawn_unit(&mut self, spec: &UnitSpec) -> UnitRef {
        let surface = self.surface_z(spec.x, spec.y);
        world_setup::spawn_unit(&mut self.world, spec, surface)
    }

    pub fn spawn_squad(&mut self, rng: &mut ChaCha8Rng, squad: &SquadSpec) -> Vec<UnitRef> {
        world_setup::scatter_squad(rng, squad)
            .iter()
            .map(|spec| self.spawn_unit(spec))
            .collect()
    }

    pub fn set_allied(&mut self, a: FactionId, b: FactionId) {
        self.alliances.insert((a, b));
        self.alliances.insert((b, a));
    }

    pub fn health(&self, unit: UnitRef) -> Option<f64> {
        let entity = entity_of(unit)?;
        self.world.get::<&Health>(entity).ok().map(|h| h.current)
    }

    pub fn unit_count(&self) -> usize {
        self.world.query::<&Unit>().iter().count()
    }

    /// Units of a faction with health left.
    pub fn survivors(&self, faction: FactionId) -> usize {
        self.world
            .query::<(&Faction, &Health)>()
            .iter()
            .filter(|(_, (f, h))| f.0 == faction && h.current > 0.0)
            .count()
    }

    pub fn damage_log(&self) -> &[DamageRecord] {
        &self.damage_log
    }

    /// Despawn units with no health left. Returns how many were removed.
    pub fn cleanup_dead(&mut self) -> usize {
        self.despawn_buffer.clear();
        for (entity, health) in self.world.query_mut::<&Health>() {
            if health.current <= 0.0 {
                self.despawn_buffer.push(entity);
            }
        }
        let removed = self.despawn_buffer.len();
        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
        removed
    }

    fn entity(&self, unit: UnitRef) -> Result<Entity, HostError> {
        entity_of(unit)
            .filter(|e| self.world.contains(*e))
            .ok_or(HostError::UnknownUnit(unit.0))
    }
}

impl UnitQuery for Arena {
    fn find_units_in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<UnitRef> {
        let center = DVec2::new(x, y);
        let mut found: Vec<UnitRef> = self
            .world
            .query::<(&Position, &Unit)>()
            .iter()
            .filter(|(_, (pos, _))| DVec2::new(pos.x, pos.y).distance(center) <= radius)
            .map(|(entity, _)| unit_ref(entity))
            .collect();
        found.sort_unstable();
        found
    }

    fn position(&self, unit: UnitRef) -> Result<Position, HostError> {
        let entity = self.entity(unit)?;
        self.world
            .get::<&Position>(entity)
            .map(|p| *p)
            .map_err(|_| HostError::UnknownUnit(unit.0))
    }

    fn owner(&self, unit: UnitRef) -> Result<FactionId, HostError> {
        let entity = self.entity(unit)?;
        self.world
            .get::<&Faction>(entity)
            .map(|f| f.0)
            .map_err(|_| HostError::UnknownUnit(unit.0))
    }

    fn is_ally(&self, unit: UnitRef, faction: FactionId) -> bool {
        match self.owner(unit) {
            Ok(owner) => owner == faction || self.alliances.contains(&(owner, faction)),
            Err(_) => false,
        }
    }

    fn is_alive(&self, unit: UnitRef) -> bool {
        self.health(unit).is_some_and(|h| h > 0.0)
    }

    fn is_unit_type(&self, unit: UnitRef, tag: UnitTag) -> bool {
        let Ok(entity) = self.entity(unit) else {
            return false;
        };
        self.world
            .get::<&Tags>(entity)
            .is_ok_and(|tags| tags.0.contains(&tag))
    }
}

impl DamageSink for Arena {
    fn apply_damage(&mut self, unit: UnitRef, amount: f64, attack: AttackType, damage: DamageType) {
        let Ok(entity) = self.entity(unit) else {
            warn!("Damage to missing unit {}", unit.0);
            return;
        };
        let Ok(mut health) = self.world.get::<&mut Health>(entity) else {
            return;
        };
        health.current = (health.current - amount).max(0.0);
        let remaining = health.current;
        if remaining <= 0.0 {
            debug!("Unit {} destroyed", unit.0);
        }
        drop(health);
        self.damage_log.push(DamageRecord {
            unit,
            amount,
            attack,
            damage,
            remaining,
        });
    }
}

impl TerrainSampler for Arena {
    fn terrain_level(&self, x: f64, y: f64) -> Result<f64, HostError> {
        self.terrain.terrain_level(x, y)
    }
}

impl EffectSystem for Arena {
    fn create_effect(&mut self, model: &str, x: f64, y: f64) -> EffectHandle {
        self.effects.create_effect(model, x, y)
    }

    fn set_position(&mut self, handle: EffectHandle, x: f64, y: f64, z: f64) {
        self.effects.set_position(handle, x, y, z);
    }

    fn set_orientation(&mut self, handle: EffectHandle, orientation: Orientation) {
        self.effects.set_orientation(handle, orientation);
    }

    fn set_scale(&mut self, handle: EffectHandle, scale: f64) {
        self.effects.set_scale(handle, scale);
    }

    fn destroy_effect(&mut self, handle: EffectHandle) {
        self.effects.destroy_effect(handle);
    }
}
