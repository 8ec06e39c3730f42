//! Tests for the arena host: unit queries, damage, squads, and effects.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use volley_core::config::TerrainConvention;
use volley_core::enums::*;
use volley_core::error::HostError;
use volley_core::host::{DamageSink, EffectSystem, TerrainSampler, UnitQuery};
use volley_core::ids::{FactionId, UnitRef};
use volley_core::types::Orientation;

use crate::arena::Arena;
use crate::terrain::TerrainGrid;
use crate::world_setup::{SquadSpec, UnitSpec, FLYING_ALTITUDE};

const RED: FactionId = FactionId(1);
const BLUE: FactionId = FactionId(2);
const GREEN: FactionId = FactionId(3);

/// 2 km square of level-2 terrain (height 0) centered on the origin.
fn flat_arena() -> Arena {
    let terrain = TerrainGrid::flat((-1000.0, -1000.0), 100.0, 21, 21, 2.0);
    Arena::new(terrain, TerrainConvention::default())
}

fn unit(x: f64, y: f64, faction: FactionId) -> UnitSpec {
    UnitSpec {
        x,
        y,
        faction,
        health: 300.0,
        tags: Vec::new(),
        altitude: 0.0,
    }
}

// ---- Queries ----

#[test]
fn test_find_units_in_radius() {
    let mut arena = flat_arena();
    let near = arena.spawn_unit(&unit(10.0, 0.0, RED));
    let edge = arena.spawn_unit(&unit(0.0, 50.0, RED));
    let far = arena.spawn_unit(&unit(200.0, 0.0, BLUE));

    let found = arena.find_units_in_radius(0.0, 0.0, 50.0);
    assert!(found.contains(&near));
    assert!(found.contains(&edge), "Radius is inclusive");
    assert!(!found.contains(&far));
    assert_eq!(found.len(), 2);
}

#[test]
fn test_position_and_owner() {
    let mut arena = flat_arena();
    let u = arena.spawn_unit(&unit(30.0, -40.0, BLUE));
    let pos = arena.position(u).unwrap();
    assert_eq!((pos.x, pos.y, pos.z), (30.0, -40.0, 0.0));
    assert_eq!(arena.owner(u), Ok(BLUE));
}

#[test]
fn test_unknown_unit_errors() {
    let arena = flat_arena();
    let ghost = UnitRef(u64::MAX);
    assert_eq!(arena.position(ghost), Err(HostError::UnknownUnit(u64::MAX)));
    assert!(arena.owner(UnitRef(0)).is_err());
    assert!(!arena.is_alive(ghost));
    assert!(!arena.is_ally(ghost, RED));
    assert!(!arena.is_unit_type(ghost, UnitTag::Ward));
}

#[test]
fn test_alliances() {
    let mut arena = flat_arena();
    let r = arena.spawn_unit(&unit(0.0, 0.0, RED));
    assert!(arena.is_ally(r, RED));
    assert!(!arena.is_ally(r, GREEN));
    arena.set_allied(GREEN, RED);
    assert!(arena.is_ally(r, GREEN));
    assert!(!arena.is_ally(r, BLUE));
}

#[test]
fn test_unit_tags() {
    let mut arena = flat_arena();
    let ward = arena.spawn_unit(&UnitSpec {
        tags: vec![UnitTag::Ward],
        ..unit(0.0, 0.0, RED)
    });
    assert!(arena.is_unit_type(ward, UnitTag::Ward));
    assert!(!arena.is_unit_type(ward, UnitTag::Structure));
}

#[test]
fn test_altitude_raises_unit_above_surface() {
    let terrain = TerrainGrid::flat((-1000.0, -1000.0), 100.0, 21, 21, 3.0);
    let mut arena = Arena::new(terrain, TerrainConvention::default());
    let flyer = arena.spawn_unit(&UnitSpec {
        altitude: 100.0,
        ..unit(0.0, 0.0, RED)
    });
    // Level 3 is height 128.
    assert_eq!(arena.position(flyer).unwrap().z, 228.0);
}

// ---- Damage ----

#[test]
fn test_damage_reduces_health_and_kills() {
    let mut arena = flat_arena();
    let u = arena.spawn_unit(&unit(0.0, 0.0, BLUE));
    arena.apply_damage(u, 100.0, AttackType::Siege, DamageType::Fire);
    assert_eq!(arena.health(u), Some(200.0));
    assert!(arena.is_alive(u));

    arena.apply_damage(u, 500.0, AttackType::Siege, DamageType::Fire);
    assert_eq!(arena.health(u), Some(0.0));
    assert!(!arena.is_alive(u));

    let log = arena.damage_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].attack, AttackType::Siege);
    assert_eq!(log[1].remaining, 0.0);
    assert_eq!(arena.survivors(BLUE), 0);
}

#[test]
fn test_cleanup_dead_despawns() {
    let mut arena = flat_arena();
    let a = arena.spawn_unit(&unit(0.0, 0.0, BLUE));
    arena.spawn_unit(&unit(10.0, 0.0, BLUE));
    arena.apply_damage(a, 1000.0, AttackType::Normal, DamageType::Normal);

    assert_eq!(arena.cleanup_dead(), 1);
    assert_eq!(arena.unit_count(), 1);
    assert!(arena.position(a).is_err());
    assert_eq!(arena.cleanup_dead(), 0);
}

#[test]
fn test_damage_to_missing_unit_is_ignored() {
    let mut arena = flat_arena();
    arena.apply_damage(UnitRef(u64::MAX), 10.0, AttackType::Normal, DamageType::Normal);
    assert!(arena.damage_log().is_empty());
}

// ---- Squads ----

#[test]
fn test_squad_scatter_is_seeded_and_bounded() {
    let squad = SquadSpec {
        faction: BLUE,
        center: (200.0, -100.0),
        radius: 150.0,
        count: 25,
        health: 80.0,
        tags: vec![UnitTag::Flying],
    };

    let mut a = flat_arena();
    let mut b = flat_arena();
    let units_a = a.spawn_squad(&mut ChaCha8Rng::seed_from_u64(42), &squad);
    let units_b = b.spawn_squad(&mut ChaCha8Rng::seed_from_u64(42), &squad);
    assert_eq!(units_a.len(), 25);
    assert_eq!(a.survivors(BLUE), 25);

    for (ua, ub) in units_a.iter().zip(&units_b) {
        let pa = a.position(*ua).unwrap();
        let pb = b.position(*ub).unwrap();
        assert_eq!(pa, pb, "Same seed, same placement");
        assert!((pa.x - 200.0).hypot(pa.y + 100.0) <= 150.0 + 1e-9);
        assert_eq!(pa.z, FLYING_ALTITUDE);
        assert_eq!(a.health(*ua), Some(80.0));
    }
}

// ---- Terrain and effects ----

#[test]
fn test_terrain_sampler_delegates_to_grid() {
    let arena = flat_arena();
    assert_eq!(arena.terrain_level(0.0, 0.0), Ok(2.0));
    assert!(arena.terrain_level(5000.0, 0.0).is_err());
    assert_eq!(arena.surface_z(5000.0, 0.0), 0.0);
}

#[test]
fn test_effect_log_records_state() {
    let mut arena = flat_arena();
    let h = arena.create_effect("Bolt.mdl", 1.0, 2.0);
    arena.set_position(h, 3.0, 4.0, 5.0);
    arena.set_scale(h, 0.5);
    arena.set_orientation(h, Orientation::new(0.1, 0.2, 0.3));

    let state = arena.effects.get(h).unwrap();
    assert_eq!(state.model, "Bolt.mdl");
    assert_eq!((state.position.x, state.position.z), (3.0, 5.0));
    assert_eq!(state.scale, 0.5);
    assert_eq!(state.orientation.roll, 0.3);

    arena.destroy_effect(h);
    arena.destroy_effect(h);
    assert!(arena.effects.get(h).is_none());
    assert_eq!(arena.effects.created, 1);
    assert_eq!(arena.effects.destroyed, 1);
    assert_eq!(arena.effects.live_count(), 0);
}
