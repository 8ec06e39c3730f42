//! Engine driven against the arena host: hecs units, grid terrain, effect log.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use volley_arena::world_setup::{SquadSpec, UnitSpec};
use volley_arena::{Arena, TerrainGrid};
use volley_core::config::{EngineConfig, TerrainConvention};
use volley_core::constants::DEFAULT_EFFECT_MODEL;
use volley_core::enums::{AttackType, DamageType, FinishCause, SchedulerState};
use volley_core::events::MissileEvent;
use volley_core::host::DamageSink;
use volley_core::ids::{FactionId, UnitRef};
use volley_core::options::MissileOptions;
use volley_sim::MissileEngine;

const RED: FactionId = FactionId(1);
const BLUE: FactionId = FactionId(2);

fn flat_arena() -> Arena {
    let terrain = TerrainGrid::flat((-1000.0, -1000.0), 100.0, 21, 21, 2.0);
    Arena::new(terrain, TerrainConvention::default())
}

fn spawn_source(arena: &mut Arena) -> UnitRef {
    arena.spawn_unit(&UnitSpec {
        x: 0.0,
        y: 0.0,
        faction: RED,
        health: 1000.0,
        tags: Vec::new(),
        altitude: 0.0,
    })
}

fn blue_squad(count: usize) -> SquadSpec {
    SquadSpec {
        faction: BLUE,
        center: (400.0, 0.0),
        radius: 60.0,
        count,
        health: 80.0,
        tags: Vec::new(),
    }
}

fn run_to_idle(engine: &mut MissileEngine, arena: &mut Arena) -> Vec<MissileEvent> {
    let mut events = Vec::new();
    for _ in 0..1000 {
        let report = engine.tick(arena);
        events.extend(report.events);
        if engine.scheduler_state() == SchedulerState::Stopped {
            return events;
        }
    }
    panic!("Engine never went idle");
}

#[test]
fn test_volley_wipes_squad_once() {
    let mut arena = flat_arena();
    let source = spawn_source(&mut arena);
    let squad = arena.spawn_squad(&mut ChaCha8Rng::seed_from_u64(1), &blue_squad(5));
    let mut engine = MissileEngine::new(EngineConfig::default()).unwrap();

    for _ in 0..3 {
        engine
            .spawn(&mut arena, source, 1000.0, 0.0, MissileOptions::default())
            .unwrap();
    }
    let events = run_to_idle(&mut engine, &mut arena);

    assert_eq!(arena.survivors(BLUE), 0);
    // The first missile kills every unit; later ones skip the dead.
    assert_eq!(arena.damage_log().len(), 5);
    for unit in &squad {
        assert_eq!(arena.health(*unit), Some(0.0));
    }
    let finishes = events
        .iter()
        .filter(|e| matches!(e, MissileEvent::Finished { cause: FinishCause::DistanceReached, .. }))
        .count();
    assert_eq!(finishes, 3);
    assert_eq!(engine.time().tick, 48);
}

#[test]
fn test_effects_parked_and_reused() {
    let mut arena = flat_arena();
    let source = spawn_source(&mut arena);
    let mut engine = MissileEngine::new(EngineConfig::default()).unwrap();

    for _ in 0..3 {
        engine
            .spawn(&mut arena, source, 0.0, 1000.0, MissileOptions::default())
            .unwrap();
    }
    run_to_idle(&mut engine, &mut arena);
    assert_eq!(arena.effects.created, 3);
    assert_eq!(arena.effects.live_count(), 3, "Parked handles stay alive");
    assert_eq!(engine.parked_effects(DEFAULT_EFFECT_MODEL), 3);

    for _ in 0..3 {
        engine
            .spawn(&mut arena, source, 0.0, -1000.0, MissileOptions::default())
            .unwrap();
    }
    assert_eq!(arena.effects.created, 3);
    assert_eq!(engine.parked_effects(DEFAULT_EFFECT_MODEL), 0);

    engine.clear(&mut arena);
    assert_eq!(arena.effects.live_count(), 0);
}

#[test]
fn test_height_tracks_rolling_terrain() {
    let terrain = TerrainGrid::rolling(
        &mut ChaCha8Rng::seed_from_u64(9),
        (-1000.0, -1000.0),
        50.0,
        41,
        41,
        2.0,
        0.5,
    );
    let mut arena = Arena::new(terrain, TerrainConvention::default());
    let source = spawn_source(&mut arena);
    let mut engine = MissileEngine::new(EngineConfig::default()).unwrap();
    let id = engine
        .spawn(&mut arena, source, 700.0, 300.0, MissileOptions::default())
        .unwrap();

    for _ in 0..47 {
        engine.tick(&mut arena);
        let m = engine.get(id).unwrap();
        let expected = arena.surface_z(m.position.x, m.position.y) + m.height_offset;
        assert!((m.position.z - expected).abs() < 1e-9);
    }
}

#[test]
fn test_flight_off_the_map_keeps_last_height() {
    let terrain = TerrainGrid::flat((-1000.0, -1000.0), 100.0, 21, 21, 3.0);
    let mut arena = Arena::new(terrain, TerrainConvention::default());
    let source = spawn_source(&mut arena);
    let mut engine = MissileEngine::new(EngineConfig::default()).unwrap();
    let id = engine
        .spawn(
            &mut arena,
            source,
            1000.0,
            0.0,
            MissileOptions {
                distance: 1500.0,
                duration: 3.0,
                ..Default::default()
            },
        )
        .unwrap();

    let mut last = None;
    for _ in 0..95 {
        engine.tick(&mut arena);
        last = engine.get(id).map(|m| m.position);
    }
    let pos = last.unwrap();
    assert!(pos.x > 1000.0, "Past the east edge at {}", pos.x);
    // Level 3 is height 128.
    assert_eq!(pos.z, 128.0 + 60.0);
    let events = run_to_idle(&mut engine, &mut arena);
    assert!(events
        .iter()
        .any(|e| matches!(e, MissileEvent::Finished { id: f, .. } if *f == id)));
}

#[test]
fn test_units_despawned_mid_flight() {
    let mut arena = flat_arena();
    let source = spawn_source(&mut arena);
    let squad = arena.spawn_squad(&mut ChaCha8Rng::seed_from_u64(3), &blue_squad(4));
    let mut engine = MissileEngine::new(EngineConfig::default()).unwrap();
    engine
        .spawn(&mut arena, source, 1000.0, 0.0, MissileOptions::default())
        .unwrap();

    for _ in 0..10 {
        engine.tick(&mut arena);
    }
    for unit in &squad {
        arena.apply_damage(*unit, 1000.0, AttackType::Normal, DamageType::Normal);
    }
    assert_eq!(arena.cleanup_dead(), 4);
    run_to_idle(&mut engine, &mut arena);
    assert_eq!(arena.unit_count(), 1);
}
