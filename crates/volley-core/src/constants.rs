//! Simulation constants and tuning parameters.

/// Shared clock rate (Hz).
pub const TICK_RATE: u32 = 32;

/// Seconds per tick.
pub const TICK_INTERVAL: f64 = 1.0 / TICK_RATE as f64;

/// Most ticks a single `accumulate` call may report. Time beyond this is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 4;

// --- Orientation table ---

/// Azimuth buckets covering one full turn (~0.857° each).
pub const XY_STEPS: usize = 420;

/// Elevation buckets covering one full turn (~1.33° each).
pub const Z_STEPS: usize = 270;

/// Radians per azimuth bucket.
pub const XY_DELTA: f64 = std::f64::consts::TAU / XY_STEPS as f64;

/// Radians per elevation bucket.
pub const Z_DELTA: f64 = std::f64::consts::TAU / Z_STEPS as f64;

// --- Terrain ---

/// Host units per terrain level.
pub const TERRAIN_LEVEL_SCALE: f64 = 128.0;

/// Height of terrain level zero in host units.
pub const TERRAIN_LEVEL_BASE: f64 = -256.0;

// --- Collision ---

/// Largest vertical gap at which a unit can still be hit when the Z filter is on.
pub const MAXIMUM_COLLISION_SIZE: f64 = 197.0;

/// Relative slack applied to the distance termination check.
pub const DISTANCE_TOLERANCE: f64 = 1e-9;

// --- Spawn defaults ---

pub const DEFAULT_DISTANCE: f64 = 600.0;

/// Seconds.
pub const DEFAULT_DURATION: f64 = 1.5;

pub const DEFAULT_HIT_RADIUS: f64 = 65.0;

pub const DEFAULT_DAMAGE: f64 = 100.0;

/// Height above terrain at which the visual flies.
pub const DEFAULT_HEIGHT_OFFSET: f64 = 60.0;

pub const DEFAULT_SCALE: f64 = 1.0;

pub const DEFAULT_EFFECT_MODEL: &str = "Abilities\\Weapons\\RocketMissile\\RocketMissile.mdl";

/// Where recycled effect handles wait between uses.
pub const EFFECT_PARK_POSITION: (f64, f64) = (-32_000.0, -32_000.0);
