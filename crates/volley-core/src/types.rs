//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in host world space.
/// x = East, y = North, z = Up (visual height).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Euler angles used to orient an effect, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Shared clock tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Ticks run since the engine was created.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for DVec3 {
    fn from(p: Position) -> Self {
        DVec3::new(p.x, p.y, p.z)
    }
}

impl Orientation {
    /// Sentinel returned for directions with no length.
    pub const ZERO: Orientation = Orientation {
        yaw: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };

    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }
}

impl SimTime {
    /// Advance by one tick of the given length.
    pub fn advance(&mut self, interval_secs: f64) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * interval_secs;
    }
}
