//! Trajectory math: headings, polar projection, terrain height, and the
//! per-tick movement step.
//!
//! Angles are degrees on the ground plane, 0 = +x (East), counter-clockwise.

use glam::DVec3;
use tracing::warn;

use volley_core::config::TerrainConvention;
use volley_core::error::HostError;
use volley_core::host::TerrainSampler;

use crate::instance::ProjectileInstance;

/// Heading from `(x1, y1)` to `(x2, y2)` in degrees, in (-180, 180].
pub fn angle_between(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (y2 - y1).atan2(x2 - x1).to_degrees()
}

/// Point `distance` away from `(x, y)` along `angle_degrees`.
pub fn project(x: f64, y: f64, distance: f64, angle_degrees: f64) -> (f64, f64) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (x + distance * cos, y + distance * sin)
}

/// Visual height of the terrain at a point under the host's level convention.
pub fn step_height<T: TerrainSampler + ?Sized>(
    terrain: &T,
    convention: &TerrainConvention,
    x: f64,
    y: f64,
) -> Result<f64, HostError> {
    terrain
        .terrain_level(x, y)
        .map(|level| convention.to_height(level))
}

/// Move one instance by one tick. Returns the displacement.
///
/// If the terrain cannot be sampled the instance keeps its last terrain height.
pub fn advance<T: TerrainSampler + ?Sized>(
    missile: &mut ProjectileInstance,
    terrain: &T,
    convention: &TerrainConvention,
    interval_secs: f64,
) -> DVec3 {
    let before = DVec3::from(missile.position);

    missile.distance_traveled += missile.speed;
    let (x, y) = project(
        missile.position.x,
        missile.position.y,
        missile.speed,
        missile.angle,
    );

    match step_height(terrain, convention, x, y) {
        Ok(z) => missile.terrain_z = z,
        Err(err) => {
            warn!("{}: {}, keeping last terrain height", missile.id, err);
        }
    }

    missile.position.x = x;
    missile.position.y = y;
    missile.position.z = missile.terrain_z + missile.height_offset;

    missile.ticks_alive += 1;
    missile.elapsed_secs = missile.ticks_alive as f64 * interval_secs;

    if missile.acceleration != 0.0 {
        missile.speed = (missile.speed + missile.acceleration).max(0.0);
    }
    if missile.turn_rate != 0.0 {
        missile.angle = (missile.angle + missile.turn_rate).rem_euclid(360.0);
    }

    DVec3::from(missile.position) - before
}
