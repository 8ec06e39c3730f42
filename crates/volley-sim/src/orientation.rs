//! Direction-to-Euler lookup table.
//!
//! Built once per engine. Every (elevation, azimuth) bucket pair stores the
//! yaw/pitch/roll that points an effect along the bucket's center direction,
//! so orienting a visual each tick is a normalize plus two index computations.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;

use volley_core::constants::{XY_DELTA, XY_STEPS, Z_DELTA, Z_STEPS};
use volley_core::types::Orientation;

/// Horizontal length below which a unit vector is treated as vertical.
const VERTICAL_EPSILON: f64 = 1e-9;

/// Immutable after construction.
pub struct OrientationTable {
    entries: Vec<Orientation>,
}

impl OrientationTable {
    /// Precompute all `Z_STEPS * XY_STEPS` entries.
    ///
    /// `fixed_rotation_axes` selects the host's rotation convention: when set,
    /// the heading is carried by roll instead of yaw.
    pub fn new(fixed_rotation_axes: bool) -> Self {
        let mut entries = Vec::with_capacity(Z_STEPS * XY_STEPS);
        for z in 0..Z_STEPS {
            for xy in 0..XY_STEPS {
                let dir = Self::bucket_center(z, xy);
                entries.push(euler_from_direction(dir, fixed_rotation_axes));
            }
        }
        Self { entries }
    }

    /// Orientation for an arbitrary direction vector.
    ///
    /// A zero-length (or non-finite) vector yields `Orientation::ZERO`.
    /// A vertical vector is answered exactly rather than from the table.
    pub fn lookup(&self, dx: f64, dy: f64, dz: f64) -> Orientation {
        let Some(dir) = DVec3::new(dx, dy, dz).try_normalize() else {
            return Orientation::ZERO;
        };
        if dir.x.hypot(dir.y) < VERTICAL_EPSILON {
            return vertical(dir.z);
        }
        let (z, xy) = bucket_of(dir);
        self.entries[z * XY_STEPS + xy]
    }

    /// Stored triple for a bucket pair. None if either index is out of range.
    pub fn entry(&self, z: usize, xy: usize) -> Option<Orientation> {
        if z >= Z_STEPS || xy >= XY_STEPS {
            return None;
        }
        self.entries.get(z * XY_STEPS + xy).copied()
    }

    /// Unit direction at the center of a bucket pair.
    pub fn bucket_center(z: usize, xy: usize) -> DVec3 {
        let elevation = (z as f64 + 0.5) * Z_DELTA;
        let azimuth = (xy as f64 + 0.5) * XY_DELTA;
        DVec3::new(
            elevation.cos() * azimuth.cos(),
            elevation.cos() * azimuth.sin(),
            elevation.sin(),
        )
    }

    /// Bucket pair `(elevation, azimuth)` for a direction, or `None` if it has no length.
    pub fn bucket_for(dx: f64, dy: f64, dz: f64) -> Option<(usize, usize)> {
        DVec3::new(dx, dy, dz).try_normalize().map(bucket_of)
    }
}

fn bucket_of(dir: DVec3) -> (usize, usize) {
    let azimuth = dir.y.atan2(dir.x);
    let elevation = dir.z.clamp(-1.0, 1.0).asin();
    (
        bucket_index(elevation, Z_DELTA, Z_STEPS),
        bucket_index(azimuth, XY_DELTA, XY_STEPS),
    )
}

fn bucket_index(angle: f64, delta: f64, steps: usize) -> usize {
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    ((angle.rem_euclid(TAU) / delta) as usize).min(steps - 1)
}

/// General solve for a unit direction.
fn euler_from_direction(dir: DVec3, fixed_rotation_axes: bool) -> Orientation {
    let horizontal = dir.x.hypot(dir.y);
    if horizontal < VERTICAL_EPSILON {
        return vertical(dir.z);
    }
    let pitch = -dir.z.clamp(-1.0, 1.0).asin();
    let mut heading = (dir.x / horizontal).clamp(-1.0, 1.0).acos();
    if dir.y < 0.0 {
        heading = -heading;
    }
    if fixed_rotation_axes {
        Orientation::new(0.0, pitch, heading)
    } else {
        Orientation::new(heading, pitch, 0.0)
    }
}

/// Straight up or down: the heading is undefined, so yaw and roll are zero.
fn vertical(dz: f64) -> Orientation {
    let pitch = if dz > 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
    Orientation::new(0.0, pitch, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn table() -> &'static OrientationTable {
        use std::sync::OnceLock;
        static TABLE: OnceLock<OrientationTable> = OnceLock::new();
        TABLE.get_or_init(|| OrientationTable::new(false))
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_table_size() {
        assert_eq!(table().entries.len(), XY_STEPS * Z_STEPS);
    }

    #[test]
    fn test_zero_vector_sentinel() {
        assert_eq!(table().lookup(0.0, 0.0, 0.0), Orientation::ZERO);
        assert_eq!(table().lookup(f64::NAN, 1.0, 0.0), Orientation::ZERO);
    }

    #[test]
    fn test_vertical_up_and_down() {
        let up = table().lookup(0.0, 0.0, 5.0);
        assert_eq!(up.yaw, 0.0);
        assert_eq!(up.roll, 0.0);
        assert!(close(up.pitch, -FRAC_PI_2, 1e-12), "Up pitch {}", up.pitch);

        let down = table().lookup(0.0, 0.0, -0.1);
        assert_eq!(down.yaw, 0.0);
        assert_eq!(down.roll, 0.0);
        assert!(close(down.pitch, FRAC_PI_2, 1e-12));
    }

    #[test]
    fn test_horizontal_headings() {
        // Within half an azimuth bucket of the true heading.
        let tol = XY_DELTA;
        let east = table().lookup(10.0, 0.0, 0.0);
        assert!(close(east.yaw, 0.0, tol), "East yaw {}", east.yaw);
        assert!(close(east.pitch, 0.0, Z_DELTA));

        let north = table().lookup(0.0, 3.0, 0.0);
        assert!(close(north.yaw, FRAC_PI_2, tol), "North yaw {}", north.yaw);

        let south = table().lookup(0.0, -3.0, 0.0);
        assert!(close(south.yaw, -FRAC_PI_2, tol), "South yaw {}", south.yaw);
    }

    #[test]
    fn test_climbing_direction_pitches_negative() {
        let o = table().lookup(1.0, 0.0, 1.0);
        assert!(close(o.pitch, -std::f64::consts::FRAC_PI_4, Z_DELTA));
        let o = table().lookup(1.0, 0.0, -1.0);
        assert!(close(o.pitch, std::f64::consts::FRAC_PI_4, Z_DELTA));
    }

    #[test]
    fn test_fixed_rotation_axes_moves_heading_to_roll() {
        let fixed = OrientationTable::new(true);
        let a = table().lookup(0.0, 1.0, 0.2);
        let b = fixed.lookup(0.0, 1.0, 0.2);
        assert_eq!(b.yaw, 0.0);
        assert_eq!(a.roll, 0.0);
        assert_eq!(a.yaw, b.roll);
        assert_eq!(a.pitch, b.pitch);
    }

    #[test]
    fn test_entry_out_of_range_is_none() {
        assert!(table().entry(Z_STEPS - 1, XY_STEPS - 1).is_some());
        assert_eq!(table().entry(Z_STEPS, 0), None);
        assert_eq!(table().entry(0, XY_STEPS), None);
        assert_eq!(table().entry(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn test_bucket_for_wraps_negative_angles() {
        // Slightly below the horizon, slightly clockwise of east: both wrap to the top buckets.
        let (z, xy) = OrientationTable::bucket_for(1.0, -0.001, -0.001).unwrap();
        assert_eq!(z, Z_STEPS - 1);
        assert_eq!(xy, XY_STEPS - 1);
        assert!(OrientationTable::bucket_for(0.0, 0.0, 0.0).is_none());
    }

    /// Elevation buckets whose centers lie within 90° of the horizon; only
    /// these can come out of `asin`.
    fn reachable_elevation() -> impl Strategy<Value = usize> {
        prop_oneof![0usize..=Z_STEPS / 4, (3 * Z_STEPS / 4)..Z_STEPS]
    }

    proptest! {
        #[test]
        fn prop_bucket_center_round_trip(z in reachable_elevation(), xy in 0usize..XY_STEPS) {
            let dir = OrientationTable::bucket_center(z, xy);
            prop_assert_eq!(table().lookup(dir.x, dir.y, dir.z), table().entry(z, xy).unwrap());
        }

        #[test]
        fn prop_lookup_is_scale_invariant(
            dx in -100.0f64..100.0,
            dy in -100.0f64..100.0,
            dz in -100.0f64..100.0,
            k in 0.5f64..50.0,
        ) {
            prop_assume!(dx.hypot(dy) > 1e-3);
            let a = OrientationTable::bucket_for(dx, dy, dz);
            let b = OrientationTable::bucket_for(dx * k, dy * k, dz * k);
            // Scaling can nudge a vector across a bucket edge by rounding only.
            if let (Some((za, xa)), Some((zb, xb))) = (a, b) {
                prop_assert!(za.abs_diff(zb) <= 1 || za.abs_diff(zb) == Z_STEPS - 1);
                prop_assert!(xa.abs_diff(xb) <= 1 || xa.abs_diff(xb) == XY_STEPS - 1);
            }
        }
    }
}
