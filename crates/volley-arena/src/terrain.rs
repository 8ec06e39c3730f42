//! TerrainGrid: heightmap of terrain levels with bilinear queries.
//!
//! Levels are sampled at grid vertices; vertex `(row, col)` sits at
//! `(origin_x + col * cell_size, origin_y + row * cell_size)`. Points outside
//! the grid have no level, which the engine sees as a terrain failure.

use std::f64::consts::TAU;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use volley_core::error::HostError;
use volley_core::host::TerrainSampler;

#[derive(Debug, Clone)]
pub struct TerrainGrid {
    origin_x: f64,
    origin_y: f64,
    cell_size: f64,
    width: usize,
    height: usize,
    /// Terrain levels, row-major (south-to-north, west-to-east).
    levels: Vec<f32>,
}

impl TerrainGrid {
    /// Create a grid from pre-computed levels.
    /// Returns None if the level count does not match the dimensions.
    pub fn new(
        origin: (f64, f64),
        cell_size: f64,
        width: usize,
        height: usize,
        levels: Vec<f32>,
    ) -> Option<Self> {
        if width == 0 || height == 0 || levels.len() != width * height || !(cell_size > 0.0) {
            return None;
        }
        Some(Self {
            origin_x: origin.0,
            origin_y: origin.1,
            cell_size,
            width,
            height,
            levels,
        })
    }

    /// Grid of constant level. A zero dimension is treated as one.
    pub fn flat(origin: (f64, f64), cell_size: f64, width: usize, height: usize, level: f32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            origin_x: origin.0,
            origin_y: origin.1,
            cell_size: cell_size.max(f64::MIN_POSITIVE),
            width,
            height,
            levels: vec![level; width * height],
        }
    }

    /// Rolling hills: three seeded sine ridges summed over a base level.
    pub fn rolling(
        rng: &mut ChaCha8Rng,
        origin: (f64, f64),
        cell_size: f64,
        width: usize,
        height: usize,
        base_level: f32,
        amplitude: f32,
    ) -> Self {
        let mut grid = Self::flat(origin, cell_size, width, height, base_level);
        let ridges: Vec<(f64, f64, f64)> = (0..3)
            .map(|_| {
                let heading: f64 = rng.gen_range(0.0..TAU);
                let wavelength: f64 = rng.gen_range(8.0..32.0) * grid.cell_size;
                let phase: f64 = rng.gen_range(0.0..TAU);
                (heading, TAU / wavelength, phase)
            })
            .collect();

        for row in 0..grid.height {
            for col in 0..grid.width {
                let x = col as f64 * grid.cell_size;
                let y = row as f64 * grid.cell_size;
                let sum: f64 = ridges
                    .iter()
                    .map(|(heading, k, phase)| {
                        ((x * heading.cos() + y * heading.sin()) * k + phase).sin()
                    })
                    .sum();
                grid.levels[row * grid.width + col] += amplitude * (sum / 3.0) as f32;
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// World-space extent `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.origin_x,
            self.origin_y,
            self.origin_x + (self.width - 1) as f64 * self.cell_size,
            self.origin_y + (self.height - 1) as f64 * self.cell_size,
        )
    }

    /// Convert a world position to fractional grid (row, col).
    /// Returns None if outside grid bounds.
    fn world_to_grid(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let col = (x - self.origin_x) / self.cell_size;
        let row = (y - self.origin_y) / self.cell_size;
        if !(col >= 0.0 && row >= 0.0)
            || col > (self.width - 1) as f64
            || row > (self.height - 1) as f64
        {
            return None;
        }
        Some((row, col))
    }

    fn raw_level(&self, row: usize, col: usize) -> f32 {
        self.levels[row * self.width + col]
    }

    /// Level at a world position with bilinear interpolation.
    pub fn level_at(&self, x: f64, y: f64) -> Option<f64> {
        let (row, col) = self.world_to_grid(x, y)?;
        Some(self.bilinear(row, col))
    }

    fn bilinear(&self, row: f64, col: f64) -> f64 {
        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(self.height - 1);
        let c1 = (c0 + 1).min(self.width - 1);

        let fr = row - r0 as f64;
        let fc = col - c0 as f64;

        let e00 = self.raw_level(r0, c0) as f64;
        let e01 = self.raw_level(r0, c1) as f64;
        let e10 = self.raw_level(r1, c0) as f64;
        let e11 = self.raw_level(r1, c1) as f64;

        let bottom = e00 * (1.0 - fc) + e01 * fc;
        let top = e10 * (1.0 - fc) + e11 * fc;
        bottom * (1.0 - fr) + top * fr
    }
}

impl TerrainSampler for TerrainGrid {
    fn terrain_level(&self, x: f64, y: f64) -> Result<f64, HostError> {
        self.level_at(x, y)
            .ok_or(HostError::TerrainUnavailable { x, y })
    }
}
