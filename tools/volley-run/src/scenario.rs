//! Scenario files: arena layout plus a schedule of volleys.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use volley_arena::world_setup::{SquadSpec, UnitSpec};
use volley_arena::{Arena, TerrainGrid};
use volley_core::config::EngineConfig;
use volley_core::ids::UnitRef;
use volley_core::options::MissileOptions;
use volley_sim::trajectory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub terrain: TerrainSpec,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub squads: Vec<SquadSpec>,
    #[serde(default)]
    pub volleys: Vec<Volley>,
    /// Hard stop for the run loop.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

fn default_max_ticks() -> u64 {
    3200
}

/// Square terrain grid centered on the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSpec {
    pub size: usize,
    pub cell_size: f64,
    pub base_level: f32,
    /// Zero for flat ground.
    pub amplitude: f32,
}

impl Default for TerrainSpec {
    fn default() -> Self {
        Self {
            size: 129,
            cell_size: 64.0,
            base_level: 2.0,
            amplitude: 0.0,
        }
    }
}

/// A fan of missiles launched from one unit on one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volley {
    /// Index into `Scenario::units`.
    pub source: usize,
    /// Loop tick on which to fire.
    #[serde(default)]
    pub at_tick: u64,
    pub target: (f64, f64),
    #[serde(default = "default_count")]
    pub count: usize,
    /// Total fan width in degrees, centered on the target bearing.
    #[serde(default)]
    pub spread: f64,
    #[serde(default)]
    pub options: MissileOptions,
}

fn default_count() -> usize {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parse {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(text).context("scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        self.engine.validate().context("engine config")?;
        for (i, volley) in self.volleys.iter().enumerate() {
            if volley.source >= self.units.len() {
                bail!(
                    "volley {i}: source {} is not one of the {} placed units",
                    volley.source,
                    self.units.len()
                );
            }
            volley
                .options
                .validate()
                .with_context(|| format!("volley {i} options"))?;
        }
        Ok(())
    }

    /// Build the arena. Returns it with the placed units' refs, in file order.
    pub fn build_arena(&self, rng: &mut ChaCha8Rng) -> (Arena, Vec<UnitRef>) {
        let t = &self.terrain;
        let half = (t.size.saturating_sub(1)) as f64 * t.cell_size / 2.0;
        let origin = (-half, -half);
        let grid = if t.amplitude == 0.0 {
            TerrainGrid::flat(origin, t.cell_size, t.size, t.size, t.base_level)
        } else {
            TerrainGrid::rolling(rng, origin, t.cell_size, t.size, t.size, t.base_level, t.amplitude)
        };

        let mut arena = Arena::new(grid, self.engine.terrain);
        let placed = self.units.iter().map(|u| arena.spawn_unit(u)).collect();
        for squad in &self.squads {
            arena.spawn_squad(rng, squad);
        }
        (arena, placed)
    }

    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

impl Volley {
    /// Landing points for each missile in the fan, spread evenly across `spread`.
    pub fn landing_points(&self, from: (f64, f64)) -> Vec<(f64, f64)> {
        let center = trajectory::angle_between(from.0, from.1, self.target.0, self.target.1);
        let reach = (self.target.0 - from.0).hypot(self.target.1 - from.1).max(1.0);
        (0..self.count)
            .map(|i| {
                let offset = if self.count > 1 {
                    self.spread * (i as f64 / (self.count - 1) as f64 - 0.5)
                } else {
                    0.0
                };
                trajectory::project(from.0, from.1, reach, center + offset)
            })
            .collect()
    }
}

/// Scenario printed by `volley-run example`.
pub const EXAMPLE: &str = r#"{
  "seed": 7,
  "terrain": { "size": 65, "cell_size": 64.0, "base_level": 2.0, "amplitude": 0.5 },
  "units": [
    { "x": 0.0, "y": 0.0, "faction": 1, "health": 1000.0 }
  ],
  "squads": [
    { "faction": 2, "center": [500.0, 0.0], "radius": 120.0, "count": 12, "health": 150.0 },
    { "faction": 2, "center": [0.0, 450.0], "radius": 80.0, "count": 6, "health": 90.0,
      "tags": ["Flying"] }
  ],
  "volleys": [
    { "source": 0, "at_tick": 0, "target": [500.0, 0.0], "count": 5, "spread": 30.0 },
    { "source": 0, "at_tick": 32, "target": [0.0, 450.0], "count": 3, "spread": 10.0,
      "options": { "use_z_filter": false, "damage_type": "Fire", "recyclable": false } },
    { "source": 0, "at_tick": 64, "target": [500.0, 0.0], "count": 5, "spread": 40.0,
      "options": { "distance": 900.0, "duration": 2.0, "turn_rate": 15.0 } }
  ]
}"#;
