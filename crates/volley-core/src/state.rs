//! Engine snapshot: the visible state of every live instance.

use serde::{Deserialize, Serialize};

use crate::enums::SchedulerState;
use crate::ids::{FactionId, InstanceId};
use crate::types::{Orientation, Position, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub time: SimTime,
    pub scheduler: SchedulerState,
    pub missiles: Vec<MissileView>,
}

/// A live instance as seen by tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileView {
    pub id: InstanceId,
    pub owner: FactionId,
    pub position: Position,
    /// Heading in degrees.
    pub angle: f64,
    /// Distance per tick.
    pub speed: f64,
    pub distance_traveled: f64,
    pub max_distance: f64,
    pub elapsed_secs: f64,
    pub orientation: Orientation,
    /// Units damaged so far.
    pub hits: usize,
}
