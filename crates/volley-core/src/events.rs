//! Events emitted by the engine during a tick.

use serde::{Deserialize, Serialize};

use crate::enums::FinishCause;
use crate::ids::{InstanceId, UnitRef};
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissileEvent {
    /// An instance entered the active set.
    Launched { id: InstanceId, origin: Position },
    /// An instance damaged a unit for the first time.
    Hit {
        id: InstanceId,
        unit: UnitRef,
        amount: f64,
    },
    /// An instance left the active set and its slot was released.
    Finished {
        id: InstanceId,
        cause: FinishCause,
        position: Position,
    },
}

/// Outcome of one shared tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    /// Ticks completed so far. Unchanged if the clock was stopped.
    pub tick: u64,
    pub events: Vec<MissileEvent>,
    /// Instances still active after removals.
    pub active: usize,
}
