//! Recording effect system: keeps the last state of every effect handle.

use std::collections::HashMap;

use serde::Serialize;

use volley_core::host::EffectSystem;
use volley_core::ids::EffectHandle;
use volley_core::types::{Orientation, Position};

/// Last known state of one effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectState {
    pub model: String,
    pub position: Position,
    pub orientation: Orientation,
    pub scale: f64,
}

#[derive(Debug, Default)]
pub struct EffectLog {
    next_handle: u64,
    live: HashMap<EffectHandle, EffectState>,
    /// Total handles ever created.
    pub created: u64,
    /// Total handles destroyed.
    pub destroyed: u64,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&EffectState> {
        self.live.get(&handle)
    }

    /// Handles created and not yet destroyed, parked ones included.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl EffectSystem for EffectLog {
    fn create_effect(&mut self, model: &str, x: f64, y: f64) -> EffectHandle {
        self.next_handle += 1;
        self.created += 1;
        let handle = EffectHandle(self.next_handle);
        self.live.insert(
            handle,
            EffectState {
                model: model.to_owned(),
                position: Position::new(x, y, 0.0),
                orientation: Orientation::ZERO,
                scale: 1.0,
            },
        );
        handle
    }

    fn set_position(&mut self, handle: EffectHandle, x: f64, y: f64, z: f64) {
        if let Some(state) = self.live.get_mut(&handle) {
            state.position = Position::new(x, y, z);
        }
    }

    fn set_orientation(&mut self, handle: EffectHandle, orientation: Orientation) {
        if let Some(state) = self.live.get_mut(&handle) {
            state.orientation = orientation;
        }
    }

    fn set_scale(&mut self, handle: EffectHandle, scale: f64) {
        if let Some(state) = self.live.get_mut(&handle) {
            state.scale = scale;
        }
    }

    fn destroy_effect(&mut self, handle: EffectHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }
}
