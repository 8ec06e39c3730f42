//! Visual handle recycling.
//!
//! Recyclable instances hand their effect back on release; the handle is
//! moved to a parking spot off the playable area and kept on a per-model
//! stack. The next spawn with the same model pops it instead of asking the
//! host for a new effect.

use std::collections::HashMap;

use tracing::debug;

use volley_core::host::EffectSystem;
use volley_core::ids::EffectHandle;

#[derive(Debug, Clone)]
pub struct EffectRecycler {
    parked: HashMap<String, Vec<EffectHandle>>,
    park_position: (f64, f64),
}

impl EffectRecycler {
    pub fn new(park_position: (f64, f64)) -> Self {
        Self {
            parked: HashMap::new(),
            park_position,
        }
    }

    /// Reuse a parked handle for `model`, or create one.
    pub fn acquire<E: EffectSystem + ?Sized>(
        &mut self,
        effects: &mut E,
        model: &str,
        x: f64,
        y: f64,
    ) -> EffectHandle {
        match self.parked.get_mut(model).and_then(Vec::pop) {
            Some(handle) => {
                debug!("Reusing parked effect {:?} for {}", handle, model);
                effects.set_position(handle, x, y, 0.0);
                handle
            }
            None => effects.create_effect(model, x, y),
        }
    }

    /// Park the handle for reuse, or destroy it.
    pub fn release<E: EffectSystem + ?Sized>(
        &mut self,
        effects: &mut E,
        model: &str,
        handle: EffectHandle,
        recyclable: bool,
    ) {
        if !recyclable {
            effects.destroy_effect(handle);
            return;
        }
        let (x, y) = self.park_position;
        effects.set_position(handle, x, y, 0.0);
        self.parked.entry(model.to_owned()).or_default().push(handle);
    }

    pub fn parked_count(&self, model: &str) -> usize {
        self.parked.get(model).map_or(0, Vec::len)
    }

    /// Destroy every parked handle.
    pub fn drain<E: EffectSystem + ?Sized>(&mut self, effects: &mut E) {
        let mut destroyed = 0usize;
        for (_, handles) in self.parked.drain() {
            for handle in handles {
                effects.destroy_effect(handle);
                destroyed += 1;
            }
        }
        if destroyed > 0 {
            debug!("Destroyed {} parked effects", destroyed);
        }
    }
}
