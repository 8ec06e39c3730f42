//! Slot allocator for projectile instances.
//!
//! Slots live in one `Vec<Option<T>>` indexed by `InstanceId::index`. Freed
//! indices go on a stack and are handed out again last-in first-out; each
//! release bumps the slot's generation so stale ids stop resolving.

use volley_core::error::MissileError;
use volley_core::ids::InstanceId;

pub struct InstancePool<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    free_indices: Vec<u32>,
    capacity: Option<usize>,
    live: usize,
}

impl<T> InstancePool<T> {
    /// Pool bounded only by the `u32` index space.
    pub fn new() -> Self {
        Self::with_capacity_limit(None)
    }

    /// Pool that refuses to hold more than `capacity` live values.
    pub fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_indices: Vec::new(),
            capacity,
            live: 0,
        }
    }

    /// Store `value` in a free slot, growing the backing storage if none is free.
    pub fn allocate(&mut self, value: T) -> Result<InstanceId, MissileError> {
        self.allocate_with(|_| value)
    }

    /// Like `allocate`, for values that need to know their own id.
    pub fn allocate_with(
        &mut self,
        make: impl FnOnce(InstanceId) -> T,
    ) -> Result<InstanceId, MissileError> {
        if let Some(limit) = self.capacity {
            if self.live >= limit {
                return Err(MissileError::PoolExhausted { capacity: limit });
            }
        }

        let id = if let Some(index) = self.free_indices.pop() {
            InstanceId::new(index, self.generations[index as usize])
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| {
                MissileError::PoolExhausted {
                    capacity: u32::MAX as usize,
                }
            })?;
            self.slots.push(None);
            self.generations.push(0);
            InstanceId::new(index, 0)
        };

        self.slots[id.index as usize] = Some(make(id));
        self.live += 1;
        Ok(id)
    }

    /// Take the value out of a live slot and free the slot.
    ///
    /// Releasing a stale or never-allocated id is a no-op returning `None`.
    pub fn release(&mut self, id: InstanceId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        let idx = id.index as usize;
        let value = self.slots[idx].take();
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push(id.index);
        self.live -= 1;
        value
    }

    pub fn is_live(&self, id: InstanceId) -> bool {
        let idx = id.index as usize;
        idx < self.slots.len()
            && self.generations[idx] == id.generation
            && self.slots[idx].is_some()
    }

    pub fn get(&self, id: InstanceId) -> Option<&T> {
        if self.generations.get(id.index as usize) != Some(&id.generation) {
            return None;
        }
        self.slots[id.index as usize].as_ref()
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut T> {
        if self.generations.get(id.index as usize) != Some(&id.generation) {
            return None;
        }
        self.slots[id.index as usize].as_mut()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots ever created, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for InstancePool<T> {
    fn default() -> Self {
        Self::new()
    }
}
