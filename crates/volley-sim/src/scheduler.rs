//! Shared fixed-rate clock.
//!
//! One clock drives every instance. It starts when the first instance is
//! spawned and stops at the end of the tick that empties the active set.
//! `accumulate` converts wall-clock time into whole ticks the same way a
//! fixed-timestep game loop does, carrying the remainder forward.

use std::time::Duration;

use tracing::{info, warn};

use volley_core::constants::MAX_CATCH_UP_TICKS;
use volley_core::enums::SchedulerState;
use volley_core::types::SimTime;

#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    interval_secs: f64,
    time: SimTime,
    /// Wall-clock seconds not yet turned into ticks.
    accumulator: f64,
}

impl Scheduler {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            state: SchedulerState::Stopped,
            interval_secs,
            time: SimTime::default(),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Start the clock if it is stopped. Returns true on the transition.
    pub fn ensure_running(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SchedulerState::Running;
        self.accumulator = 0.0;
        info!("Shared clock started at tick {}", self.time.tick);
        true
    }

    /// Stop the clock once nothing is left to drive. Returns true on the transition.
    pub fn stop_if_idle(&mut self, active: usize) -> bool {
        if active > 0 || !self.is_running() {
            return false;
        }
        self.state = SchedulerState::Stopped;
        self.accumulator = 0.0;
        info!(
            "Shared clock stopped at tick {} ({:.3}s)",
            self.time.tick, self.time.elapsed_secs
        );
        true
    }

    /// Count one tick on the shared clock and return its number.
    pub fn begin_tick(&mut self) -> u64 {
        self.time.advance(self.interval_secs);
        self.time.tick
    }

    /// Feed wall-clock time; returns how many ticks are due.
    ///
    /// A stopped clock discards the time and reports nothing due. At most
    /// `MAX_CATCH_UP_TICKS` are due per call; if more piled up, the backlog
    /// is dropped and the clock resumes from now.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.accumulator += elapsed.as_secs_f64();
        let due = (self.accumulator / self.interval_secs).floor();
        if due > MAX_CATCH_UP_TICKS as f64 {
            warn!(
                "Shared clock {:.3}s behind, dropping {} ticks",
                self.accumulator,
                due - MAX_CATCH_UP_TICKS as f64
            );
            self.accumulator = 0.0;
            return MAX_CATCH_UP_TICKS;
        }
        self.accumulator -= due * self.interval_secs;
        due as u32
    }
}
