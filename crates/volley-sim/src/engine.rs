//! MissileEngine: composition root for the projectile simulation.
//!
//! Owns the orientation table, the instance pool, the active set, the shared
//! clock, the collision filter, and the effect recycler. The host is passed
//! into every call that needs it and is never stored.
//!
//! Per-tick flow, for each active instance in spawn order:
//! 1. Already pending destroy: queue for removal, skip the rest.
//! 2. Trajectory step and effect update.
//! 3. `on_tick` hook.
//! 4. Collision (unless the instance does not collide or the hook destroyed it).
//! 5. Termination checks.
//!
//! Removals are applied after every instance has been updated, so releasing a
//! slot never disturbs the iteration.

use std::time::Duration;

use tracing::{debug, warn};

use volley_core::config::EngineConfig;
use volley_core::enums::{FinishCause, SchedulerState};
use volley_core::error::MissileError;
use volley_core::events::{MissileEvent, TickReport};
use volley_core::host::Host;
use volley_core::ids::{InstanceId, UnitRef};
use volley_core::options::MissileOptions;
use volley_core::state::EngineSnapshot;
use volley_core::types::{Position, SimTime};

use crate::collision::CollisionIndex;
use crate::effects::EffectRecycler;
use crate::instance::{MissileHooks, ProjectileInstance};
use crate::orientation::OrientationTable;
use crate::pool::InstancePool;
use crate::scheduler::Scheduler;
use crate::trajectory;

/// Pool entry: the instance plus its hooks, kept apart so a hook can borrow
/// the instance mutably while being called.
struct Slot {
    missile: ProjectileInstance,
    hooks: MissileHooks,
}

pub struct MissileEngine {
    config: EngineConfig,
    orientation: OrientationTable,
    pool: InstancePool<Slot>,
    /// Live ids in spawn order.
    active: Vec<InstanceId>,
    scheduler: Scheduler,
    collision: CollisionIndex,
    effects: EffectRecycler,

    // --- Per-tick buffers ---
    removal_buffer: Vec<(InstanceId, FinishCause)>,
    events: Vec<MissileEvent>,
}

impl MissileEngine {
    /// Build an engine and its orientation table.
    pub fn new(config: EngineConfig) -> Result<Self, MissileError> {
        config.validate()?;
        debug!(
            "Building orientation table (fixed rotation axes: {})",
            config.fixed_rotation_axes
        );
        Ok(Self {
            orientation: OrientationTable::new(config.fixed_rotation_axes),
            pool: InstancePool::with_capacity_limit(config.pool_capacity),
            active: Vec::new(),
            scheduler: Scheduler::new(config.tick_interval_secs),
            collision: CollisionIndex::new(&config),
            effects: EffectRecycler::new(config.effect_park_position),
            removal_buffer: Vec::new(),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn orientation_table(&self) -> &OrientationTable {
        &self.orientation
    }

    /// Launch a projectile from `source` towards `(landing_x, landing_y)`.
    pub fn spawn<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: UnitRef,
        landing_x: f64,
        landing_y: f64,
        options: MissileOptions,
    ) -> Result<InstanceId, MissileError> {
        self.spawn_with_hooks(
            host,
            source,
            landing_x,
            landing_y,
            options,
            MissileHooks::default(),
        )
    }

    /// `spawn` with per-tick and per-hit callbacks attached.
    pub fn spawn_with_hooks<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: UnitRef,
        landing_x: f64,
        landing_y: f64,
        options: MissileOptions,
        hooks: MissileHooks,
    ) -> Result<InstanceId, MissileError> {
        if let Err(err) = options.validate() {
            warn!("Rejected missile options: {}", err);
            return Err(err);
        }

        let unknown_source = |err: volley_core::error::HostError| MissileError::InvalidOption {
            field: "source",
            reason: err.to_string(),
        };
        let launch = host.position(source).map_err(unknown_source)?;
        let owner = host.owner(source).map_err(unknown_source)?;

        let interval = self.config.tick_interval_secs;
        let convention = self.config.terrain;

        let angle = trajectory::angle_between(launch.x, launch.y, landing_x, landing_y)
            .rem_euclid(360.0);
        let speed = options.distance / (options.duration / interval);
        let (impact_x, impact_y) =
            trajectory::project(launch.x, launch.y, options.distance, angle);

        let terrain_z = trajectory::step_height(&*host, &convention, launch.x, launch.y)
            .unwrap_or(launch.z);
        let impact_terrain_z =
            trajectory::step_height(&*host, &convention, impact_x, impact_y).unwrap_or(terrain_z);

        let origin = Position::new(launch.x, launch.y, terrain_z + options.height_offset);
        let impact = Position::new(impact_x, impact_y, impact_terrain_z + options.height_offset);
        let orientation = self.orientation.lookup(
            impact.x - origin.x,
            impact.y - origin.y,
            impact.z - origin.z,
        );

        let model = options.effect_model.clone();
        let effect = self.effects.acquire(&mut *host, &model, origin.x, origin.y);

        let alloc = self.pool.allocate_with(|id| Slot {
            missile: ProjectileInstance {
                id,
                position: origin,
                angle,
                speed,
                acceleration: options.acceleration * interval * interval,
                turn_rate: options.turn_rate * interval,
                height_offset: options.height_offset,
                orientation,
                distance_traveled: 0.0,
                max_distance: options.distance,
                ticks_alive: 0,
                elapsed_secs: 0.0,
                max_duration: options.duration,
                owner,
                source,
                target: options.target,
                exclude_entity: options.exclude_entity,
                damage_amount: options.damage_amount,
                attack_type: options.attack_type,
                damage_type: options.damage_type,
                user_data: options.user_data,
                collides: options.collides,
                recyclable: options.recyclable,
                pending_destroy: false,
                ally_targeting: options.ally_targeting,
                hit_radius: options.hit_radius,
                collision_shape: options.collision_shape,
                use_z_filter: options.use_z_filter.unwrap_or(self.config.use_z_filter),
                origin,
                impact,
                terrain_z,
                damaged: Default::default(),
                effect,
                effect_model: options.effect_model,
            },
            hooks,
        });

        let id = match alloc {
            Ok(id) => id,
            Err(err) => {
                warn!("Spawn from unit {} failed: {}", source.0, err);
                self.effects.release(&mut *host, &model, effect, true);
                return Err(err);
            }
        };

        host.set_scale(effect, options.scale);
        host.set_position(effect, origin.x, origin.y, origin.z);
        host.set_orientation(effect, orientation);

        self.active.push(id);
        self.scheduler.ensure_running();
        self.events.push(MissileEvent::Launched { id, origin });
        debug!(
            "Spawned {} from unit {} heading {:.1}° at {:.3}/tick",
            id, source.0, angle, speed
        );
        Ok(id)
    }

    /// Mark an instance for removal at the end of the next tick.
    ///
    /// Returns false if the id is stale; that is not an error.
    pub fn destroy_now(&mut self, id: InstanceId) -> bool {
        match self.pool.get_mut(id) {
            Some(slot) => {
                slot.missile.destroy();
                true
            }
            None => false,
        }
    }

    /// Run one shared tick over every active instance.
    ///
    /// Does nothing but flush pending events while the clock is stopped.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) -> TickReport {
        if !self.scheduler.is_running() {
            return TickReport {
                tick: self.scheduler.time().tick,
                events: std::mem::take(&mut self.events),
                active: self.active.len(),
            };
        }

        let tick = self.scheduler.begin_tick();
        let interval = self.config.tick_interval_secs;
        self.removal_buffer.clear();

        // --- Update pass ---
        for &id in &self.active {
            let Some(Slot { missile, hooks }) = self.pool.get_mut(id) else {
                continue;
            };

            if missile.pending_destroy {
                self.removal_buffer.push((id, FinishCause::Destroyed));
                continue;
            }

            let step = trajectory::advance(missile, &*host, &self.config.terrain, interval);
            if step != glam::DVec3::ZERO {
                missile.orientation = self.orientation.lookup(step.x, step.y, step.z);
            }
            host.set_position(
                missile.effect,
                missile.position.x,
                missile.position.y,
                missile.position.z,
            );
            host.set_orientation(missile.effect, missile.orientation);

            if let Some(on_tick) = hooks.on_tick.as_mut() {
                on_tick(missile);
            }

            if missile.collides && !missile.pending_destroy {
                for unit in self.collision.query_candidates(missile, &*host) {
                    if !self.collision.commit(missile, unit, &mut *host) {
                        continue;
                    }
                    self.events.push(MissileEvent::Hit {
                        id,
                        unit,
                        amount: missile.damage_amount,
                    });
                    if let Some(on_damage) = hooks.on_damage.as_mut() {
                        on_damage(missile, unit);
                    }
                }
            }

            if let Some(cause) = missile.finish_cause() {
                self.removal_buffer.push((id, cause));
            }
        }

        // --- Removal pass ---
        for (id, cause) in self.removal_buffer.drain(..) {
            let Some(Slot { missile, .. }) = self.pool.release(id) else {
                continue;
            };
            self.effects.release(
                &mut *host,
                &missile.effect_model,
                missile.effect,
                missile.recyclable,
            );
            debug!(
                "{} finished ({:?}) after {} ticks, {} hits",
                id,
                cause,
                missile.ticks_alive,
                missile.damaged.len()
            );
            self.events.push(MissileEvent::Finished {
                id,
                cause,
                position: missile.position,
            });
        }
        self.active.retain(|id| self.pool.is_live(*id));
        self.scheduler.stop_if_idle(self.active.len());

        TickReport {
            tick,
            events: std::mem::take(&mut self.events),
            active: self.active.len(),
        }
    }

    /// Feed wall-clock time and run every tick that has come due.
    ///
    /// Runs at most `MAX_CATCH_UP_TICKS` ticks; a longer gap is dropped.
    pub fn advance<H: Host + ?Sized>(&mut self, host: &mut H, elapsed: Duration) -> Vec<TickReport> {
        let due = self.scheduler.accumulate(elapsed);
        let mut reports = Vec::new();
        for _ in 0..due {
            reports.push(self.tick(&mut *host));
            if !self.scheduler.is_running() {
                break;
            }
        }
        reports
    }

    /// Remove every instance immediately and destroy all parked effects.
    pub fn clear<H: Host + ?Sized>(&mut self, host: &mut H) -> Vec<MissileEvent> {
        for id in std::mem::take(&mut self.active) {
            if let Some(Slot { missile, .. }) = self.pool.release(id) {
                host.destroy_effect(missile.effect);
                self.events.push(MissileEvent::Finished {
                    id,
                    cause: FinishCause::Destroyed,
                    position: missile.position,
                });
            }
        }
        self.effects.drain(&mut *host);
        self.scheduler.stop_if_idle(0);
        std::mem::take(&mut self.events)
    }

    pub fn get(&self, id: InstanceId) -> Option<&ProjectileInstance> {
        self.pool.get(id).map(|slot| &slot.missile)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut ProjectileInstance> {
        self.pool.get_mut(id).map(|slot| &mut slot.missile)
    }

    pub fn is_live(&self, id: InstanceId) -> bool {
        self.pool.is_live(id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Live ids in spawn order.
    pub fn active_ids(&self) -> &[InstanceId] {
        &self.active
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Pool slots ever created.
    pub fn slot_count(&self) -> usize {
        self.pool.slot_count()
    }

    pub fn parked_effects(&self, model: &str) -> usize {
        self.effects.parked_count(model)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            time: self.scheduler.time(),
            scheduler: self.scheduler.state(),
            missiles: self
                .active
                .iter()
                .filter_map(|&id| self.get(id))
                .map(ProjectileInstance::view)
                .collect(),
        }
    }
}
