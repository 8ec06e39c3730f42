//! Per-instance projectile state and caller hooks.

use std::collections::HashSet;

use volley_core::constants::DISTANCE_TOLERANCE;
use volley_core::enums::{AttackType, CollisionShape, DamageType, FinishCause};
use volley_core::ids::{EffectHandle, FactionId, InstanceId, UnitRef};
use volley_core::state::MissileView;
use volley_core::types::{Orientation, Position};

use crate::trajectory;

/// Called once per tick per instance, after movement and before collision.
pub type TickHook = Box<dyn FnMut(&mut ProjectileInstance)>;

/// Called once for every unit an instance damages.
pub type DamageHook = Box<dyn FnMut(&ProjectileInstance, UnitRef)>;

/// Caller-supplied behavior attached at spawn.
#[derive(Default)]
pub struct MissileHooks {
    pub on_tick: Option<TickHook>,
    pub on_damage: Option<DamageHook>,
}

impl MissileHooks {
    pub fn on_tick(mut self, hook: impl FnMut(&mut ProjectileInstance) + 'static) -> Self {
        self.on_tick = Some(Box::new(hook));
        self
    }

    pub fn on_damage(
        mut self,
        hook: impl FnMut(&ProjectileInstance, UnitRef) + 'static,
    ) -> Self {
        self.on_damage = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for MissileHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissileHooks")
            .field("on_tick", &self.on_tick.is_some())
            .field("on_damage", &self.on_damage.is_some())
            .finish()
    }
}

/// A live projectile.
///
/// Speeds and rates are stored per tick; the engine converts the per-second
/// options at spawn so the tick loop never multiplies by the interval.
#[derive(Debug, Clone)]
pub struct ProjectileInstance {
    pub(crate) id: InstanceId,

    // --- Kinematics ---
    pub position: Position,
    /// Heading in degrees, kept in [0, 360).
    pub angle: f64,
    /// Distance per tick.
    pub speed: f64,
    /// Speed change per tick.
    pub acceleration: f64,
    /// Heading change per tick, in degrees.
    pub turn_rate: f64,
    pub height_offset: f64,
    pub orientation: Orientation,

    // --- Travel ---
    pub distance_traveled: f64,
    pub max_distance: f64,
    pub(crate) ticks_alive: u64,
    pub elapsed_secs: f64,
    pub max_duration: f64,

    // --- Gameplay ---
    pub owner: FactionId,
    pub source: UnitRef,
    pub target: Option<UnitRef>,
    pub exclude_entity: Option<UnitRef>,
    pub damage_amount: f64,
    pub attack_type: AttackType,
    pub damage_type: DamageType,
    pub user_data: u64,

    // --- Flags ---
    pub collides: bool,
    pub recyclable: bool,
    pub pending_destroy: bool,
    pub ally_targeting: bool,

    // --- Collision ---
    pub hit_radius: f64,
    pub collision_shape: CollisionShape,
    pub use_z_filter: bool,

    // --- Derived ---
    pub(crate) origin: Position,
    pub(crate) impact: Position,
    pub(crate) terrain_z: f64,
    pub(crate) damaged: HashSet<UnitRef>,
    pub(crate) effect: EffectHandle,
    pub(crate) effect_model: String,
}

impl ProjectileInstance {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Launch point, fixed at spawn.
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Where the instance lands if nothing steers it.
    pub fn impact(&self) -> Position {
        self.impact
    }

    /// Terrain height under the instance at the last sample.
    pub fn terrain_z(&self) -> f64 {
        self.terrain_z
    }

    pub fn effect(&self) -> EffectHandle {
        self.effect
    }

    pub fn ticks_alive(&self) -> u64 {
        self.ticks_alive
    }

    pub fn has_damaged(&self, unit: UnitRef) -> bool {
        self.damaged.contains(&unit)
    }

    pub fn damaged_count(&self) -> usize {
        self.damaged.len()
    }

    /// Ask for removal at the end of the current tick.
    pub fn destroy(&mut self) {
        self.pending_destroy = true;
    }

    /// Turn to face a point on the ground plane.
    pub fn face_towards(&mut self, x: f64, y: f64) {
        if x == self.position.x && y == self.position.y {
            return;
        }
        self.angle = trajectory::angle_between(self.position.x, self.position.y, x, y)
            .rem_euclid(360.0);
    }

    /// Why this instance should be removed at the end of the tick, if at all.
    ///
    /// An explicit destroy wins over distance, distance over duration.
    pub fn finish_cause(&self) -> Option<FinishCause> {
        if self.pending_destroy {
            Some(FinishCause::Destroyed)
        } else if self.distance_traveled >= self.max_distance * (1.0 - DISTANCE_TOLERANCE) {
            Some(FinishCause::DistanceReached)
        } else if self.elapsed_secs >= self.max_duration * (1.0 - DISTANCE_TOLERANCE) {
            Some(FinishCause::DurationExpired)
        } else {
            None
        }
    }

    pub fn view(&self) -> MissileView {
        MissileView {
            id: self.id,
            owner: self.owner,
            position: self.position,
            angle: self.angle,
            speed: self.speed,
            distance_traveled: self.distance_traveled,
            max_distance: self.max_distance,
            elapsed_secs: self.elapsed_secs,
            orientation: self.orientation,
            hits: self.damaged.len(),
        }
    }
}
