#[cfg(test)]
mod tests {
    use crate::config::{EngineConfig, TerrainConvention};
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::MissileError;
    use crate::events::MissileEvent;
    use crate::ids::{InstanceId, UnitRef};
    use crate::options::MissileOptions;
    use crate::types::SimTime;

    #[test]
    fn test_options_defaults_from_empty_json() {
        let opts: MissileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, MissileOptions::default());
        assert_eq!(opts.distance, 600.0);
        assert_eq!(opts.duration, 1.5);
        assert_eq!(opts.hit_radius, 65.0);
        assert_eq!(opts.damage_amount, 100.0);
        assert_eq!(opts.height_offset, 60.0);
        assert_eq!(opts.scale, 1.0);
        assert_eq!(opts.effect_model, DEFAULT_EFFECT_MODEL);
        assert!(opts.collides);
        assert!(opts.recyclable);
        assert!(!opts.ally_targeting);
    }

    #[test]
    fn test_options_partial_json() {
        let opts: MissileOptions =
            serde_json::from_str(r#"{"distance": 900.0, "ally_targeting": true}"#).unwrap();
        assert_eq!(opts.distance, 900.0);
        assert!(opts.ally_targeting);
        assert_eq!(opts.duration, DEFAULT_DURATION);
    }

    #[test]
    fn test_options_reject_unknown_field() {
        let result = serde_json::from_str::<MissileOptions>(r#"{"distanse": 900.0}"#);
        assert!(result.is_err(), "Misspelled option should not parse");
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(MissileOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_negative_distance() {
        let opts = MissileOptions {
            distance: -10.0,
            ..Default::default()
        };
        match opts.validate() {
            Err(MissileError::InvalidOption { field, .. }) => assert_eq!(field, "distance"),
            other => panic!("Expected InvalidOption, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_duration() {
        let opts = MissileOptions {
            duration: 0.0,
            ..Default::default()
        };
        match opts.validate() {
            Err(MissileError::InvalidOption { field, .. }) => assert_eq!(field, "duration"),
            other => panic!("Expected InvalidOption, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_nan_hit_radius() {
        let opts = MissileOptions {
            hit_radius: f64::NAN,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_validate_rectangle_rejected() {
        let opts = MissileOptions {
            collision_shape: CollisionShape::Rectangle,
            ..Default::default()
        };
        assert_eq!(
            opts.validate(),
            Err(MissileError::UnsupportedCollisionShape(
                CollisionShape::Rectangle
            ))
        );
    }

    #[test]
    fn test_error_messages() {
        let err = MissileError::PoolExhausted { capacity: 8 };
        assert_eq!(err.to_string(), "instance pool exhausted: capacity 8");
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert!((config.tick_interval_secs - 1.0 / 32.0).abs() < 1e-12);
        assert_eq!(config.max_collision_height, 197.0);
        assert!(config.validate().is_ok());

        let parsed: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_engine_config_rejects_zero_interval() {
        let config = EngineConfig {
            tick_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_terrain_convention() {
        let t = TerrainConvention::default();
        assert_eq!(t.to_height(0.0), -256.0);
        assert_eq!(t.to_height(2.0), 0.0);
        assert_eq!(t.to_height(3.0), 128.0);
    }

    #[test]
    fn test_damage_type_immunity() {
        assert_eq!(DamageType::Normal.immunity_tag(), Some(UnitTag::Ethereal));
        assert_eq!(DamageType::Magic.immunity_tag(), Some(UnitTag::MagicImmune));
        assert_eq!(DamageType::Universal.immunity_tag(), None);
    }

    #[test]
    fn test_missile_event_tagged() {
        let event = MissileEvent::Hit {
            id: InstanceId::new(3, 1),
            unit: UnitRef(42),
            amount: 100.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"Hit""#), "Got {json}");
        let back: MissileEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_instance_id_display() {
        assert_eq!(InstanceId::new(7, 2).to_string(), "M7g2");
    }

    #[test]
    fn test_sim_time_advance_does_not_drift() {
        let mut time = SimTime::default();
        for _ in 0..48 {
            time.advance(TICK_INTERVAL);
        }
        assert_eq!(time.tick, 48);
        assert_eq!(time.elapsed_secs, 1.5);
    }
}
