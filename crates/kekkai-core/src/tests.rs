#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::PlayerCommand;
    use crate::config::{DestroyRule, JumpRule, ModeConfig};
    use crate::enums::*;
    use crate::error::{ActionRejected, ConfigError};
    use crate::events::{FeedbackEvent, FeedbackSink};
    use crate::state::HudSnapshot;
    use crate::types::{Aabb, Ray, Rgb, SimTime};

    #[test]
    fn test_archetype_serde() {
        let variants = vec![
            EnemyArchetype::Normal,
            EnemyArchetype::Fire,
            EnemyArchetype::Phantom,
            EnemyArchetype::BossCore,
            EnemyArchetype::CompositePart,
            EnemyArchetype::PuzzleMinion,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: EnemyArchetype = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
        assert_eq!(
            serde_json::to_string(&EnemyArchetype::BossCore).unwrap(),
            "\"boss_core\""
        );
    }

    #[test]
    fn test_tough_archetypes() {
        assert!(EnemyArchetype::BossCore.is_tough());
        assert!(EnemyArchetype::Eater.is_tough());
        assert!(EnemyArchetype::CompositePart.is_tough());
        assert!(!EnemyArchetype::Fire.is_tough());
        assert!(!EnemyArchetype::Target.is_tough());
        // Eater is tough but counts as an ambient enemy for caps.
        assert!(!EnemyArchetype::Eater.is_boss_side());
    }

    #[test]
    fn test_game_phase_terminal() {
        assert!(GamePhase::GameOver.is_terminal());
        assert!(GamePhase::MissionFailed.is_terminal());
        assert!(GamePhase::Victory.is_terminal());
        assert!(!GamePhase::Active.is_terminal());
        assert!(!GamePhase::Paused.is_terminal());
    }

    #[test]
    fn test_player_command_serde() {
        let json = r#"{"type":"StartSession","mode":"awakened"}"#;
        let cmd: PlayerCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            PlayerCommand::StartSession {
                mode: GameMode::Awakened
            }
        ));

        let cmd = PlayerCommand::RequestBarrier {
            position: DVec3::new(1.0, 2.0, 3.0),
            size: DVec3::splat(4.0),
            yaw: 0.5,
            ghost: true,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"RequestBarrier\""));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        match back {
            PlayerCommand::RequestBarrier { position, ghost, .. } => {
                assert_eq!(position, DVec3::new(1.0, 2.0, 3.0));
                assert!(ghost);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..60 {
            t.advance();
        }
        assert_eq!(t.tick, 60);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_yawed_aabb_grows_when_rotated() {
        let size = DVec3::new(4.0, 2.0, 2.0);
        let flat = Aabb::from_yawed_box(DVec3::ZERO, size, 0.0);
        assert!((flat.max.x - 2.0).abs() < 1e-9);
        let turned = Aabb::from_yawed_box(DVec3::ZERO, size, std::f64::consts::FRAC_PI_2);
        assert!((turned.max.x - 1.0).abs() < 1e-9);
        assert!((turned.max.z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::ONE);
        let b = Aabb::from_center_half_extents(DVec3::new(1.5, 0.0, 0.0), DVec3::ONE);
        let c = Aabb::from_center_half_extents(DVec3::new(5.0, 0.0, 0.0), DVec3::ONE);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains(DVec3::new(0.5, -0.5, 0.9)));
    }

    #[test]
    fn test_ray_box_cast() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::new(0.0, 0.0, -2.0));
        let hit = ray.cast_yawed_box(DVec3::ZERO, DVec3::splat(2.0), 0.3);
        let t = hit.expect("ray should hit the box");
        assert!(t > 8.0 && t < 9.5, "hit distance {t}");

        let behind = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::Z);
        assert!(behind.cast_yawed_box(DVec3::ZERO, DVec3::splat(2.0), 0.0).is_none());

        let miss = Ray::new(DVec3::new(5.0, 0.0, 10.0), DVec3::NEG_Z);
        assert!(miss.cast_yawed_box(DVec3::ZERO, DVec3::splat(2.0), 0.0).is_none());
    }

    #[test]
    fn test_feedback_sink_drain() {
        let mut sink = FeedbackSink::default();
        sink.message("WAVE 1 START", Rgb::WHITE);
        sink.label("CAPTURED", DVec3::ZERO, Rgb::RED);
        assert_eq!(sink.events().len(), 2);
        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(sink.events().is_empty());
        assert!(matches!(drained[0], FeedbackEvent::Message { .. }));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = HudSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"main_menu\""));
    }

    #[test]
    fn test_presets_validate() {
        for mode in [GameMode::Standard, GameMode::Awakened, GameMode::Infinite] {
            let config = ModeConfig::preset(mode);
            assert_eq!(config.mode, mode);
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_default_rotation_has_six_missions() {
        let config = ModeConfig::standard();
        assert_eq!(config.director.mission_rotation.len(), 6);
        assert_eq!(config.director.mission_rotation[0], MissionType::Normal);
        assert_eq!(config.director.objective_for(MissionType::Normal), 5);
        assert_eq!(config.director.objective_for(MissionType::Escort), 30);
        assert_eq!(config.director.objective_for(MissionType::Puzzle), 1);
    }

    #[test]
    fn test_awakened_rules() {
        let config = ModeConfig::awakened();
        assert_eq!(config.rules.jump, JumpRule::Double);
        assert!(config.rules.area_denial.is_some());
        assert!(config.rules.smart_aim);
        assert!(matches!(
            config.rules.destroy,
            DestroyRule::ChainReaction { .. }
        ));
        assert_eq!(config.player.max_sp, 200.0);
    }

    #[test]
    fn test_infinite_never_ends() {
        let config = ModeConfig::infinite();
        assert_eq!(config.director.max_waves, None);
        assert_eq!(
            config.director.mission_rotation,
            vec![MissionType::Infinite]
        );
        assert!(config.rules.always_chase);
        assert!(!config.spawn_table(MissionType::Infinite).is_empty());
    }

    #[test]
    fn test_hp_multiplier() {
        let config = ModeConfig::standard();
        assert!((config.hp_multiplier(1) - 1.0).abs() < 1e-9);
        assert!((config.hp_multiplier(3) - 1.4).abs() < 1e-9);
        assert!((config.hp_multiplier(0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = ModeConfig::from_json_str(r#"{"player":{"speed":14.0}}"#).unwrap();
        assert_eq!(config.player.speed, 14.0);
        assert_eq!(config.player.max_hp, 100.0);
        assert_eq!(config.director.mission_rotation.len(), 6);
    }

    #[test]
    fn test_config_rejects_empty_rotation() {
        let err = ModeConfig::from_json_str(r#"{"director":{"mission_rotation":[]}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_config_rejects_bad_shrink_factor() {
        let err = ModeConfig::from_json_str(r#"{"barrier":{"shrink_factor":1.5}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_config_rejects_single_point_escort_path() {
        let err = ModeConfig::from_json_str(r#"{"escort_path":[[0.0, 1.0, 0.0]]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let two = ModeConfig::from_json_str(r#"{"escort_path":[[0.0, 1.0, 0.0], [0.0, 1.0, 10.0]]}"#)
            .unwrap();
        assert_eq!(two.escort_path.len(), 2);
    }

    #[test]
    fn test_config_parse_error() {
        let err = ModeConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_action_rejected_messages() {
        let err = ActionRejected::InsufficientResource {
            needed: 2.0,
            available: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "not enough spiritual power: need 2.0, have 1.0"
        );
        assert_eq!(ActionRejected::NoTarget.to_string(), "no barrier targeted");
    }
}
