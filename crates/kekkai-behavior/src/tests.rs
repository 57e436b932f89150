#[cfg(test)]
mod tests {
    use glam::DVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use kekkai_core::constants::*;
    use kekkai_core::enums::{BehaviorState, EnemyArchetype};

    use crate::fsm::{evaluate, BarrierSighting, BehaviorContext, BehaviorEvent, PhantomLook};
    use crate::profiles::get_profile;
    use crate::steering::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn make_context(
        archetype: EnemyArchetype,
        state: BehaviorState,
        position: DVec3,
        target: DVec3,
    ) -> BehaviorContext {
        BehaviorContext {
            archetype,
            state,
            position,
            velocity: DVec3::ZERO,
            target,
            player: target,
            waypoint: None,
            wet_remaining_secs: 0.0,
            doused: false,
            on_water: false,
            near_reflector: false,
            nearest_barrier: None,
            home: None,
            age_secs: 1.0,
            now_secs: 10.0,
            dt: DT,
            bounds: FieldBounds::default(),
        }
    }

    #[test]
    fn test_every_archetype_has_positive_hp() {
        let all = [
            EnemyArchetype::Normal,
            EnemyArchetype::Fire,
            EnemyArchetype::Phantom,
            EnemyArchetype::Cube,
            EnemyArchetype::Roller,
            EnemyArchetype::Jumper,
            EnemyArchetype::Cone,
            EnemyArchetype::Torus,
            EnemyArchetype::Eater,
            EnemyArchetype::Target,
            EnemyArchetype::BossCore,
            EnemyArchetype::CompositePart,
            EnemyArchetype::CompositeCore,
            EnemyArchetype::PuzzleCore,
            EnemyArchetype::PuzzleMinion,
        ];
        for archetype in all {
            let profile = get_profile(archetype);
            assert!(profile.base_hp > 0.0, "{archetype:?} has no hit points");
            assert!(profile.spawn_height.0 <= profile.spawn_height.1);
        }
        assert_eq!(get_profile(EnemyArchetype::Fire).base_hp, 5.0);
        assert_eq!(get_profile(EnemyArchetype::BossCore).base_hp, 50.0);
    }

    #[test]
    fn test_patrol_switches_to_chase_near_target() {
        let ctx = make_context(
            EnemyArchetype::Normal,
            BehaviorState::Patrol,
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(10.0, 1.0, 0.0),
        );
        let update = evaluate(&ctx, &mut rng());
        assert!(update.state_changed);
        assert_eq!(update.new_state, BehaviorState::Chase);
        assert!(update.force.x > 0.0, "chase should steer toward the target");
    }

    #[test]
    fn test_patrol_picks_waypoint_inside_field() {
        let ctx = make_context(
            EnemyArchetype::Normal,
            BehaviorState::Patrol,
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(50.0, 1.0, 0.0),
        );
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.new_state, BehaviorState::Patrol);
        let waypoint = update.waypoint.expect("patrol should pick a waypoint");
        let bounds = FieldBounds::default();
        assert!(waypoint.x.abs() <= bounds.half_width * PATROL_FIELD_FRACTION);
        assert!(waypoint.z.abs() <= bounds.half_depth * PATROL_FIELD_FRACTION);
        assert!(!update.contact);
    }

    #[test]
    fn test_field_clamp_pulls_back_inside() {
        let bounds = FieldBounds::default();
        let inside = bounds.clamp(DVec3::new(500.0, -20.0, -500.0), 1.0);
        assert!(bounds.contains(inside));
        assert_eq!(inside.x, bounds.half_width);
        assert_eq!(inside.y, 1.0);
        assert_eq!(inside.z, -bounds.half_depth);
    }

    #[test]
    fn test_chase_never_reverts_to_patrol() {
        let ctx = make_context(
            EnemyArchetype::Cube,
            BehaviorState::Chase,
            DVec3::ZERO,
            DVec3::new(60.0, 0.0, 0.0),
        );
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.new_state, BehaviorState::Chase);
        assert_eq!(update.angular_velocity, Some(DVec3::Y * SPIN_RATE));
    }

    #[test]
    fn test_contact_within_range() {
        let ctx = make_context(
            EnemyArchetype::Normal,
            BehaviorState::Chase,
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
        );
        assert!(evaluate(&ctx, &mut rng()).contact);
    }

    #[test]
    fn test_dry_fire_lifts_and_attacks() {
        let ctx = make_context(
            EnemyArchetype::Fire,
            BehaviorState::Normal,
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(1.0, 1.7, 0.0),
        );
        let update = evaluate(&ctx, &mut rng());
        let mass = get_profile(EnemyArchetype::Fire).mass;
        assert!(update.force.y > GRAVITY * mass, "fire below hover height climbs");
        assert_eq!(update.damping, Some(DRY_DAMPING));
        assert!(update.contact);
    }

    #[test]
    fn test_doused_fire_goes_wet() {
        let mut ctx = make_context(
            EnemyArchetype::Fire,
            BehaviorState::Normal,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(1.0, 1.7, 0.0),
        );
        ctx.doused = true;
        ctx.velocity = DVec3::new(3.0, 1.0, 0.0);
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.new_state, BehaviorState::Wet);
        assert_eq!(update.wet_remaining_secs, FIRE_WET_SECS);
        assert_eq!(update.velocity, Some(DVec3::ZERO));
        assert_eq!(update.event, Some(BehaviorEvent::Extinguished));
        assert!(!update.contact, "wet fire does not attack");
    }

    #[test]
    fn test_wet_fire_rekindles() {
        let mut ctx = make_context(
            EnemyArchetype::Fire,
            BehaviorState::Wet,
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 1.7, 0.0),
        );
        ctx.wet_remaining_secs = DT * 0.5;
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.new_state, BehaviorState::Normal);
        assert_eq!(update.event, Some(BehaviorEvent::Rekindled));
        assert_eq!(update.velocity.map(|v| v.y), Some(REKINDLE_LIFT));
    }

    #[test]
    fn test_wet_fire_drifts_home() {
        let mut ctx = make_context(
            EnemyArchetype::Fire,
            BehaviorState::Wet,
            DVec3::new(55.0, 1.0, 0.0),
            DVec3::ZERO,
        );
        ctx.wet_remaining_secs = 5.0;
        let update = evaluate(&ctx, &mut rng());
        assert!(update.force.x < 0.0);
        assert!((update.wet_remaining_secs - (5.0 - DT)).abs() < 1e-9);
    }

    #[test]
    fn test_phantom_hidden_far_from_everything() {
        let ctx = make_context(
            EnemyArchetype::Phantom,
            BehaviorState::Normal,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(30.0, 5.0, 0.0),
        );
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.look, Some(PhantomLook::Hidden));
    }

    #[test]
    fn test_phantom_reflecting_near_window() {
        let mut ctx = make_context(
            EnemyArchetype::Phantom,
            BehaviorState::Normal,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(30.0, 5.0, 0.0),
        );
        ctx.near_reflector = true;
        assert_eq!(
            evaluate(&ctx, &mut rng()).look,
            Some(PhantomLook::Reflecting)
        );
    }

    #[test]
    fn test_phantom_visible_near_target() {
        let ctx = make_context(
            EnemyArchetype::Phantom,
            BehaviorState::Normal,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(3.0, 5.0, 0.0),
        );
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.look, Some(PhantomLook::Visible));
    }

    #[test]
    fn test_wet_phantom_spins_in_place() {
        let mut ctx = make_context(
            EnemyArchetype::Phantom,
            BehaviorState::Normal,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(1.0, 5.0, 0.0),
        );
        ctx.doused = true;
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.new_state, BehaviorState::Wet);
        assert_eq!(update.wet_remaining_secs, PHANTOM_WET_SECS);
        assert_eq!(update.angular_velocity, Some(DVec3::Y * SPIN_RATE));
        assert!(!update.contact);
    }

    #[test]
    fn test_roller_uses_torque() {
        let ctx = make_context(
            EnemyArchetype::Roller,
            BehaviorState::Chase,
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, 30.0),
        );
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.force, DVec3::ZERO);
        assert!(update.torque.x > 0.0);
    }

    #[test]
    fn test_cone_charges_on_interval() {
        let mut ctx = make_context(
            EnemyArchetype::Cone,
            BehaviorState::Chase,
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, 30.0),
        );
        ctx.age_secs = CONE_CHARGE_INTERVAL_SECS + DT * 0.5;
        let update = evaluate(&ctx, &mut rng());
        assert!(update.impulse.z > 0.0);

        ctx.age_secs = CONE_CHARGE_INTERVAL_SECS + 1.0;
        assert_eq!(evaluate(&ctx, &mut rng()).impulse, DVec3::ZERO);
    }

    #[test]
    fn test_target_flees_player() {
        let ctx = make_context(
            EnemyArchetype::Target,
            BehaviorState::Normal,
            DVec3::new(5.0, 1.0, 0.0),
            DVec3::ZERO,
        );
        let update = evaluate(&ctx, &mut rng());
        assert!(update.force.x > 0.0, "target should move away from the player");
        assert!(!update.contact);
    }

    #[test]
    fn test_eater_seeks_and_eats_barrier() {
        let mut ctx = make_context(
            EnemyArchetype::Eater,
            BehaviorState::Chase,
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, 50.0),
        );
        ctx.nearest_barrier = Some(BarrierSighting {
            position: DVec3::new(-20.0, 0.0, 0.0),
            half_extent: 2.0,
        });
        let update = evaluate(&ctx, &mut rng());
        assert!(update.force.x < 0.0, "eater heads for the barrier");
        assert!(!update.eat_barrier);

        ctx.nearest_barrier = Some(BarrierSighting {
            position: DVec3::new(-3.0, 0.0, 0.0),
            half_extent: 2.0,
        });
        assert!(evaluate(&ctx, &mut rng()).eat_barrier);
    }

    #[test]
    fn test_boss_pulled_back_into_hover_band() {
        let mut ctx = make_context(
            EnemyArchetype::BossCore,
            BehaviorState::Chase,
            DVec3::new(25.0, 30.0, 0.0),
            DVec3::ZERO,
        );
        ctx.now_secs = 0.0;
        let mass = get_profile(EnemyArchetype::BossCore).mass;
        let update = evaluate(&ctx, &mut rng());
        assert!(update.force.y < GRAVITY * mass, "above the band the lift weakens");

        ctx.position.y = 5.0;
        let update = evaluate(&ctx, &mut rng());
        assert!(update.force.y > GRAVITY * mass, "below the band the lift grows");
    }

    #[test]
    fn test_station_holds_home() {
        let mut ctx = make_context(
            EnemyArchetype::PuzzleMinion,
            BehaviorState::Chase,
            DVec3::new(0.0, 6.0, 0.0),
            DVec3::new(0.0, 1.0, 40.0),
        );
        ctx.home = Some(DVec3::new(4.0, 6.0, 0.0));
        let update = evaluate(&ctx, &mut rng());
        assert!(update.force.x > 0.0);
        let mass = get_profile(EnemyArchetype::PuzzleMinion).mass;
        assert!((update.force.y - GRAVITY * mass).abs() < 1e-9);
    }

    #[test]
    fn test_ceiling_clamps_airborne() {
        let mut ctx = make_context(
            EnemyArchetype::Phantom,
            BehaviorState::Normal,
            DVec3::new(0.0, CEILING_Y + 5.0, 0.0),
            DVec3::new(0.0, 1.0, 30.0),
        );
        ctx.velocity = DVec3::new(0.0, 4.0, 0.0);
        let update = evaluate(&ctx, &mut rng());
        assert_eq!(update.velocity.map(|v| v.y), Some(0.0));
        assert!(update.force.y < 0.0);
    }

    #[test]
    fn test_choose_target_without_escort() {
        let mut r = rng();
        for _ in 0..20 {
            assert_eq!(choose_target(false, &mut r), TargetKind::Player);
        }
    }

    #[test]
    fn test_choose_target_prefers_escort() {
        let mut r = rng();
        let escort = (0..1000)
            .filter(|_| choose_target(true, &mut r) == TargetKind::Escort)
            .count();
        assert!((600..800).contains(&escort), "escort picked {escort} times");
    }

    #[test]
    fn test_initial_state() {
        let mut r = rng();
        assert_eq!(
            initial_state(EnemyArchetype::Fire, false, &mut r),
            BehaviorState::Normal
        );
        assert_eq!(
            initial_state(EnemyArchetype::Roller, false, &mut r),
            BehaviorState::Chase
        );
        assert_eq!(
            initial_state(EnemyArchetype::Normal, true, &mut r),
            BehaviorState::Chase
        );
        let patrolling = (0..200)
            .filter(|_| initial_state(EnemyArchetype::Normal, false, &mut r) == BehaviorState::Patrol)
            .count();
        assert!(patrolling > 50 && patrolling < 150);
    }

    #[test]
    fn test_containment_timeline() {
        let bounds = FieldBounds::default();
        let outside = DVec3::new(bounds.half_width + 5.0, 2.0, 0.0);
        assert_eq!(
            containment(DVec3::ZERO, 0.0, 0.0, &bounds),
            Containment::Inside
        );
        assert_eq!(
            containment(outside, 1.0, 1.0, &bounds),
            Containment::Drifting
        );
        match containment(outside, OOB_GRACE_SECS + 0.1, 1.5, &bounds) {
            Containment::Recover(impulse) => {
                assert!(impulse.x < 0.0);
                assert_eq!(impulse.y, OOB_UPWARD_IMPULSE);
            }
            other => panic!("expected recovery, got {other:?}"),
        }
        assert_eq!(
            containment(outside, OOB_GRACE_SECS + 0.1, 0.5, &bounds),
            Containment::Drifting
        );
        assert_eq!(
            containment(outside, OOB_RETREAT_SECS, 0.0, &bounds),
            Containment::Retreat
        );
        let fallen = DVec3::new(0.0, FALL_LIMIT_Y - 1.0, 0.0);
        assert_ne!(containment(fallen, 0.0, 0.0, &bounds), Containment::Inside);
    }

    #[test]
    fn test_douse_duration() {
        assert_eq!(douse_duration(EnemyArchetype::Fire), Some(FIRE_WET_SECS));
        assert_eq!(douse_duration(EnemyArchetype::Phantom), Some(PHANTOM_WET_SECS));
        assert_eq!(douse_duration(EnemyArchetype::Cube), None);
    }
}
