//! Unit tests for the enemies module.
//!
//! Submodule tests so private systems and helpers are reachable without
//! making them public.

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;

use super::*;
use crate::common::test_utils::TestRng;
use crate::common::tunables::EnemyTuning;

fn time_with_delta(dt: f32) -> Time {
    let mut t = Time::<()>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

fn open_ground(x: f32, to_player: Option<Vec2>) -> Perception {
    Perception {
        x,
        to_player,
        ground_left: true,
        ground_right: true,
    }
}

// -----------------------------------------------------------------------------
// Vitals
// -----------------------------------------------------------------------------

#[test]
fn vitals_report_damage_kill_and_ignore_after_death() {
    let mut v = EnemyVitals::new(50.0);

    assert_eq!(v.take_damage(20.0), DamageOutcome::Damaged);
    assert_eq!(v.health().current, 30.0);
    assert_eq!(v.take_damage(0.0), DamageOutcome::Ignored);
    assert_eq!(v.take_damage(-5.0), DamageOutcome::Ignored);
    assert_eq!(v.take_damage(100.0), DamageOutcome::Killed);
    assert!(v.is_depleted());
    assert_eq!(v.take_damage(10.0), DamageOutcome::Ignored);
}

#[test]
fn vitals_never_leave_bounds_under_random_damage() {
    let mut rng = TestRng::new(0xC0FFEE_1234_5678);
    for _ in 0..200 {
        let mut v = EnemyVitals::new(rng.range_f32(1.0, 200.0));
        for _ in 0..20 {
            v.take_damage(rng.range_f32(-20.0, 60.0));
            let h = v.health();
            assert!(h.current >= 0.0 && h.current <= h.max);
        }
    }
}

// -----------------------------------------------------------------------------
// AI
// -----------------------------------------------------------------------------

#[test]
fn patrol_turns_around_at_segment_bounds() {
    let t = EnemyTuning::default();
    let mut brain = EnemyBrain::new(0.0, &t);

    let step = brain.step(EnemyKind::Melee, &open_ground(brain.max_x + 1.0, None), &t, 0.1);
    assert_eq!(step.velocity_x, -t.patrol_speed);

    let step = brain.step(EnemyKind::Melee, &open_ground(brain.min_x - 1.0, None), &t, 0.1);
    assert_eq!(step.velocity_x, t.patrol_speed);
    assert_eq!(brain.mode, AiMode::Patrol);
}

#[test]
fn patrol_turns_around_at_ledges() {
    let t = EnemyTuning::default();
    let mut brain = EnemyBrain::new(0.0, &t);
    brain.facing = 1.0;

    let p = Perception {
        x: 0.0,
        to_player: None,
        ground_left: true,
        ground_right: false,
    };
    let step = brain.step(EnemyKind::Melee, &p, &t, 0.1);

    assert_eq!(brain.facing, -1.0);
    assert_eq!(step.velocity_x, -t.patrol_speed);
}

#[test]
fn melee_chases_but_stops_at_a_ledge() {
    let t = EnemyTuning::default();
    let mut brain = EnemyBrain::new(0.0, &t);
    let towards_left = Some(Vec2::new(-(t.melee_range + 50.0), 0.0));

    let step = brain.step(EnemyKind::Melee, &open_ground(0.0, towards_left), &t, 0.1);
    assert_eq!(brain.mode, AiMode::Chase);
    assert_eq!(step.velocity_x, -t.chase_speed);

    let p = Perception {
        ground_left: false,
        ..open_ground(0.0, towards_left)
    };
    let step = brain.step(EnemyKind::Melee, &p, &t, 0.1);
    assert_eq!(step.velocity_x, 0.0);
}

#[test]
fn ranged_never_chases() {
    let t = EnemyTuning::default();
    let mut brain = EnemyBrain::new(0.0, &t);
    let beyond_range = Some(Vec2::new(t.ranged_range + 10.0, 0.0));

    brain.step(EnemyKind::Ranged, &open_ground(0.0, beyond_range), &t, 0.1);
    assert_eq!(brain.mode, AiMode::Patrol);
}

#[test]
fn windup_strikes_exactly_once_then_waits_for_cooldown() {
    let t = EnemyTuning {
        windup: 0.3,
        attack_cooldown: 1.0,
        ..default()
    };
    let mut brain = EnemyBrain::new(0.0, &t);
    let close = open_ground(0.0, Some(Vec2::new(10.0, 0.0)));

    let first = brain.step(EnemyKind::Melee, &close, &t, 0.1);
    assert!(first.began_windup);
    assert_eq!(first.velocity_x, 0.0);

    let mut strikes = 0;
    let mut windups = 0;
    // 0.9 s more: windup ends at 0.4 s, cooldown is not ready again before 1.1 s.
    for _ in 0..9 {
        let step = brain.step(EnemyKind::Melee, &close, &t, 0.1);
        strikes += step.strike as u32;
        windups += step.began_windup as u32;
    }
    assert_eq!(strikes, 1);
    assert_eq!(windups, 0);

    let mut again = false;
    for _ in 0..3 {
        again |= brain.step(EnemyKind::Melee, &close, &t, 0.1).began_windup;
    }
    assert!(again);
}

// -----------------------------------------------------------------------------
// ECS/system tests
// -----------------------------------------------------------------------------

#[test]
fn death_trigger_moves_depleted_enemy_to_dying_and_disables_collisions() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());

    let mut vitals = EnemyVitals::new(10.0);
    vitals.take_damage(10.0);

    let e = world
        .spawn((
            Enemy,
            vitals,
            EnemyLifeState::Alive,
            enemy_layers(),
            LinearVelocity(Vec2::new(50.0, 0.0)),
            Sprite::default(),
        ))
        .id();

    let _ = world.run_system_once(enemy_death_trigger);

    match world.get::<EnemyLifeState>(e).unwrap() {
        EnemyLifeState::Dying { timer } => assert!(timer.duration().as_secs_f32() > 0.0),
        _ => panic!("Expected enemy to enter Dying"),
    }
    assert_eq!(*world.get::<CollisionLayers>(e).unwrap(), non_interacting_enemy_layers());
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
}

#[test]
fn death_trigger_leaves_healthy_enemy_alive() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());

    let e = world
        .spawn((
            Enemy,
            EnemyVitals::new(10.0),
            EnemyLifeState::Alive,
            enemy_layers(),
            LinearVelocity::ZERO,
            Sprite::default(),
        ))
        .id();

    let _ = world.run_system_once(enemy_death_trigger);

    assert!(matches!(world.get::<EnemyLifeState>(e).unwrap(), EnemyLifeState::Alive));
    assert_eq!(*world.get::<CollisionLayers>(e).unwrap(), enemy_layers());
}

#[test]
fn death_progress_marks_pending_despawn_and_sets_dead() {
    let mut world = World::new();
    world.insert_resource(time_with_delta(1.0));

    let e = world
        .spawn((
            Enemy,
            EnemyLifeState::Dying {
                timer: Timer::from_seconds(0.1, TimerMode::Once),
            },
            Sprite::default(),
        ))
        .id();

    let _ = world.run_system_once(enemy_death_progress);
    world.flush();

    assert!(world.get::<PendingDespawn>(e).is_some());
    assert!(matches!(world.get::<EnemyLifeState>(e).unwrap(), EnemyLifeState::Dead));
}

#[test]
fn despawn_pass_removes_only_marked_enemies() {
    let mut world = World::new();
    let marked = world.spawn((Enemy, PendingDespawn)).id();
    let alive = world.spawn(Enemy).id();

    let _ = world.run_system_once(despawn_marked_enemies);
    world.flush();

    assert!(world.get_entity(marked).is_err());
    assert!(world.get_entity(alive).is_ok());
}

#[test]
fn hit_flash_lights_up_when_health_drops() {
    let mut world = World::new();
    world.insert_resource(time_with_delta(0.016));

    let t = EnemyTuning::default();
    let mut vitals = EnemyVitals::new(50.0);
    vitals.take_damage(10.0);

    let e = world
        .spawn((
            Enemy,
            vitals,
            EnemyKind::Melee,
            EnemyBrain::new(0.0, &t),
            EnemyLifeState::Alive,
            HitFlash::new(50.0),
            Sprite::default(),
        ))
        .id();

    let _ = world.run_system_once(enemy_hit_flash);

    let fx = world.get::<HitFlash>(e).unwrap();
    assert!(fx.flash.is_active());
    assert_eq!(fx.last_health, 40.0);
    let c = world.get::<Sprite>(e).unwrap().color.to_srgba();
    assert!(c.green > EnemyKind::Melee.color().to_srgba().green);
}
