mod common;

use avian2d::prelude::*;
use bevy::prelude::*;
use ridge_runner::common::state::GameState;
use ridge_runner::plugins::enemies::Enemy;
use ridge_runner::plugins::player::Player;
use ridge_runner::plugins::projectiles::pool::ProjectilePool;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );
}

#[test]
fn player_interpolation_pipeline_is_wired() {
    let mut app = common::app_headless();
    for _ in 0..5 {
        app.update();
    }

    let ok = app
        .world_mut()
        .query::<(&Player, &TranslationInterpolation)>()
        .iter(app.world())
        .next()
        .is_some();

    assert!(ok, "Player should opt in to smoothing via TranslationInterpolation");
}

#[test]
fn level_spawns_enemies_and_a_full_pool() {
    let mut app = common::app_headless();
    app.update();

    let enemies = app.world_mut().query::<&Enemy>().iter(app.world()).count();
    assert!(enemies > 0);

    let pool = app.world().resource::<ProjectilePool>();
    assert!(pool.capacity() > 0);
    assert!(pool.free_len() <= pool.capacity());
}

#[test]
fn player_starts_alive_with_full_gauges() {
    let mut app = common::app_headless();
    app.update();

    let controller = common::controller(&app).expect("player spawned");
    assert!(!controller.is_dead());
    assert_eq!(controller.current_health(), controller.max_health());
    assert_eq!(controller.current_breath(), controller.max_breath());
}
