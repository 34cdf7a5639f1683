//! Melee strikes resolved through the real spatial query.

mod common;

use avian2d::prelude::*;
use bevy::prelude::*;
use ridge_runner::common::layers::Layer;
use ridge_runner::plugins::combat::MeleeStrikeRequest;
use ridge_runner::plugins::enemies::EnemyVitals;

const ARENA: Vec2 = Vec2::new(0.0, 5_000.0);

fn spawn_dummy(app: &mut App, at: Vec2) -> Entity {
    app.world_mut()
        .spawn((
            EnemyVitals::new(100.0),
            RigidBody::Static,
            Collider::circle(8.0),
            CollisionLayers::new(Layer::Enemy, [Layer::Player]),
            Transform::from_translation(at.extend(0.0)),
        ))
        .id()
}

fn health(app: &App, e: Entity) -> f32 {
    app.world().get::<EnemyVitals>(e).expect("dummy alive").health().current
}

#[test]
fn strike_hits_each_target_in_radius_once_and_skips_the_source() {
    let mut app = common::app_headless();
    app.update();

    let source = spawn_dummy(&mut app, ARENA);
    let near = spawn_dummy(&mut app, ARENA + Vec2::new(20.0, 0.0));
    let also_near = spawn_dummy(&mut app, ARENA + Vec2::new(-15.0, 10.0));
    let far = spawn_dummy(&mut app, ARENA + Vec2::new(400.0, 0.0));

    // Let the physics step pick the new colliders up.
    for _ in 0..3 {
        app.update();
    }

    app.world_mut().write_message(MeleeStrikeRequest {
        source,
        origin: ARENA,
        radius: 30.0,
        damage: 25.0,
        targets: Layer::Enemy.into(),
    });
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(health(&app, near), 75.0);
    assert_eq!(health(&app, also_near), 75.0);
    assert_eq!(health(&app, source), 100.0);
    assert_eq!(health(&app, far), 100.0);
}

#[test]
fn strike_ignores_layers_outside_its_mask() {
    let mut app = common::app_headless();
    app.update();

    let source = spawn_dummy(&mut app, ARENA);
    let bystander = spawn_dummy(&mut app, ARENA + Vec2::new(10.0, 0.0));
    for _ in 0..3 {
        app.update();
    }

    app.world_mut().write_message(MeleeStrikeRequest {
        source,
        origin: ARENA,
        radius: 30.0,
        damage: 25.0,
        targets: Layer::Player.into(),
    });
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(health(&app, bystander), 100.0);
}
