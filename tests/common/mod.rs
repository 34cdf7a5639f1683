//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - `ridge_runner::game::configure_headless` installs the gameplay plugins.
//! - time advances by exactly one fixed step per `update()`.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use ridge_runner::common::tunables::Tunables;
use ridge_runner::game::FIXED_HZ;
use ridge_runner::plugins::player::PlayerEntity;
use ridge_runner::sim::controller::PlayerController;

pub fn app_headless() -> App {
    app_headless_with(Tunables::default())
}

/// Tunables are inserted before the plugins so the asset file is not read.
pub fn app_headless_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(tunables);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / FIXED_HZ,
    )));

    ridge_runner::game::configure_headless(&mut app);
    // `App::run` would do this; tests drive `update()` directly.
    app.finish();
    app.cleanup();
    app
}

pub fn player_entity(app: &App) -> Option<Entity> {
    app.world().resource::<PlayerEntity>().0
}

pub fn controller(app: &App) -> Option<&PlayerController> {
    player_entity(app).and_then(|e| app.world().get::<PlayerController>(e))
}

/// Runs frames until `done` holds, for at most `max_frames`.
pub fn run_until(app: &mut App, max_frames: usize, mut done: impl FnMut(&App) -> bool) -> bool {
    for _ in 0..max_frames {
        app.update();
        if done(app) {
            return true;
        }
    }
    false
}
