//! Game composition root.
//!
//! - `configure_full`: window, renderer, gameplay and presentation plugins.
//! - `configure_headless`: gameplay only, for integration tests. The caller
//!   provides `MinimalPlugins`, `StatesPlugin` and the asset plugins.

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::plugins;

#[cfg(target_os = "windows")]
use bevy::render::{
    settings::{Backends, PowerPreference, WgpuSettings},
    RenderPlugin,
};

/// Simulation rate of the player core and physics.
pub const FIXED_HZ: f64 = 60.0;

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

fn default_plugins() -> PluginGroupBuilder {
    let group = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Ridge Runner".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    });

    // Vulkan is unreliable on some Windows drivers; prefer DX12 on the discrete GPU.
    #[cfg(target_os = "windows")]
    let group = group.set(RenderPlugin {
        render_creation: WgpuSettings {
            backends: Some(Backends::DX12),
            power_preference: PowerPreference::HighPerformance,
            ..default()
        }
        .into(),
        ..default()
    });

    group
}

pub fn configure_full(app: &mut App) {
    app.add_plugins(default_plugins());
    configure_game(app);
    plugins::register_render(app);
}

/// Never adds render-only plugins (Firefly, camera, HUD, audio playback).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

fn configure_game(app: &mut App) {
    app.init_state::<GameState>()
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));
    plugins::register_gameplay(app);
}
