//! Core plugin: shared resources, global settings and the restart hop.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::{Tunables, TUNABLES_PATH};

pub fn plugin(app: &mut App) {
    // Tests and tools may provide their own tunables before the plugin runs.
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::load_or_default(TUNABLES_PATH));
    }
    app.insert_resource(ClearColor(Color::srgb(0.52, 0.66, 0.82)));
    app.add_systems(OnEnter(GameState::Restarting), finish_restart);
}

/// The level was torn down on leaving `InGame`; enter it again to rebuild.
fn finish_restart(mut next: ResMut<NextState<GameState>>) {
    info!("level reset");
    next.set(GameState::InGame);
}

#[cfg(test)]
mod tests;
