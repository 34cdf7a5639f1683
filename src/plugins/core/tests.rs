use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core;

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
}

#[test]
fn keeps_tunables_provided_up_front() {
    let mut app = App::new();
    let mut tunables = Tunables::default();
    tunables.gravity = 123.0;
    app.insert_resource(tunables);

    core::plugin(&mut app);

    assert_eq!(app.world().resource::<Tunables>().gravity, 123.0);
}

#[test]
fn restarting_hops_back_into_the_game() {
    let mut app = App::new();
    app.add_plugins(StatesPlugin).init_state::<GameState>();
    core::plugin(&mut app);
    app.update();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Restarting);
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Restarting);

    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
}
