//! Lighting plugin (Firefly) (render-only).
//!
//! A point light rides on the player and shrinks as breath runs out.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::{Player, PlayerEntity, PlayerEvent};

const FULL_RANGE: f32 = 450.0;
/// Share of the range left at zero breath.
const MIN_RANGE_SHARE: f32 = 0.55;

#[derive(Component)]
pub struct PlayerLight {
    pub full_range: f32,
}

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(
            Update,
            (follow_player_light, dim_with_breath).run_if(in_state(GameState::InGame)),
        );
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight {
            full_range: FULL_RANGE,
        },
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: FULL_RANGE,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

#[inline]
fn range_for_breath(full_range: f32, breath_share: f32) -> f32 {
    let share = breath_share.clamp(0.0, 1.0);
    full_range * (MIN_RANGE_SHARE + (1.0 - MIN_RANGE_SHARE) * share)
}

fn follow_player_light(
    player_e: Res<PlayerEntity>,
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Some(tf_player) = player_e.0.and_then(|e| q_player.get(e).ok()) else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}

fn dim_with_breath(
    mut events: MessageReader<PlayerEvent>,
    mut q_light: Query<(&PlayerLight, &mut PointLight2d)>,
) {
    let Some(breath) = events
        .read()
        .filter_map(|e| match e {
            PlayerEvent::BreathChanged(r) => Some(*r),
            _ => None,
        })
        .last()
    else {
        return;
    };

    for (light, mut point) in &mut q_light {
        point.radius = range_for_breath(light.full_range, breath.percentage());
    }
}
