//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, latch edges into `PlayerInput`
//! - FixedUpdate: feed intent to the `PlayerController`, tick it against the
//!   Avian body, start melee swings, freeze the body once dead
//! - PostUpdate: relay controller notifications as `PlayerEvent` messages
//!
//! `PlayerEntity` is written once at spawn; other plugins look the player up by
//! that handle instead of scanning for the marker.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::animation::Animator;
use crate::plugins::audio::SoundRequest;
use crate::plugins::combat::MeleeSwing;
use crate::sim::controller::PlayerController;
use crate::sim::ports::{AnimationSink, AudioSink, PlayerPorts};

pub mod adapters;
pub mod relay;

use adapters::AvianBody;
pub use relay::{PlayerEvent, PlayerEventOutbox};

const RADIUS: f32 = 12.0;
const BODY_LENGTH: f32 = 24.0;

#[derive(Component)]
pub struct Player;

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerEntity(pub Option<Entity>);

/// Input sampled in `Update`. Press edges stay latched until a fixed tick
/// consumes them, so a press between two ticks is never lost.
#[derive(Resource, Default, Debug)]
struct PlayerInput {
    move_axis: f32,
    sprint_held: bool,
    jump_pressed: bool,
    attack_pressed: bool,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerSimulation;

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .init_resource::<PlayerEntity>()
        .init_resource::<PlayerEventOutbox>()
        .add_message::<PlayerEvent>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(OnExit(GameState::InGame), forget_player)
        .add_systems(Update, gather_input.run_if(in_state(GameState::InGame)))
        .add_systems(
            FixedUpdate,
            (apply_intent, simulate_player, freeze_dead_player)
                .chain()
                .in_set(PlayerSimulation)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(PostUpdate, relay::relay_player_events);
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>, outbox: Res<PlayerEventOutbox>) {
    let mut controller = PlayerController::new(tunables.player.clone());
    outbox.attach(&mut controller);

    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::Ground, Layer::Enemy, Layer::EnemyProjectile],
    );
    let spawn = tunables.level.spawn_point();

    let e = commands
        .spawn((
            Name::new("Player"),
            Player,
            controller,
            Animator::default(),
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(Vec2::new(RADIUS * 2.0, BODY_LENGTH + RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(spawn.x, spawn.y, 1.0),
            RigidBody::Dynamic,
            Collider::capsule(RADIUS, BODY_LENGTH),
            LockedAxes::ROTATION_LOCKED,
            Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
            layers,
            LinearVelocity::ZERO,
            TranslationInterpolation,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    commands.insert_resource(PlayerEntity(Some(e)));
    debug!(?e, ?spawn, "spawned player");
}

fn forget_player(mut player: ResMut<PlayerEntity>) {
    player.0 = None;
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };

    let left = keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    let right = keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
    input.move_axis = match (left, right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    input.sprint_held = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    input.jump_pressed |= keys.any_just_pressed([KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp]);
    input.attack_pressed |= keys.any_just_pressed([KeyCode::KeyJ, KeyCode::KeyK]);
}

fn apply_intent(
    mut input: ResMut<PlayerInput>,
    mut q_player: Query<&mut PlayerController, With<Player>>,
) {
    let jump = std::mem::take(&mut input.jump_pressed);
    let attack = std::mem::take(&mut input.attack_pressed);

    let Ok(mut controller) = q_player.single_mut() else {
        return;
    };

    controller.set_move_axis(input.move_axis);
    controller.set_wants_to_sprint(input.sprint_held);
    if jump {
        controller.request_jump();
    }
    if attack {
        controller.request_attack();
    }
}

fn simulate_player(
    time: Res<Time>,
    tunables: Res<Tunables>,
    spatial: SpatialQuery,
    mut sounds: MessageWriter<SoundRequest>,
    mut next_state: ResMut<NextState<GameState>>,
    mut commands: Commands,
    mut q_player: Query<
        (
            Entity,
            &mut PlayerController,
            &Transform,
            &mut LinearVelocity,
            Option<&mut Animator>,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (e, mut controller, tf, mut velocity, mut animator) in &mut q_player {
        let mut body = AvianBody::new(tf, &mut velocity);
        let mut ports = PlayerPorts {
            body: &mut body,
            query: &spatial,
            animation: animator
                .as_deref_mut()
                .map(|a| a as &mut dyn AnimationSink),
            audio: Some(&mut sounds as &mut dyn AudioSink),
            scene: Some(&mut *next_state),
        };

        let report = controller.tick(dt, &mut ports);

        if report.attack_started {
            let swing = MeleeSwing::new(&tunables.player_attack, controller.facing(), Layer::Enemy);
            commands.entity(e).insert(swing);
        }
    }
}

/// A dead player stops being simulated by Avian and loses any swing in flight.
fn freeze_dead_player(
    mut commands: Commands,
    q_player: Query<(Entity, &PlayerController), (With<Player>, Without<RigidBodyDisabled>)>,
) {
    for (e, controller) in &q_player {
        if controller.is_dead() {
            commands
                .entity(e)
                .insert(RigidBodyDisabled)
                .remove::<MeleeSwing>();
        }
    }
}
