//! Camera plugin (render-only): follow, parallax backdrop, trauma shake.
//!
//! `follow_player` is the only writer of the camera transform. It removes last
//! frame's shake offset before following so the shake never accumulates drift.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera + parallax layers, write MainCameraEntity
//! PostUpdate:      gather trauma -> follow_player -> scroll_parallax
//! ```

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::{CameraTuning, Tunables};
use crate::common::units::UnitF32;
use crate::plugins::player::{Player, PlayerEntity, PlayerEvent};
use crate::sim::controller::PlayerController;

#[derive(Component)]
pub struct MainCamera;

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct MainCameraEntity(pub Option<Entity>);

/// Backdrop strip that scrolls at `factor` of the camera's speed.
#[derive(Component, Debug, Clone, Copy)]
pub struct ParallaxLayer {
    pub factor: f32,
    pub base: Vec2,
}

#[derive(Resource, Debug, Default)]
pub struct CameraShake {
    trauma: UnitF32,
    phase: f32,
    prev_offset: Vec2,
    last_health: Option<f32>,
}

impl CameraShake {
    pub fn trauma(&self) -> f32 {
        self.trauma.get()
    }

    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma.add_clamped(amount);
    }

    /// Hurt is a drop of the relayed health; death always shakes.
    fn observe(&mut self, event: &PlayerEvent, tuning: &CameraTuning) {
        match *event {
            PlayerEvent::HealthChanged(reading) => {
                if self.last_health.is_some_and(|last| reading.current < last) {
                    self.add_trauma(tuning.hurt_trauma);
                }
                self.last_health = Some(reading.current);
            }
            PlayerEvent::Died(_) => self.add_trauma(tuning.death_trauma),
            _ => {}
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<MainCameraEntity>()
        .init_resource::<CameraShake>()
        .add_systems(OnEnter(GameState::InGame), (spawn_camera, spawn_parallax))
        .add_systems(
            PostUpdate,
            (gather_trauma, follow_player, scroll_parallax)
                .chain()
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands, tunables: Res<Tunables>, mut shake: ResMut<CameraShake>) {
    let spawn = tunables.level.spawn_point();
    let e = commands
        .spawn((
            Name::new("MainCamera"),
            Camera2d,
            MainCamera,
            FireflyConfig::default(),
            Transform::from_xyz(spawn.x, spawn.y, 999.0),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    commands.insert_resource(MainCameraEntity(Some(e)));
    *shake = CameraShake::default();
}

fn spawn_parallax(mut commands: Commands, tunables: Res<Tunables>) {
    let cam = &tunables.camera;
    let width = tunables.level.half_width * 4.0;
    let layers = [
        (cam.parallax_far, Vec2::new(0.0, 180.0), 520.0, Color::srgb(0.42, 0.52, 0.68), -20.0),
        (cam.parallax_near, Vec2::new(0.0, 60.0), 260.0, Color::srgb(0.33, 0.42, 0.47), -10.0),
    ];

    for (factor, base, height, color, z) in layers {
        commands.spawn((
            Name::new("ParallaxLayer"),
            ParallaxLayer { factor, base },
            Sprite::from_color(color, Vec2::new(width, height)),
            Transform::from_translation(base.extend(z)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn gather_trauma(
    mut events: MessageReader<PlayerEvent>,
    tunables: Res<Tunables>,
    mut shake: ResMut<CameraShake>,
) {
    for event in events.read() {
        shake.observe(event, &tunables.camera);
    }
}

/// Exponential smoothing factor for one frame.
#[inline]
fn follow_alpha(responsiveness: f32, dt: f32) -> f32 {
    1.0 - (-responsiveness * dt).exp()
}

/// Deterministic pseudo-noise scaled by trauma squared.
fn shake_offset(trauma: f32, phase: f32, max_shake: f32) -> Vec2 {
    let x = (phase * 37.0 * TAU).sin() + 0.5 * (phase * 61.0 * TAU).sin();
    let y = (phase * 41.0 * TAU).cos() + 0.5 * (phase * 53.0 * TAU).cos();
    Vec2::new(x, y).clamp_length_max(1.0) * max_shake * trauma * trauma
}

fn follow_player(
    time: Res<Time>,
    tunables: Res<Tunables>,
    player_e: Res<PlayerEntity>,
    cam_e: Res<MainCameraEntity>,
    mut shake: ResMut<CameraShake>,
    q_player: Query<(&Transform, &PlayerController), (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let Some(cam) = cam_e.0 else {
        return;
    };
    let Ok(mut tf_cam) = q_cam.get_mut(cam) else {
        return;
    };
    let tuning = &tunables.camera;
    let dt = time.delta_secs();

    let prev = std::mem::take(&mut shake.prev_offset);
    tf_cam.translation -= prev.extend(0.0);

    if let Some((tf_player, controller)) = player_e.0.and_then(|e| q_player.get(e).ok()) {
        let target = tf_player.translation.truncate() + Vec2::X * controller.facing() * tuning.look_ahead;
        let alpha = follow_alpha(tuning.responsiveness, dt);
        let current = tf_cam.translation.truncate();
        let next = current + (target - current) * alpha;
        tf_cam.translation.x = next.x;
        tf_cam.translation.y = next.y;
    }

    shake.phase += dt;
    shake.trauma.decay_to_zero(tuning.trauma_decay, dt);
    if shake.trauma.is_active() {
        let offset = shake_offset(shake.trauma.get(), shake.phase, tuning.max_shake);
        tf_cam.translation += offset.extend(0.0);
        shake.prev_offset = offset;
    }
}

fn scroll_parallax(
    cam_e: Res<MainCameraEntity>,
    shake: Res<CameraShake>,
    q_cam: Query<&Transform, (With<MainCamera>, Without<ParallaxLayer>)>,
    mut q_layers: Query<(&ParallaxLayer, &mut Transform), Without<MainCamera>>,
) {
    let Some(tf_cam) = cam_e.0.and_then(|e| q_cam.get(e).ok()) else {
        return;
    };
    // Backdrops follow the steady camera, not the shake.
    let cam = tf_cam.translation.truncate() - shake.prev_offset;

    for (layer, mut tf) in &mut q_layers {
        let p = layer.base + cam * (1.0 - layer.factor);
        tf.translation.x = p.x;
        tf.translation.y = p.y;
    }
}
