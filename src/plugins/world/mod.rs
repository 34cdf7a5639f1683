//! World plugin: ground platforms, pits and the side walls.
//!
//! ```text
//!            ┌──┐                ┌──┐                       ┌──┐
//!  │        ─┴──┴─              ─┴──┴─                     ─┴──┴─        │
//!  │ ████████████████   pit   ██████████████████   pit   ███████████████ │
//! -W                                                                     +W
//! ```
//!
//! Platform tops sit at `y = 0` unless they float. Pits are plain gaps: a
//! player who drops through one eventually crosses `fall_death_y`.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::{LevelTuning, Tunables};

const PLATFORM_THICKNESS: f32 = 64.0;
const FLOATING_THICKNESS: f32 = 20.0;
const WALL_THICKNESS: f32 = 40.0;

/// A horizontal slab described by its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub x_min: f32,
    pub x_max: f32,
    pub top: f32,
    pub thickness: f32,
}

impl Platform {
    fn ground(x_min: f32, x_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            top: 0.0,
            thickness: PLATFORM_THICKNESS,
        }
    }

    fn floating(center_x: f32, top: f32, width: f32) -> Self {
        Self {
            x_min: center_x - width * 0.5,
            x_max: center_x + width * 0.5,
            top,
            thickness: FLOATING_THICKNESS,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.x_max - self.x_min, self.thickness)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x_min + self.x_max) * 0.5, self.top - self.thickness * 0.5)
    }
}

/// Ground segments (with pits between them) then floating platforms.
/// Pieces that do not fit between the walls are left out.
fn layout(level: &LevelTuning) -> Vec<Platform> {
    let w = level.half_width;
    [
        Platform::ground(-w, -300.0),
        Platform::ground(-180.0, 500.0),
        Platform::ground(620.0, w),
        Platform::floating(-560.0, 120.0, 220.0),
        Platform::floating(260.0, 140.0, 200.0),
        Platform::floating(900.0, 110.0, 200.0),
    ]
    .into_iter()
    .filter(|p| p.x_min < p.x_max && p.x_min >= -w && p.x_max <= w)
    .collect()
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_level);
}

#[inline]
fn ground_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Ground,
        [Layer::Player, Layer::Enemy, Layer::EnemyProjectile],
    )
}

fn spawn_level(mut commands: Commands, tunables: Res<Tunables>) {
    let level = &tunables.level;
    let ground_color = Color::srgb(0.24, 0.3, 0.22);
    let wall_color = Color::srgb(0.2, 0.22, 0.26);

    let mut spawn_block = |name: &'static str, center: Vec2, size: Vec2, color: Color| {
        commands.spawn((
            Name::new(name),
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(center.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            ground_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    };

    for platform in layout(level) {
        spawn_block("Platform", platform.center(), platform.size(), ground_color);
    }

    let wall_height = level.max_y - level.min_y;
    let wall_y = (level.max_y + level.min_y) * 0.5;
    for side in [-1.0, 1.0] {
        let x = side * (level.half_width + WALL_THICKNESS * 0.5);
        spawn_block(
            "Wall",
            Vec2::new(x, wall_y),
            Vec2::new(WALL_THICKNESS, wall_height),
            wall_color,
        );
    }
}
