use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::components::{PooledProjectile, Projectile, ProjectileEntity, ProjectileState};
use crate::common::{layers::Layer, state::GameState, tunables::Tunables};

#[derive(Resource, Debug)]
pub struct ProjectilePool {
    free: Vec<ProjectileEntity>,
    capacity: usize,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn pop_free(&mut self) -> Option<ProjectileEntity> {
        self.free.pop()
    }

    #[inline]
    pub fn push_free(&mut self, e: ProjectileEntity) {
        self.free.push(e);
    }
}

#[inline]
pub fn active_projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyProjectile, [Layer::Ground, Layer::Player])
}

/// Empty filters: an inactive projectile collides with nothing and never
/// produces collision events.
#[inline]
pub fn inactive_projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyProjectile, [] as [Layer; 0])
}

/// Pre-spawn the pool for this level run. Everything is inactive and
/// despawned with the level.
pub fn init_projectile_pool(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut pool: ResMut<ProjectilePool>,
) {
    let cap = tunables.projectiles.capacity;
    let radius = tunables.projectiles.radius;
    *pool = ProjectilePool::new(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Projectile(Pooled)"),
                PooledProjectile,
                ProjectileState::Inactive,
                Projectile::idle(),
                Sprite {
                    color: Color::srgb(1.0, 0.55, 0.2),
                    custom_size: Some(Vec2::splat(radius * 2.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.0),
                Visibility::Hidden,
                (
                    RigidBody::Dynamic,
                    GravityScale(0.0),
                    Collider::circle(radius),
                    Sensor,
                    inactive_projectile_layers(),
                    LinearVelocity(Vec2::ZERO),
                    CollisionEventsEnabled,
                ),
                DespawnOnExit(GameState::InGame),
            ))
            .id();

        pool.push_free(ProjectileEntity(e));
    }
}
