//! Return commit: recycle projectiles back into the pool.
//!
//! This system owns the inactive invariants: hidden, zero velocity, empty
//! collision filters, free-listed exactly once.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledProjectile, ProjectileEntity, ProjectileState};
use super::pool::{inactive_projectile_layers, ProjectilePool};

pub fn return_to_pool_commit(
    mut pool: ResMut<ProjectilePool>,
    mut q: Query<
        (
            Entity,
            &mut ProjectileState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledProjectile>,
    >,
) {
    for (e, mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != ProjectileState::PendingReturn {
            continue;
        }

        *state = ProjectileState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_projectile_layers();

        pool.push_free(ProjectileEntity(e));
    }
}
