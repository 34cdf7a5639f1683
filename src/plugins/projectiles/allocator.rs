//! Spawn consumer: activate projectiles from the pool.
//!
//! Every entity in the free list is a pooled projectile spawned by
//! `init_projectile_pool`; a free entry that fails the query is a bug and is
//! logged and dropped. An empty pool is a capacity decision: the request is dropped.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile, ProjectileEntity, ProjectileState};
use super::messages::SpawnProjectileRequest;
use super::pool::{active_projectile_layers, ProjectilePool};

pub fn allocate_projectiles_from_pool(
    mut pool: ResMut<ProjectilePool>,
    mut reader: MessageReader<SpawnProjectileRequest>,
    mut q: Query<
        (
            &mut ProjectileState,
            &mut Projectile,
            &mut Transform,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<PooledProjectile>,
    >,
) {
    for req in reader.read() {
        let Some(ProjectileEntity(e)) = pool.pop_free() else {
            debug!("projectile pool exhausted; dropping request");
            continue;
        };

        let Ok((mut state, mut projectile, mut tf, mut vel, mut vis, mut layers)) = q.get_mut(e) else {
            error!(?e, "projectile pool held an entity without pooled projectile components");
            continue;
        };

        *state = ProjectileState::Active;
        projectile.reset_for_fire(req.damage, req.owner);
        tf.translation = req.pos.extend(2.0);
        vel.0 = req.vel;
        *vis = Visibility::Visible;
        *layers = active_projectile_layers();
    }
}
