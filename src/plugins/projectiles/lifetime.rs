//! Expiry: projectiles that leave the level box for longer than the grace
//! period, or outlive `max_lifetime`, are marked for return.

use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile, ProjectileState};
use crate::common::tunables::Tunables;

pub fn expire_projectiles(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q: Query<(&Transform, &mut Projectile, &mut ProjectileState), With<PooledProjectile>>,
) {
    let dt = time.delta_secs();
    let level = &tunables.level;
    let limits = &tunables.projectiles;

    for (tf, mut projectile, mut state) in &mut q {
        if *state != ProjectileState::Active {
            continue;
        }

        projectile.age += dt;
        if level.contains(tf.translation.truncate()) {
            projectile.offscreen_for = 0.0;
        } else {
            projectile.offscreen_for += dt;
        }

        if projectile.offscreen_for >= limits.offscreen_grace || projectile.age >= limits.max_lifetime {
            *state = ProjectileState::PendingReturn;
        }
    }
}
