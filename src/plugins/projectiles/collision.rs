//! Contact resolution for live projectiles.
//!
//! Ground absorbs a projectile. Players and enemies are hit through
//! `HitTarget`. Either way the charge is spent on the first contact, and any
//! later contact (same step or not) is ignored.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile, ProjectileState};
use crate::common::layers::{is_in_layer, Layer};
use crate::plugins::audio::SoundRequest;
use crate::plugins::combat::{hit_target, PlayerHitData};
use crate::plugins::enemies::EnemyVitals;
use crate::plugins::player::Player;
use crate::sim::combat::Impact;

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

pub fn process_projectile_collisions(
    mut started: MessageReader<CollisionStart>,
    spatial: SpatialQuery,
    mut sounds: MessageWriter<SoundRequest>,
    mut q_projectiles: Query<(&mut Projectile, &mut ProjectileState), With<PooledProjectile>>,
    q_layers: Query<&CollisionLayers, Without<PooledProjectile>>,
    mut q_players: Query<PlayerHitData, With<Player>>,
    mut q_enemies: Query<&'static mut EnemyVitals, Without<Player>>,
) {
    for ev in started.read() {
        let (t1, t2) = targets(ev);

        let p1 = q_projectiles.contains(t1.collider);
        let p2 = q_projectiles.contains(t2.collider);
        if !(p1 ^ p2) {
            continue;
        }
        let (projectile_side, other_side) = if p1 { (t1, t2) } else { (t2, t1) };

        let Ok((mut projectile, mut state)) = q_projectiles.get_mut(projectile_side.collider) else {
            continue;
        };
        if *state != ProjectileState::Active {
            continue;
        }

        let other = other_side.gameplay_owner();
        if projectile.owner == Some(other) {
            continue;
        }
        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };

        let impact = if is_in_layer(other_layers, Layer::Ground) {
            projectile.charge.strike(None)
        } else if is_in_layer(other_layers, Layer::Player) || is_in_layer(other_layers, Layer::Enemy) {
            match hit_target(other, &mut q_players, &mut q_enemies, &spatial, &mut sounds) {
                Some(mut target) => projectile.charge.strike(Some(&mut target)),
                None => projectile.charge.strike(None),
            }
        } else {
            continue;
        };

        if impact != Impact::Ignored {
            *state = ProjectileState::PendingReturn;
            trace!(?other, ?impact, "projectile spent");
        }
    }
}
