use bevy::prelude::*;

use crate::sim::combat::ProjectileCharge;

#[derive(Component)]
pub struct PooledProjectile;

/// `PendingReturn` doubles as the "spent" mark: the projectile has hit
/// something (or expired) and waits for the return commit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub charge: ProjectileCharge,
    pub owner: Option<Entity>,
    pub age: f32,
    /// Continuous time spent outside the level box.
    pub offscreen_for: f32,
}

impl Projectile {
    pub fn idle() -> Self {
        Self {
            charge: ProjectileCharge::new(0.0),
            owner: None,
            age: 0.0,
            offscreen_for: 0.0,
        }
    }

    #[inline]
    pub fn reset_for_fire(&mut self, damage: f32, owner: Option<Entity>) {
        self.charge.rearm(damage);
        self.owner = owner;
        self.age = 0.0;
        self.offscreen_for = 0.0;
    }
}

/// A pooled projectile entity handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileEntity(pub Entity);
