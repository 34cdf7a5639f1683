//! Projectiles plugin: message-based spawning into a pre-allocated pool.
//!
//! ```text
//!   FixedUpdate
//!     enemy AI ──► SpawnProjectileRequest
//!     allocate_projectiles_from_pool   (single writer of the pool free list)
//!
//!   FixedPostUpdate (after Avian emits CollisionStart)
//!     process_projectile_collisions    Active -> PendingReturn on first contact
//!     expire_projectiles               off-screen grace / max lifetime
//!     return_to_pool_commit            PendingReturn -> Inactive, back to pool
//! ```
//!
//! Producers never borrow `ProjectilePool`; they only enqueue intent. The pool
//! is rebuilt on every entry into `InGame` and despawned with the level.

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod lifetime;
pub mod messages;
pub mod pool;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::enemies::EnemyBrains;

pub fn plugin(app: &mut App) {
    app.insert_resource(pool::ProjectilePool::new(0))
        .add_message::<messages::SpawnProjectileRequest>()
        .add_systems(OnEnter(GameState::InGame), pool::init_projectile_pool);

    app.add_systems(
        FixedUpdate,
        allocator::allocate_projectiles_from_pool
            .after(EnemyBrains)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        (
            collision::process_projectile_collisions,
            lifetime::expire_projectiles,
            commit::return_to_pool_commit,
        )
            .chain()
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}
