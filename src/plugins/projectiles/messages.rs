//! Buffered spawn requests.
//!
//! Producers (enemy AI) write intent; the allocator is the single consumer
//! that touches the pool.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectileRequest {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub owner: Option<Entity>,
}
