//! ECS implementations of the simulation ports.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::sim::ports::{PhysicsBody, PhysicsQuery, RayHit, SceneReset};

/// One body for the duration of a controller call: position is a snapshot,
/// velocity writes go straight to the component.
pub struct AvianBody<'a> {
    position: Vec2,
    velocity: &'a mut LinearVelocity,
}

impl<'a> AvianBody<'a> {
    pub fn new(transform: &Transform, velocity: &'a mut LinearVelocity) -> Self {
        Self {
            position: transform.translation.truncate(),
            velocity,
        }
    }
}

impl PhysicsBody for AvianBody<'_> {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity.0
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity.0 = velocity;
    }
}

impl PhysicsQuery for SpatialQuery<'_, '_> {
    fn overlap_circle(&self, point: Vec2, radius: f32, mask: LayerMask) -> bool {
        let filter = SpatialQueryFilter::from_mask(mask);
        !self
            .shape_intersections(&Collider::circle(radius), point, 0.0, &filter)
            .is_empty()
    }

    fn raycast(&self, origin: Vec2, dir: Dir2, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let filter = SpatialQueryFilter::from_mask(mask);
        self.cast_ray(origin, dir, max_distance, true, &filter)
            .map(|hit| RayHit {
                point: origin + *dir * hit.distance,
                distance: hit.distance,
                normal: hit.normal,
            })
    }
}

impl SceneReset for NextState<GameState> {
    fn restart_current_level(&mut self) {
        self.set(GameState::Restarting);
    }
}
