//! Fake collaborators for driving the simulation core without an ECS world.

use std::sync::{Arc, Mutex};

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use super::controller::{PlayerConfig, PlayerController};
use super::ports::{AnimationSink, AudioSink, PhysicsBody, PhysicsQuery, PlayerPorts, RayHit, SceneReset, SoundCue};

#[derive(Debug, Default)]
pub struct FakeBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub writes: Vec<Vec2>,
}

impl PhysicsBody for FakeBody {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn velocity(&self) -> Vec2 {
        self.velocity
    }
    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.writes.push(velocity);
    }
}

/// Ground that is either everywhere or nowhere.
#[derive(Debug, Default)]
pub struct FakeGround {
    pub solid: bool,
    pub queries: std::cell::Cell<u32>,
}

impl PhysicsQuery for FakeGround {
    fn overlap_circle(&self, _point: Vec2, _radius: f32, _mask: LayerMask) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.solid
    }
    fn raycast(&self, origin: Vec2, _dir: Dir2, _max_distance: f32, _mask: LayerMask) -> Option<RayHit> {
        self.solid.then(|| RayHit {
            point: origin,
            distance: 0.0,
            normal: Vec2::Y,
        })
    }
}

#[derive(Debug, Default)]
pub struct AnimLog {
    pub bools: Vec<(&'static str, bool)>,
    pub triggers: Vec<&'static str>,
}

impl AnimLog {
    pub fn trigger_count(&self, name: &str) -> usize {
        self.triggers.iter().filter(|t| **t == name).count()
    }

    pub fn last_bool(&self, name: &str) -> Option<bool> {
        self.bools.iter().rev().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

impl AnimationSink for AnimLog {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.push((name, value));
    }
    fn set_trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }
}

#[derive(Debug, Default)]
pub struct AudioLog(pub Vec<SoundCue>);

impl AudioLog {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.0.iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for AudioLog {
    fn play_one_shot(&mut self, cue: SoundCue) {
        self.0.push(cue);
    }
}

#[derive(Debug, Default)]
pub struct ResetCounter(pub u32);

impl SceneReset for ResetCounter {
    fn restart_current_level(&mut self) {
        self.0 += 1;
    }
}

/// Everything a controller talks to, owned in one place.
#[derive(Debug, Default)]
pub struct Rig {
    pub body: FakeBody,
    pub ground: FakeGround,
    pub anim: AnimLog,
    pub audio: AudioLog,
    pub resets: ResetCounter,
}

impl Rig {
    pub fn grounded() -> Self {
        Self {
            ground: FakeGround {
                solid: true,
                ..default()
            },
            ..default()
        }
    }

    pub fn ports(&mut self) -> PlayerPorts<'_> {
        PlayerPorts {
            body: &mut self.body,
            query: &self.ground,
            animation: Some(&mut self.anim),
            audio: Some(&mut self.audio),
            scene: Some(&mut self.resets),
        }
    }

    /// Ports with every optional collaborator missing.
    pub fn bare_ports(&mut self) -> PlayerPorts<'_> {
        PlayerPorts {
            body: &mut self.body,
            query: &self.ground,
            animation: None,
            audio: None,
            scene: None,
        }
    }
}

/// Shared log that listeners can push into from `Send + Sync` closures.
pub fn recorder<T: Send + 'static>() -> Arc<Mutex<Vec<T>>> {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn controller(config: PlayerConfig) -> PlayerController {
    PlayerController::new(config)
}

pub use crate::common::test_utils::TestRng;
