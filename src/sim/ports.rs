//! Capabilities the simulation core consumes from its collaborators.
//!
//! Physics is mandatory. Animation, audio and the level reset are optional:
//! a missing collaborator means the call is skipped.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

/// Animation parameter names understood by the presentation layer.
pub mod anim {
    pub const GROUNDED: &str = "grounded";
    pub const RUNNING: &str = "running";
    pub const SPRINTING: &str = "sprinting";
    pub const JUMP: &str = "jump";
    pub const ATTACK: &str = "attack";
    pub const HURT: &str = "hurt";
    pub const DEATH: &str = "death";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    Attack,
    Hurt,
    Death,
    BreathDepleted,
    BreathRecovered,
    EnemyHit,
    ProjectileFired,
}

impl SoundCue {
    pub const ALL: [SoundCue; 8] = [
        SoundCue::Jump,
        SoundCue::Attack,
        SoundCue::Hurt,
        SoundCue::Death,
        SoundCue::BreathDepleted,
        SoundCue::BreathRecovered,
        SoundCue::EnemyHit,
        SoundCue::ProjectileFired,
    ];

    /// Asset path of the clip, relative to the asset root.
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundCue::Jump => "audio/jump.ogg",
            SoundCue::Attack => "audio/attack.ogg",
            SoundCue::Hurt => "audio/hurt.ogg",
            SoundCue::Death => "audio/death.ogg",
            SoundCue::BreathDepleted => "audio/breath_depleted.ogg",
            SoundCue::BreathRecovered => "audio/breath_recovered.ogg",
            SoundCue::EnemyHit => "audio/enemy_hit.ogg",
            SoundCue::ProjectileFired => "audio/projectile.ogg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub distance: f32,
    pub normal: Vec2,
}

/// The body this controller owns. Only its controller writes its velocity.
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
}

/// Read-only geometry queries against the physics world.
pub trait PhysicsQuery {
    fn overlap_circle(&self, point: Vec2, radius: f32, mask: LayerMask) -> bool;
    fn raycast(&self, origin: Vec2, dir: Dir2, max_distance: f32, mask: LayerMask) -> Option<RayHit>;
}

/// Fire-and-forget animation parameters.
pub trait AnimationSink {
    fn set_bool(&mut self, name: &'static str, value: bool);
    fn set_trigger(&mut self, name: &'static str);
}

pub trait AudioSink {
    fn play_one_shot(&mut self, cue: SoundCue);
}

pub trait SceneReset {
    fn restart_current_level(&mut self);
}

/// Collaborators handed to the controller for one call.
pub struct PlayerPorts<'a> {
    pub body: &'a mut dyn PhysicsBody,
    pub query: &'a dyn PhysicsQuery,
    pub animation: Option<&'a mut dyn AnimationSink>,
    pub audio: Option<&'a mut dyn AudioSink>,
    pub scene: Option<&'a mut dyn SceneReset>,
}

impl PlayerPorts<'_> {
    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        if let Some(animation) = self.animation.as_mut() {
            animation.set_bool(name, value);
        }
    }

    pub fn set_trigger(&mut self, name: &'static str) {
        if let Some(animation) = self.animation.as_mut() {
            animation.set_trigger(name);
        }
    }

    pub fn play(&mut self, cue: SoundCue) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play_one_shot(cue);
        }
    }

    /// Returns `false` when no reset collaborator is bound.
    pub fn restart_level(&mut self) -> bool {
        match self.scene.as_mut() {
            Some(scene) => {
                scene.restart_current_level();
                true
            }
            None => false,
        }
    }
}
