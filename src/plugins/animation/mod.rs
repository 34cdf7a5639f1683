//! Animation plugin: the `AnimationSink` end of the player core.
//!
//! There are no sprite sheets. `Animator` stores the parameters the core sets
//! and `present_animation` turns them into colour and size tweaks on a plain
//! sprite. The physics `Transform` is never touched, so collider scale stays 1.

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::sim::ports::{anim, AnimationSink};

#[derive(Component, Debug, Default)]
pub struct Animator {
    bools: HashMap<&'static str, bool>,
    pending: Vec<&'static str>,
}

impl Animator {
    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    /// Triggers fired since the last call, oldest first.
    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.pending)
    }
}

impl AnimationSink for Animator {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    fn set_trigger(&mut self, name: &'static str) {
        self.pending.push(name);
    }
}

/// Decaying presentation state derived from triggers.
#[derive(Component, Debug, Clone)]
pub struct AnimationFx {
    base_color: Color,
    base_size: Vec2,
    hurt: f32,
    attack: f32,
    jump: f32,
    dead: bool,
}

impl AnimationFx {
    pub fn new(base_color: Color, base_size: Vec2) -> Self {
        Self {
            base_color,
            base_size,
            hurt: 0.0,
            attack: 0.0,
            jump: 0.0,
            dead: false,
        }
    }

    fn fire(&mut self, trigger: &str) {
        match trigger {
            anim::HURT => self.hurt = 1.0,
            anim::ATTACK => self.attack = 1.0,
            anim::JUMP => self.jump = 1.0,
            anim::DEATH => self.dead = true,
            _ => {}
        }
    }

    fn decay(&mut self, dt: f32) {
        self.hurt = (self.hurt - 5.0 * dt).max(0.0);
        self.attack = (self.attack - 6.0 * dt).max(0.0);
        self.jump = (self.jump - 4.0 * dt).max(0.0);
    }

    fn color(&self, sprinting: bool) -> Color {
        if self.dead {
            return Color::srgb(0.45, 0.45, 0.48);
        }
        let mut c = self.base_color.to_srgba();
        if sprinting {
            c.red = (c.red + 0.15).min(1.0);
            c.green = (c.green + 0.1).min(1.0);
        }
        c.red = (c.red + self.hurt * 0.8).min(1.0);
        c.green = (c.green * (1.0 - self.hurt * 0.6)).max(0.0);
        c.blue = (c.blue * (1.0 - self.hurt * 0.6)).max(0.0);
        c.into()
    }

    fn size(&self, grounded: bool) -> Vec2 {
        if self.dead {
            return Vec2::new(self.base_size.y, self.base_size.x);
        }
        let squash = self.attack * 0.25;
        let stretch = if grounded { 0.0 } else { self.jump * 0.2 };
        Vec2::new(
            self.base_size.x * (1.0 + squash - stretch * 0.5),
            self.base_size.y * (1.0 - squash * 0.5 + stretch),
        )
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, (attach_fx, present_animation).chain());
}

/// Captures the spawn-time look of every animated sprite as its base.
fn attach_fx(
    mut commands: Commands,
    q: Query<(Entity, &Sprite), (With<Animator>, Without<AnimationFx>)>,
) {
    for (e, sprite) in &q {
        let size = sprite.custom_size.unwrap_or(Vec2::splat(24.0));
        commands.entity(e).insert(AnimationFx::new(sprite.color, size));
    }
}

fn present_animation(
    time: Res<Time>,
    mut q: Query<(&mut Animator, &mut AnimationFx, &mut Sprite, Option<&LinearVelocity>)>,
) {
    let dt = time.delta_secs();

    for (mut animator, mut fx, mut sprite, velocity) in &mut q {
        for trigger in animator.take_triggers() {
            fx.fire(trigger);
        }
        fx.decay(dt);

        if let Some(v) = velocity
            && v.x.abs() > 1.0
        {
            sprite.flip_x = v.x < 0.0;
        }

        sprite.color = fx.color(animator.get_bool(anim::SPRINTING));
        sprite.custom_size = Some(fx.size(animator.get_bool(anim::GROUNDED)));
    }
}
