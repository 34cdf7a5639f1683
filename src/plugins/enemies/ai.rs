//! Enemy decision making, free of ECS types so it can be tested directly.
//!
//! ```text
//!            player in detect range (melee kind)
//!   Patrol ───────────────────────────────────► Chase
//!     ▲  ◄───────────────────────────────────     │
//!     │        player lost / out of range         │ player in attack range
//!     │                                           │ and cooldown ready
//!     │            windup elapsed: strike         ▼
//!     └──────────────────────────────────────── Windup
//! ```
//!
//! Ranged enemies never chase; they patrol and fire from range.

use bevy::prelude::*;

use crate::common::tunables::EnemyTuning;
use crate::sim::combat::AttackCooldown;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Melee,
    Ranged,
}

impl EnemyKind {
    pub fn attack_range(self, tuning: &EnemyTuning) -> f32 {
        match self {
            EnemyKind::Melee => tuning.melee_range,
            EnemyKind::Ranged => tuning.ranged_range,
        }
    }

    pub fn color(self) -> Color {
        match self {
            EnemyKind::Melee => Color::srgb(0.9, 0.25, 0.25),
            EnemyKind::Ranged => Color::srgb(0.95, 0.6, 0.2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiMode {
    Patrol,
    Chase,
    Windup { remaining: f32 },
}

/// What an enemy knows this tick.
#[derive(Debug, Clone, Copy)]
pub struct Perception {
    pub x: f32,
    /// Offset from the enemy to a live player.
    pub to_player: Option<Vec2>,
    pub ground_left: bool,
    pub ground_right: bool,
}

impl Perception {
    #[inline]
    fn ground_ahead(&self, facing: f32) -> bool {
        if facing < 0.0 { self.ground_left } else { self.ground_right }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiStep {
    pub velocity_x: f32,
    pub began_windup: bool,
    /// The attack connects this tick.
    pub strike: bool,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    pub mode: AiMode,
    pub min_x: f32,
    pub max_x: f32,
    pub facing: f32,
    cooldown: AttackCooldown,
    elapsed: f32,
}

impl EnemyBrain {
    pub fn new(home_x: f32, tuning: &EnemyTuning) -> Self {
        Self {
            mode: AiMode::Patrol,
            min_x: home_x - tuning.patrol_half_span,
            max_x: home_x + tuning.patrol_half_span,
            facing: 1.0,
            cooldown: AttackCooldown::new(tuning.attack_cooldown),
            elapsed: 0.0,
        }
    }

    pub fn step(&mut self, kind: EnemyKind, p: &Perception, t: &EnemyTuning, dt: f32) -> AiStep {
        self.elapsed += dt;

        if let AiMode::Windup { remaining } = &mut self.mode {
            *remaining -= dt;
            if *remaining > 0.0 {
                return AiStep::default();
            }
            self.mode = AiMode::Patrol;
            return AiStep {
                strike: true,
                ..default()
            };
        }

        if let Some(offset) = p.to_player {
            let distance = offset.length();

            if distance <= kind.attack_range(t) {
                self.face(offset.x);
                if self.cooldown.try_begin(self.elapsed) {
                    self.mode = AiMode::Windup { remaining: t.windup };
                    return AiStep {
                        began_windup: true,
                        ..default()
                    };
                }
                return AiStep::default();
            }

            if kind == EnemyKind::Melee && distance <= t.detect_range {
                self.mode = AiMode::Chase;
                self.face(offset.x);
                let velocity_x = if p.ground_ahead(self.facing) {
                    self.facing * t.chase_speed
                } else {
                    0.0
                };
                return AiStep {
                    velocity_x,
                    ..default()
                };
            }
        }

        self.mode = AiMode::Patrol;
        if p.x <= self.min_x {
            self.facing = 1.0;
        } else if p.x >= self.max_x {
            self.facing = -1.0;
        }
        if !p.ground_ahead(self.facing) {
            self.facing = -self.facing;
        }
        AiStep {
            velocity_x: self.facing * t.patrol_speed,
            ..default()
        }
    }

    #[inline]
    fn face(&mut self, dx: f32) {
        if dx.abs() > f32::EPSILON {
            self.facing = dx.signum();
        }
    }
}
