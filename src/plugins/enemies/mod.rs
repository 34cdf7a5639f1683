//! Enemies plugin: patrolling melee brutes and ranged throwers.
//!
//! Facts, rules, presentation:
//! - `EnemyVitals`, `EnemyBrain`, `EnemyLifeState` are gameplay truth.
//! - `drive_enemies` (fixed step) runs the AI and turns finished windups into
//!   `MeleeStrikeRequest` / `SpawnProjectileRequest` messages.
//! - Death is a short `Dying` animation, then `PendingDespawn`, then a single
//!   despawn pass in `PostUpdate`. Dying enemies stop interacting immediately.
//! - `HitFlash` is derived by comparing last-seen health to current health, so
//!   hits need no extra event plumbing.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables, units::UnitF32};
use crate::plugins::audio::SoundRequest;
use crate::plugins::combat::MeleeStrikeRequest;
use crate::plugins::player::{Player, PlayerEntity};
use crate::plugins::projectiles::messages::SpawnProjectileRequest;
use crate::sim::combat::{DamageOutcome, DamageTarget};
use crate::sim::controller::PlayerController;
use crate::sim::gauge::{GaugeReading, ResourceGauge};
use crate::sim::ports::{PhysicsQuery, SoundCue};

pub mod ai;

pub use ai::{AiMode, EnemyBrain, EnemyKind, Perception};

const RADIUS: f32 = 16.0;
/// How far ahead of its centre an enemy looks for a ledge.
const LEDGE_LOOKAHEAD: f32 = RADIUS + 4.0;
const LEDGE_DEPTH: f32 = RADIUS + 12.0;

/// (kind, x, platform top).
const SPAWNS: [(EnemyKind, f32, f32); 4] = [
    (EnemyKind::Melee, 150.0, 0.0),
    (EnemyKind::Ranged, 260.0, 140.0),
    (EnemyKind::Melee, 950.0, 0.0),
    (EnemyKind::Ranged, -560.0, 120.0),
];

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

#[derive(Component)]
pub struct Enemy;

#[derive(Component, Debug)]
pub struct EnemyVitals {
    health: ResourceGauge,
}

impl EnemyVitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: ResourceGauge::full(max_health),
        }
    }

    #[inline]
    pub fn health(&self) -> GaugeReading {
        self.health.reading()
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.health.is_empty()
    }
}

impl DamageTarget for EnemyVitals {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.health.is_empty() || amount.is_nan() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }
        self.health.mutate(-amount);
        if self.health.is_empty() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged
        }
    }
}

/// Alive: normal gameplay. Dying: short fade. Dead: terminal, awaiting despawn.
#[derive(Component, Debug, Clone)]
pub enum EnemyLifeState {
    Alive,
    Dying { timer: Timer },
    Dead,
}

/// Marker: remove in the next `PostUpdate` cleanup pass.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

/// Presentation-only; always present so hits cause no structural changes.
#[derive(Component, Debug, Clone)]
pub struct HitFlash {
    last_health: f32,
    flash: UnitF32,
}

impl HitFlash {
    fn new(health: f32) -> Self {
        Self {
            last_health: health,
            flash: UnitF32::ZERO,
        }
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnemyBrains;

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_enemies);

    app.add_systems(
        FixedUpdate,
        drive_enemies
            .in_set(EnemyBrains)
            .run_if(in_state(GameState::InGame)),
    );

    // Death runs after every damage source of the step: melee in FixedUpdate,
    // projectiles in FixedPostUpdate.
    app.add_systems(
        FixedPostUpdate,
        (enemy_death_trigger, enemy_death_progress)
            .chain()
            .after(crate::plugins::projectiles::collision::process_projectile_collisions)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(Update, enemy_hit_flash.run_if(in_state(GameState::InGame)));

    app.add_systems(
        PostUpdate,
        despawn_marked_enemies.run_if(in_state(GameState::InGame)),
    );
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

#[inline]
fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Ground, Layer::Player])
}

/// Membership stays `Enemy`; empty filters stop new interactions.
#[inline]
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

fn spawn_enemies(mut commands: Commands, tunables: Res<Tunables>) {
    let t = &tunables.enemies;

    for (i, (kind, x, top)) in SPAWNS.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Enemy{i}")),
            Enemy,
            kind,
            EnemyVitals::new(t.max_health),
            EnemyBrain::new(x, t),
            EnemyLifeState::Alive,
            HitFlash::new(t.max_health),
            Sprite {
                color: kind.color(),
                custom_size: Some(Vec2::splat(RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(x, top + RADIUS, 1.0),
            (
                RigidBody::Kinematic,
                Collider::circle(RADIUS),
                enemy_layers(),
                LinearVelocity::ZERO,
            ),
            Occluder2d::circle(RADIUS),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

// -----------------------------------------------------------------------------
// Rules: AI
// -----------------------------------------------------------------------------

fn drive_enemies(
    time: Res<Time>,
    tunables: Res<Tunables>,
    spatial: SpatialQuery,
    player: Res<PlayerEntity>,
    q_player: Query<(&Transform, &PlayerController), (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<
        (
            Entity,
            &EnemyKind,
            &mut EnemyBrain,
            &EnemyLifeState,
            &Transform,
            &mut LinearVelocity,
        ),
        With<Enemy>,
    >,
    mut strikes: MessageWriter<MeleeStrikeRequest>,
    mut shots: MessageWriter<SpawnProjectileRequest>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let dt = time.delta_secs();
    let t = &tunables.enemies;

    let player_pos = player
        .0
        .and_then(|e| q_player.get(e).ok())
        .filter(|(_, controller)| !controller.is_dead())
        .map(|(tf, _)| tf.translation.truncate());

    let ground: LayerMask = Layer::Ground.into();

    for (e, kind, mut brain, life, tf, mut velocity) in &mut q_enemies {
        if !matches!(life, EnemyLifeState::Alive) {
            velocity.0 = Vec2::ZERO;
            continue;
        }

        let pos = tf.translation.truncate();
        let ground_at = |dx: f32| {
            spatial
                .raycast(pos + Vec2::new(dx, 0.0), Dir2::NEG_Y, LEDGE_DEPTH, ground)
                .is_some()
        };
        let perception = Perception {
            x: pos.x,
            to_player: player_pos.map(|p| p - pos),
            ground_left: ground_at(-LEDGE_LOOKAHEAD),
            ground_right: ground_at(LEDGE_LOOKAHEAD),
        };

        let step = brain.step(*kind, &perception, t, dt);
        velocity.0 = Vec2::new(step.velocity_x, 0.0);

        if step.began_windup {
            trace!(?e, ?kind, "enemy winding up");
        }
        if !step.strike {
            continue;
        }

        match kind {
            EnemyKind::Melee => {
                strikes.write(MeleeStrikeRequest {
                    source: e,
                    origin: pos + Vec2::new(brain.facing * t.melee_radius, 0.0),
                    radius: t.melee_radius,
                    damage: t.melee_damage,
                    targets: Layer::Player.into(),
                });
            }
            EnemyKind::Ranged => {
                let dir = player_pos
                    .map(|p| p - pos)
                    .and_then(|d| d.try_normalize())
                    .unwrap_or(Vec2::new(brain.facing, 0.0));
                shots.write(SpawnProjectileRequest {
                    pos: pos + dir * (RADIUS + 8.0),
                    vel: dir * t.projectile_speed,
                    damage: t.projectile_damage,
                    owner: Some(e),
                });
                sounds.write(SoundRequest {
                    cue: SoundCue::ProjectileFired,
                });
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Rules: death lifecycle
// -----------------------------------------------------------------------------

/// Alive -> Dying once health is gone. Does not despawn.
fn enemy_death_trigger(
    tunables: Res<Tunables>,
    mut q: Query<
        (
            &EnemyVitals,
            &mut EnemyLifeState,
            &mut CollisionLayers,
            &mut LinearVelocity,
            &mut Sprite,
        ),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (vitals, mut life, mut layers, mut velocity, mut sprite) in &mut q {
        if !matches!(*life, EnemyLifeState::Alive) || !vitals.is_depleted() {
            continue;
        }

        *life = EnemyLifeState::Dying {
            timer: Timer::from_seconds(tunables.enemies.dying_secs, TimerMode::Once),
        };
        *layers = non_interacting_enemy_layers();
        velocity.0 = Vec2::ZERO;
        sprite.color = Color::srgba(0.8, 0.8, 0.8, 1.0);
        debug!("enemy dying");
    }
}

/// Fades Dying enemies and marks them `PendingDespawn` when done.
fn enemy_death_progress(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut EnemyLifeState, &mut Sprite), (With<Enemy>, Without<PendingDespawn>)>,
) {
    for (e, mut life, mut sprite) in &mut q {
        let EnemyLifeState::Dying { timer } = &mut *life else {
            continue;
        };

        timer.tick(time.delta());

        let dur = timer.duration().as_secs_f32().max(0.0001);
        let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);
        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();

        if timer.is_finished() {
            *life = EnemyLifeState::Dead;
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

// -----------------------------------------------------------------------------
// Presentation
// -----------------------------------------------------------------------------

fn enemy_hit_flash(
    time: Res<Time>,
    mut q: Query<
        (&EnemyVitals, &EnemyKind, &EnemyBrain, &EnemyLifeState, &mut HitFlash, &mut Sprite),
        With<Enemy>,
    >,
) {
    let dt = time.delta_secs();

    for (vitals, kind, brain, life, mut fx, mut sprite) in &mut q {
        if !matches!(life, EnemyLifeState::Alive) {
            continue;
        }

        let health = vitals.health().current;
        if health < fx.last_health {
            fx.flash = UnitF32::ONE;
        }
        fx.last_health = health;
        fx.flash.decay_to_zero(6.0, dt);

        let mut c = kind.color().to_srgba();
        if matches!(brain.mode, AiMode::Windup { .. }) {
            c.green = (c.green + 0.35).min(1.0);
        }
        let f = fx.flash.get();
        c.red = (c.red + f * 0.6).min(1.0);
        c.green = (c.green + f * 0.6).min(1.0);
        c.blue = (c.blue + f * 0.6).min(1.0);
        sprite.color = c.into();
        sprite.flip_x = brain.facing < 0.0;
    }
}

// -----------------------------------------------------------------------------
// Cleanup (PostUpdate)
// -----------------------------------------------------------------------------

fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

#[cfg(test)]
mod tests;
