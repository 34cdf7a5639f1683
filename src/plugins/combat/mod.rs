//! Combat plugin: melee swings and the ECS side of damage application.
//!
//! ```text
//! FixedUpdate
//!   player core starts an attack ──► MeleeSwing { windup }
//!   tick_melee_swings: windup finished ──► MeleeStrikeRequest
//!   enemy AI windup finished ──────────► MeleeStrikeRequest
//!   resolve_melee_strikes: one circle query per request,
//!                          one hit per found target
//! ```
//!
//! Both players and enemies are hit through `HitTarget`, an explicit variant
//! per entity kind that implements `DamageTarget`.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::animation::Animator;
use crate::plugins::audio::SoundRequest;
use crate::plugins::enemies::{self, EnemyVitals};
use crate::plugins::player::{adapters::AvianBody, Player, PlayerSimulation};
use crate::sim::combat::{DamageOutcome, DamageTarget, MeleeReport, MeleeTuning};
use crate::sim::controller::PlayerController;
use crate::sim::ports::{AnimationSink, AudioSink, PhysicsQuery, PlayerPorts, SoundCue};

/// An attack between initiation and the moment it connects.
#[derive(Component, Debug, Clone)]
pub struct MeleeSwing {
    pub windup: Timer,
    /// Strike centre relative to the attacker, fixed at initiation.
    pub offset: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub targets: LayerMask,
}

impl MeleeSwing {
    pub fn new(tuning: &MeleeTuning, facing: f32, targets: impl Into<LayerMask>) -> Self {
        Self {
            windup: Timer::from_seconds(tuning.windup.max(0.0), TimerMode::Once),
            offset: Vec2::new(facing.signum() * tuning.reach, 0.0),
            radius: tuning.radius,
            damage: tuning.damage,
            targets: targets.into(),
        }
    }
}

/// The "attack connects" signal.
#[derive(Message, Debug, Clone, Copy)]
pub struct MeleeStrikeRequest {
    pub source: Entity,
    pub origin: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub targets: LayerMask,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeleeResolution;

pub fn plugin(app: &mut App) {
    app.add_message::<MeleeStrikeRequest>().add_systems(
        FixedUpdate,
        (tick_melee_swings, resolve_melee_strikes)
            .chain()
            .in_set(MeleeResolution)
            .after(PlayerSimulation)
            .after(enemies::EnemyBrains)
            .run_if(in_state(GameState::InGame)),
    );
}

// -----------------------------------------------------------------------------
// Hit targets
// -----------------------------------------------------------------------------

pub type PlayerHitData = (
    &'static mut PlayerController,
    &'static Transform,
    &'static mut LinearVelocity,
    Option<&'static mut Animator>,
);

/// The player, with the collaborators its damage reaction needs.
pub struct PlayerTarget<'a> {
    pub controller: &'a mut PlayerController,
    pub body: AvianBody<'a>,
    pub query: &'a dyn PhysicsQuery,
    pub animator: Option<&'a mut Animator>,
    pub audio: &'a mut dyn AudioSink,
}

impl DamageTarget for PlayerTarget<'_> {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let mut ports = PlayerPorts {
            body: &mut self.body,
            query: self.query,
            animation: self
                .animator
                .as_deref_mut()
                .map(|a| a as &mut dyn AnimationSink),
            audio: Some(&mut *self.audio),
            scene: None,
        };
        self.controller.take_damage(amount, &mut ports)
    }
}

pub struct EnemyTarget<'a> {
    pub vitals: &'a mut EnemyVitals,
    pub audio: &'a mut dyn AudioSink,
}

impl DamageTarget for EnemyTarget<'_> {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.vitals.take_damage(amount);
        if outcome.landed() {
            self.audio.play_one_shot(SoundCue::EnemyHit);
        }
        outcome
    }
}

pub enum HitTarget<'a> {
    Player(PlayerTarget<'a>),
    Enemy(EnemyTarget<'a>),
}

impl DamageTarget for HitTarget<'_> {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        match self {
            HitTarget::Player(target) => target.take_damage(amount),
            HitTarget::Enemy(target) => target.take_damage(amount),
        }
    }
}

/// Resolves `entity` to a damage target, or `None` when it cannot take damage.
pub fn hit_target<'a>(
    entity: Entity,
    players: &'a mut Query<PlayerHitData, With<Player>>,
    enemies: &'a mut Query<&'static mut EnemyVitals, Without<Player>>,
    query: &'a dyn PhysicsQuery,
    audio: &'a mut dyn AudioSink,
) -> Option<HitTarget<'a>> {
    if let Ok((controller, tf, velocity, animator)) = players.get_mut(entity) {
        return Some(HitTarget::Player(PlayerTarget {
            controller: controller.into_inner(),
            body: AvianBody::new(tf, velocity.into_inner()),
            query,
            animator: animator.map(Mut::into_inner),
            audio,
        }));
    }
    if let Ok(vitals) = enemies.get_mut(entity) {
        return Some(HitTarget::Enemy(EnemyTarget {
            vitals: vitals.into_inner(),
            audio,
        }));
    }
    None
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

fn tick_melee_swings(
    time: Res<Time>,
    mut commands: Commands,
    mut strikes: MessageWriter<MeleeStrikeRequest>,
    mut q: Query<(Entity, &mut MeleeSwing, &Transform)>,
) {
    for (e, mut swing, tf) in &mut q {
        swing.windup.tick(time.delta());
        if !swing.windup.is_finished() {
            continue;
        }

        strikes.write(MeleeStrikeRequest {
            source: e,
            origin: tf.translation.truncate() + swing.offset,
            radius: swing.radius,
            damage: swing.damage,
            targets: swing.targets,
        });
        commands.entity(e).remove::<MeleeSwing>();
    }
}

fn resolve_melee_strikes(
    mut requests: MessageReader<MeleeStrikeRequest>,
    spatial: SpatialQuery,
    mut sounds: MessageWriter<SoundRequest>,
    mut q_players: Query<PlayerHitData, With<Player>>,
    mut q_enemies: Query<&'static mut EnemyVitals, Without<Player>>,
) {
    for req in requests.read() {
        let filter = SpatialQueryFilter::from_mask(req.targets).with_excluded_entities([req.source]);
        let found = spatial.shape_intersections(&Collider::circle(req.radius), req.origin, 0.0, &filter);

        let mut report = MeleeReport::default();
        for entity in found {
            let Some(mut target) =
                hit_target(entity, &mut q_players, &mut q_enemies, &spatial, &mut sounds)
            else {
                continue;
            };
            report.apply(&mut target, req.damage);
        }

        debug!(source = ?req.source, hits = report.hits, kills = report.kills, "melee strike");
    }
}
