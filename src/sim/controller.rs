//! Player simulation core.
//!
//! One controller owns the player's vital state (health, breath, aliveness),
//! its sprint state and its motion intent. Each fixed tick it:
//!
//! ```text
//!   1. checks ground contact at the ground-check anchor
//!   2. dies with `Fell` if at or below `fall_death_y` (rest of the tick skipped)
//!   3. drives the sprint gate (breath drain / recovery, edge events)
//!   4. computes horizontal velocity from the move axis (walk or run speed)
//!   5. applies a pending jump if grounded, then clears the request
//!   6. writes velocity back to the body
//! ```
//!
//! Damage arrives outside the tick through `take_damage`. Death is monotonic:
//! once dead, intent setters, damage, healing and sprint are no-ops, and the only
//! thing the tick still does is count down to the level reset.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::combat::{AttackCooldown, DamageOutcome};
use super::death::{DeathCause, DeathSequencer};
use super::gauge::{GaugeReading, ResourceGauge};
use super::observers::{EventChannel, Subscription};
use super::ports::{anim, PlayerPorts, SoundCue};
use super::sprint::{SprintConfig, SprintInputs, SprintState};
use crate::common::layers::Layer;

/// Move-axis magnitude below which the player counts as standing still.
const MOVE_DEADZONE: f32 = 0.01;

/// Where ground contact is checked, relative to the body origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundCheck {
    pub offset_x: f32,
    pub offset_y: f32,
    pub radius: f32,
}

impl GroundCheck {
    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub run_speed: f32,
    /// Vertical velocity set by a grounded jump.
    pub jump_force: f32,
    pub max_health: f32,
    pub max_breath: f32,
    pub sprint: SprintConfig,
    pub fall_death_y: f32,
    pub death_reset_delay: f32,
    /// Length of an invincibility window. Nothing arms one yet; see `set_invincible`.
    pub invincibility_duration: f32,
    /// Landing drop (world units) above which a fall would hurt.
    pub fall_damage_threshold: f32,
    pub fall_damage_amount: f32,
    pub attack_cooldown: f32,
    /// `None` is a configuration error: the player is then never grounded.
    pub ground_check: Option<GroundCheck>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 220.0,
            run_speed: 360.0,
            jump_force: 620.0,
            max_health: 100.0,
            max_breath: 100.0,
            sprint: SprintConfig::default(),
            fall_death_y: -900.0,
            death_reset_delay: 2.0,
            invincibility_duration: 1.0,
            fall_damage_threshold: 400.0,
            fall_damage_amount: 10.0,
            attack_cooldown: 0.5,
            ground_check: Some(GroundCheck {
                offset_x: 0.0,
                offset_y: -24.0,
                radius: 6.0,
            }),
        }
    }
}

/// Raw input intent. `jump_requested` is consumed by the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionIntent {
    pub move_axis: f32,
    pub jump_requested: bool,
    pub attack_requested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifeState {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathDepleted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathRecovered;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDied {
    pub cause: DeathCause,
}

/// What a tick did, for the ECS layer and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub grounded: bool,
    pub sprinting: bool,
    pub jumped: bool,
    pub attack_started: bool,
    pub died: bool,
    pub reset_requested: bool,
}

/// Tracks the highest point of the current airborne stretch.
///
/// Landing drops are measured so `fall_damage_*` has something to act on, but
/// no rule converts them into damage yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct FallTracker {
    peak_y: Option<f32>,
    last_drop: f32,
}

impl FallTracker {
    fn observe(&mut self, y: f32, grounded: bool) {
        if grounded {
            if let Some(peak) = self.peak_y.take() {
                self.last_drop = (peak - y).max(0.0);
            }
        } else {
            self.peak_y = Some(self.peak_y.map_or(y, |p| p.max(y)));
        }
    }
}

#[derive(Debug, Component)]
pub struct PlayerController {
    config: PlayerConfig,
    ground_layers: LayerMask,
    life: LifeState,
    health: ResourceGauge,
    breath: ResourceGauge,
    sprint: SprintState,
    intent: MotionIntent,
    is_grounded: bool,
    is_invincible: bool,
    invincibility_left: f32,
    facing: f32,
    elapsed: f32,
    attack: AttackCooldown,
    fall: FallTracker,
    death: DeathSequencer,
    breath_depleted: EventChannel<BreathDepleted>,
    breath_recovered: EventChannel<BreathRecovered>,
    died: EventChannel<PlayerDied>,
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        if config.ground_check.is_none() {
            warn!("player has no ground-check anchor; it will never count as grounded");
        }

        Self {
            ground_layers: Layer::Ground.into(),
            life: LifeState::Alive,
            health: ResourceGauge::full(config.max_health),
            breath: ResourceGauge::full(config.max_breath),
            sprint: SprintState::default(),
            intent: MotionIntent::default(),
            is_grounded: false,
            is_invincible: false,
            invincibility_left: 0.0,
            facing: 1.0,
            elapsed: 0.0,
            attack: AttackCooldown::new(config.attack_cooldown),
            fall: FallTracker::default(),
            death: DeathSequencer::new(config.death_reset_delay),
            breath_depleted: EventChannel::default(),
            breath_recovered: EventChannel::default(),
            died: EventChannel::default(),
            config,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life == LifeState::Dead
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death.cause()
    }

    #[inline]
    pub fn current_health(&self) -> f32 {
        self.health.current()
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.health.max()
    }

    #[inline]
    pub fn health(&self) -> GaugeReading {
        self.health.reading()
    }

    #[inline]
    pub fn current_breath(&self) -> f32 {
        self.breath.current()
    }

    #[inline]
    pub fn max_breath(&self) -> f32 {
        self.breath.max()
    }

    #[inline]
    pub fn breath(&self) -> GaugeReading {
        self.breath.reading()
    }

    #[inline]
    pub fn can_sprint(&self) -> bool {
        self.sprint.can_sprint
    }

    #[inline]
    pub fn is_currently_sprinting(&self) -> bool {
        self.sprint.is_sprinting
    }

    #[inline]
    pub fn is_recovering_breath(&self) -> bool {
        self.sprint.is_recovering
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.is_invincible
    }

    /// `1.0` facing right, `-1.0` facing left.
    #[inline]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    #[inline]
    pub fn intent(&self) -> MotionIntent {
        self.intent
    }

    /// Drop of the most recent landing, in world units.
    #[inline]
    pub fn last_landing_drop(&self) -> f32 {
        self.fall.last_drop
    }

    /// Seconds until the level reset, while dead.
    pub fn reset_countdown(&self) -> Option<f32> {
        self.death.remaining()
    }

    // ------------------------------------------------------------------
    // Input intent
    // ------------------------------------------------------------------

    /// Raw axis; clamped to [-1, 1], NaN reads as 0.
    pub fn set_move_axis(&mut self, x: f32) {
        if self.is_dead() {
            return;
        }
        self.intent.move_axis = if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) };
    }

    pub fn request_jump(&mut self) {
        if self.is_dead() {
            return;
        }
        self.intent.jump_requested = true;
    }

    pub fn set_wants_to_sprint(&mut self, wants: bool) {
        if self.is_dead() {
            return;
        }
        self.sprint.set_wants(wants);
    }

    pub fn request_attack(&mut self) {
        if self.is_dead() {
            return;
        }
        self.intent.attack_requested = true;
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn take_damage(&mut self, amount: f32, ports: &mut PlayerPorts<'_>) -> DamageOutcome {
        if self.is_dead() || self.is_invincible || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }

        let reading = self.health.mutate(-amount);
        debug!(amount, health = reading.current, "player took damage");
        ports.set_trigger(anim::HURT);
        ports.play(SoundCue::Hurt);

        if reading.current <= 0.0 {
            self.die(DeathCause::HealthDepleted, ports);
            return DamageOutcome::Killed;
        }
        DamageOutcome::Damaged
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() || !(amount > 0.0) {
            return;
        }
        self.health.mutate(amount);
    }

    pub fn restore_breath(&mut self, amount: f32) {
        if self.is_dead() || !(amount > 0.0) {
            return;
        }
        self.breath.mutate(amount);
    }

    pub fn drain_breath(&mut self, amount: f32) {
        if self.is_dead() || !(amount > 0.0) {
            return;
        }
        self.breath.mutate(-amount);
    }

    /// Refills health. Allowed while dead; does not revive.
    pub fn full_heal(&mut self) {
        self.health.fill();
    }

    /// Refills breath. Allowed while dead; does not revive.
    pub fn full_restore_breath(&mut self) {
        self.breath.fill();
    }

    pub fn set_max_health(&mut self, max: f32) {
        self.health.set_max(max);
    }

    pub fn set_max_breath(&mut self, max: f32) {
        self.breath.set_max(max);
    }

    /// Opens (or closes) the invincibility window. Opening lasts
    /// `invincibility_duration` seconds of ticking.
    pub fn set_invincible(&mut self, on: bool) {
        if self.is_dead() {
            return;
        }
        self.is_invincible = on;
        self.invincibility_left = if on { self.config.invincibility_duration } else { 0.0 };
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn on_health_changed(
        &mut self,
        f: impl FnMut(&GaugeReading) + Send + Sync + 'static,
    ) -> Subscription {
        self.health.subscribe(f)
    }

    pub fn on_breath_changed(
        &mut self,
        f: impl FnMut(&GaugeReading) + Send + Sync + 'static,
    ) -> Subscription {
        self.breath.subscribe(f)
    }

    pub fn on_breath_depleted(
        &mut self,
        f: impl FnMut(&BreathDepleted) + Send + Sync + 'static,
    ) -> Subscription {
        self.breath_depleted.subscribe(f)
    }

    pub fn on_breath_recovered(
        &mut self,
        f: impl FnMut(&BreathRecovered) + Send + Sync + 'static,
    ) -> Subscription {
        self.breath_recovered.subscribe(f)
    }

    pub fn on_death(&mut self, f: impl FnMut(&PlayerDied) + Send + Sync + 'static) -> Subscription {
        self.died.subscribe(f)
    }

    /// Removes a subscription from whichever channel holds it.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.health.unsubscribe(subscription)
            || self.breath.unsubscribe(subscription)
            || self.breath_depleted.unsubscribe(subscription)
            || self.breath_recovered.unsubscribe(subscription)
            || self.died.unsubscribe(subscription)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    pub fn tick(&mut self, dt: f32, ports: &mut PlayerPorts<'_>) -> TickReport {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        let mut report = TickReport::default();

        if self.is_dead() {
            if self.death.advance(dt) {
                report.reset_requested = true;
                if ports.restart_level() {
                    info!("restarting level after player death");
                } else {
                    debug!("no level reset bound; staying dead");
                }
            }
            return report;
        }

        self.tick_invincibility(dt);

        self.is_grounded = self.sense_ground(ports);
        report.grounded = self.is_grounded;

        let position = ports.body.position();
        if position.y <= self.config.fall_death_y {
            self.die(DeathCause::Fell, ports);
            report.died = true;
            return report;
        }
        self.fall.observe(position.y, self.is_grounded);

        let is_moving = self.intent.move_axis.abs() > MOVE_DEADZONE;
        let edges = self.sprint.evaluate(
            SprintInputs {
                is_moving,
                is_grounded: self.is_grounded,
            },
            &mut self.breath,
            &self.config.sprint,
            self.elapsed,
            dt,
        );
        if edges.depleted {
            self.breath_depleted.notify(&BreathDepleted);
            ports.play(SoundCue::BreathDepleted);
        }
        if edges.recovered {
            self.breath_recovered.notify(&BreathRecovered);
            ports.play(SoundCue::BreathRecovered);
        }
        report.sprinting = self.sprint.is_sprinting;

        let speed = if self.sprint.is_sprinting {
            self.config.run_speed
        } else {
            self.config.move_speed
        };
        let mut velocity = Vec2::new(self.intent.move_axis * speed, ports.body.velocity().y);

        if self.intent.jump_requested && self.is_grounded {
            velocity.y = self.config.jump_force;
            report.jumped = true;
            ports.set_trigger(anim::JUMP);
            ports.play(SoundCue::Jump);
        }
        self.intent.jump_requested = false;

        ports.body.set_velocity(velocity);

        if is_moving {
            self.facing = self.intent.move_axis.signum();
        }

        if std::mem::take(&mut self.intent.attack_requested) && self.attack.try_begin(self.elapsed) {
            report.attack_started = true;
            ports.set_trigger(anim::ATTACK);
            ports.play(SoundCue::Attack);
        }

        ports.set_bool(anim::GROUNDED, self.is_grounded);
        ports.set_bool(anim::RUNNING, is_moving);
        ports.set_bool(anim::SPRINTING, self.sprint.is_sprinting);

        report
    }

    fn tick_invincibility(&mut self, dt: f32) {
        if !self.is_invincible {
            return;
        }
        self.invincibility_left -= dt;
        if self.invincibility_left <= 0.0 {
            self.invincibility_left = 0.0;
            self.is_invincible = false;
        }
    }

    fn sense_ground(&self, ports: &PlayerPorts<'_>) -> bool {
        let Some(check) = self.config.ground_check else {
            return false;
        };
        let anchor = ports.body.position() + check.offset();
        ports.query.overlap_circle(anchor, check.radius, self.ground_layers)
    }

    fn die(&mut self, cause: DeathCause, ports: &mut PlayerPorts<'_>) {
        if self.is_dead() {
            return;
        }
        self.life = LifeState::Dead;
        self.intent = MotionIntent::default();
        self.sprint.halt();
        self.is_invincible = false;

        ports.body.set_velocity(Vec2::ZERO);
        ports.set_trigger(anim::DEATH);
        ports.set_bool(anim::RUNNING, false);
        ports.set_bool(anim::SPRINTING, false);
        ports.play(SoundCue::Death);

        info!(?cause, "player died");
        self.died.notify(&PlayerDied { cause });
        self.death.begin(cause);
    }
}
