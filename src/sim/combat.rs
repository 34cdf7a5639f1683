//! Hit application: the damage capability, projectile charges, melee strikes.

use serde::{Deserialize, Serialize};

/// Result of a single damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was dead, invincible, or the amount was not positive.
    Ignored,
    Damaged,
    Killed,
}

impl DamageOutcome {
    #[inline]
    pub fn landed(self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }
}

/// Anything that can be hurt.
pub trait DamageTarget {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome;
}

impl<T: DamageTarget + ?Sized> DamageTarget for &mut T {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        (**self).take_damage(amount)
    }
}

/// What a projectile did on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Already spent; the contact is ignored.
    Ignored,
    /// Spent on something that cannot take damage.
    Absorbed,
    /// Spent on a damage target.
    Hit(DamageOutcome),
}

/// The payload of a projectile. Spends itself on the first contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileCharge {
    damage: f32,
    spent: bool,
}

impl ProjectileCharge {
    pub fn new(damage: f32) -> Self {
        Self { damage, spent: false }
    }

    #[inline]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Re-arms a pooled projectile.
    pub fn rearm(&mut self, damage: f32) {
        self.damage = damage;
        self.spent = false;
    }

    pub fn strike(&mut self, target: Option<&mut dyn DamageTarget>) -> Impact {
        if self.spent {
            return Impact::Ignored;
        }
        self.spent = true;
        match target {
            Some(target) => Impact::Hit(target.take_damage(self.damage)),
            None => Impact::Absorbed,
        }
    }
}

/// Gates attack initiation on time since the previous attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackCooldown {
    cooldown: f32,
    last: Option<f32>,
}

impl AttackCooldown {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown: cooldown.max(0.0),
            last: None,
        }
    }

    #[inline]
    pub fn ready(&self, now: f32) -> bool {
        self.last.is_none_or(|last| now - last >= self.cooldown)
    }

    /// Records an attack at `now` if the cooldown allows it.
    pub fn try_begin(&mut self, now: f32) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }
}

/// Shape and payload of a melee strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeTuning {
    /// Seconds between initiation and the moment the attack connects.
    pub windup: f32,
    pub radius: f32,
    /// Horizontal distance of the strike centre in front of the attacker.
    pub reach: f32,
    pub damage: f32,
}

impl Default for MeleeTuning {
    fn default() -> Self {
        Self {
            windup: 0.15,
            radius: 28.0,
            reach: 26.0,
            damage: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeleeReport {
    pub hits: usize,
    pub kills: usize,
}

impl MeleeReport {
    /// Applies one strike to a target found by the radius query.
    pub fn apply<T: DamageTarget + ?Sized>(&mut self, target: &mut T, damage: f32) -> DamageOutcome {
        let outcome = target.take_damage(damage);
        match outcome {
            DamageOutcome::Damaged => self.hits += 1,
            DamageOutcome::Killed => {
                self.hits += 1;
                self.kills += 1;
            }
            DamageOutcome::Ignored => {}
        }
        outcome
    }
}
