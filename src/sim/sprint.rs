//! Sprint gate: intent + motion + ground contact + breath -> effective sprint.
//!
//! Capability is hysteretic around `min_breath_to_sprint`: dropping below the
//! threshold revokes it, and it is only granted again at or above the threshold
//! once sprint is wanted again after a release. A held key never re-grants.
//!
//! Depleted/recovered are edge-triggered: they fire on the tick breath crosses
//! 0 (while sprinting) or crosses back to max (while recovering), never on the
//! ticks that merely sit at the boundary.

use serde::{Deserialize, Serialize};

use super::gauge::ResourceGauge;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintConfig {
    /// Breath per second spent while sprinting.
    pub breath_drain_rate: f32,
    /// Breath per second regained once recovery is allowed.
    pub breath_recovery_rate: f32,
    /// Seconds after the last sprinting tick before recovery starts.
    pub breath_recovery_delay: f32,
    pub min_breath_to_sprint: f32,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            breath_drain_rate: 25.0,
            breath_recovery_rate: 15.0,
            breath_recovery_delay: 1.0,
            min_breath_to_sprint: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprintState {
    /// Raw input intent, independent of movement.
    pub wants_to_sprint: bool,
    pub is_sprinting: bool,
    pub can_sprint: bool,
    pub last_sprint_at: Option<f32>,
    pub is_recovering: bool,
    /// Set when capability is revoked under a held key; cleared on release.
    pub needs_repress: bool,
}

impl Default for SprintState {
    fn default() -> Self {
        Self {
            wants_to_sprint: false,
            is_sprinting: false,
            can_sprint: true,
            last_sprint_at: None,
            is_recovering: false,
            needs_repress: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SprintInputs {
    pub is_moving: bool,
    pub is_grounded: bool,
}

/// Boundary crossings observed during one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SprintEdges {
    pub depleted: bool,
    pub recovered: bool,
}

impl SprintState {
    /// Advances sprint and breath by one tick.
    pub fn evaluate(
        &mut self,
        inputs: SprintInputs,
        breath: &mut ResourceGauge,
        config: &SprintConfig,
        now: f32,
        dt: f32,
    ) -> SprintEdges {
        let mut edges = SprintEdges::default();
        let min = config.min_breath_to_sprint;

        if !self.wants_to_sprint {
            self.needs_repress = false;
        }

        // Revocation wins over a re-grant on the same tick.
        if breath.current() < min {
            self.revoke();
        } else if self.wants_to_sprint && !self.is_sprinting && !self.needs_repress {
            self.can_sprint = true;
        }

        self.is_sprinting =
            self.wants_to_sprint && inputs.is_moving && inputs.is_grounded && self.can_sprint;

        if self.is_sprinting {
            let before = breath.current();
            breath.mutate(-config.breath_drain_rate * dt);
            self.last_sprint_at = Some(now);
            self.is_recovering = false;

            if before > 0.0 && breath.is_empty() {
                self.revoke();
                edges.depleted = true;
            }
        } else {
            let rested = self
                .last_sprint_at
                .is_none_or(|at| now - at >= config.breath_recovery_delay);

            self.is_recovering = rested && !breath.is_full();
            if self.is_recovering {
                breath.mutate(config.breath_recovery_rate * dt);
                if breath.is_full() {
                    self.is_recovering = false;
                    edges.recovered = true;
                }
            }
        }

        edges
    }

    pub fn set_wants(&mut self, wants: bool) {
        self.wants_to_sprint = wants;
        if !wants {
            self.needs_repress = false;
        }
    }

    /// Drops intent and any active sprint. Capability is left as is.
    pub fn halt(&mut self) {
        self.set_wants(false);
        self.is_sprinting = false;
        self.is_recovering = false;
    }

    fn revoke(&mut self) {
        self.can_sprint = false;
        if self.wants_to_sprint {
            self.needs_repress = true;
        }
    }
}
