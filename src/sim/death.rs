//! One-shot death sequence and the deferred level reset.
//!
//! Once begun the sequence cannot be cancelled; the reset signal is released
//! exactly once after `reset_delay` seconds of ticking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Fell,
    HealthDepleted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Counting { remaining: f32 },
    Released,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeathSequencer {
    reset_delay: f32,
    cause: Option<DeathCause>,
    phase: Phase,
}

impl DeathSequencer {
    pub fn new(reset_delay: f32) -> Self {
        Self {
            reset_delay: reset_delay.max(0.0),
            cause: None,
            phase: Phase::Idle,
        }
    }

    /// Starts the countdown. A second call is ignored and returns `false`.
    pub fn begin(&mut self, cause: DeathCause) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.cause = Some(cause);
        self.phase = Phase::Counting {
            remaining: self.reset_delay,
        };
        true
    }

    /// Advances the countdown; `true` exactly once, on the tick it elapses.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Phase::Counting { remaining } = &mut self.phase else {
            return false;
        };
        *remaining -= dt.max(0.0);
        if *remaining <= 0.0 {
            self.phase = Phase::Released;
            return true;
        }
        false
    }

    #[inline]
    pub fn cause(&self) -> Option<DeathCause> {
        self.cause
    }

    #[cfg(test)]
    fn has_begun(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[cfg(test)]
    fn reset_released(&self) -> bool {
        self.phase == Phase::Released
    }

    /// Seconds until the reset fires, if counting.
    pub fn remaining(&self) -> Option<f32> {
        match self.phase {
            Phase::Counting { remaining } => Some(remaining.max(0.0)),
            _ => None,
        }
    }
}
