//! Bounded numeric resource (health, breath).
//!
//! `0 <= current <= max` holds after every call. Mutation saturates instead of
//! failing, and every mutation notifies the change channel, even when the
//! clamped value did not move. Callers that want "no-op" semantics compare first.

use super::observers::{EventChannel, Subscription};

/// Snapshot sent to change listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    pub current: f32,
    pub max: f32,
}

impl GaugeReading {
    #[inline]
    pub fn percentage(self) -> f32 {
        if self.max > 0.0 { self.current / self.max } else { 0.0 }
    }
}

#[derive(Debug, Default)]
pub struct ResourceGauge {
    current: f32,
    max: f32,
    changed: EventChannel<GaugeReading>,
}

#[inline]
fn sanitize_max(max: f32) -> f32 {
    if max.is_finite() { max.max(0.0) } else { 0.0 }
}

impl ResourceGauge {
    /// A gauge filled to `max`.
    pub fn full(max: f32) -> Self {
        let max = sanitize_max(max);
        Self {
            current: max,
            max,
            changed: EventChannel::default(),
        }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn reading(&self) -> GaugeReading {
        GaugeReading {
            current: self.current,
            max: self.max,
        }
    }

    /// `current / max`, or 0 when `max` is 0.
    #[inline]
    pub fn percentage(&self) -> f32 {
        self.reading().percentage()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// `current <- clamp(current + delta, 0, max)`. A NaN delta leaves the value unchanged.
    pub fn mutate(&mut self, delta: f32) -> GaugeReading {
        let next = self.current + delta;
        if !next.is_nan() {
            self.current = next.clamp(0.0, self.max);
        }
        self.emit()
    }

    /// Sets `max` and re-clamps `current` into `[0, max]`.
    pub fn set_max(&mut self, max: f32) -> GaugeReading {
        self.max = sanitize_max(max);
        self.current = self.current.clamp(0.0, self.max);
        self.emit()
    }

    /// Sets `current` to `max`.
    pub fn fill(&mut self) -> GaugeReading {
        self.current = self.max;
        self.emit()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&GaugeReading) + Send + Sync + 'static,
    ) -> Subscription {
        self.changed.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.changed.unsubscribe(subscription)
    }

    fn emit(&mut self) -> GaugeReading {
        let reading = self.reading();
        self.changed.notify(&reading);
        reading
    }
}

#[cfg(test)]
mod tests;
