//! Small unit newtypes shared by presentation code.

/// A value normalized to `[0, 1]`. Clamped on every write.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitF32(f32);

impl UnitF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    #[cfg(test)]
    fn new_clamped(v: f32) -> Self {
        Self(v.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn add_clamped(&mut self, dv: f32) {
        self.0 = (self.0 + dv).clamp(0.0, 1.0);
    }

    #[inline]
    pub fn decay_to_zero(&mut self, rate_per_sec: f32, dt: f32) {
        self.0 = (self.0 - rate_per_sec * dt).max(0.0);
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self.0 > 0.001
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_add_and_decay() {
        let mut u = UnitF32::new_clamped(2.0);
        assert_eq!(u.get(), 1.0);

        u.add_clamped(-5.0);
        assert_eq!(u.get(), 0.0);

        u = UnitF32::new_clamped(0.5);
        u.decay_to_zero(1.0, 0.25);
        assert!((u.get() - 0.25).abs() < 1e-6);

        u.decay_to_zero(10.0, 1.0);
        assert_eq!(u.get(), 0.0);
        assert!(!u.is_active());
    }

    #[test]
    fn decay_is_consistent_over_step_splitting() {
        let mut rng = crate::common::test_utils::TestRng::new(0xC0FFEE);
        for _ in 0..500 {
            let start = rng.range_f32(0.0, 1.0);
            let rate = rng.range_f32(0.0, 8.0);
            let dt = rng.range_f32(0.0, 0.2);

            let mut whole = UnitF32::new_clamped(start);
            whole.decay_to_zero(rate, dt);

            let mut split = UnitF32::new_clamped(start);
            split.decay_to_zero(rate, dt * 0.5);
            split.decay_to_zero(rate, dt * 0.5);

            assert!((whole.get() - split.get()).abs() < 1e-5);
        }
    }
}
