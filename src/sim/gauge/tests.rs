use super::*;
use crate::sim::test_rig::{recorder, TestRng};

#[test]
fn full_gauge_starts_at_max() {
    let g = ResourceGauge::full(100.0);
    assert_eq!(g.current(), 100.0);
    assert_eq!(g.max(), 100.0);
    assert!(g.is_full());
    assert_eq!(g.percentage(), 1.0);
}

#[test]
fn mutate_saturates_at_both_ends() {
    let mut g = ResourceGauge::full(50.0);
    assert_eq!(g.mutate(-80.0).current, 0.0);
    assert!(g.is_empty());
    assert_eq!(g.mutate(500.0).current, 50.0);
}

#[test]
fn mutate_notifies_even_when_clamped_to_same_value() {
    let log = recorder::<GaugeReading>();
    let mut g = ResourceGauge::full(10.0);
    let sink = log.clone();
    g.subscribe(move |r| sink.lock().unwrap().push(*r));

    g.mutate(5.0);
    g.mutate(5.0);

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|r| r.current == 10.0 && r.max == 10.0));
}

#[test]
fn nan_delta_leaves_value_untouched() {
    let mut g = ResourceGauge::full(10.0);
    g.mutate(-3.0);
    g.mutate(f32::NAN);
    assert_eq!(g.current(), 7.0);
}

#[test]
fn set_max_reclamps_current() {
    let mut g = ResourceGauge::full(100.0);
    let r = g.set_max(40.0);
    assert_eq!(r, GaugeReading { current: 40.0, max: 40.0 });

    // Raising max does not refill.
    g.set_max(80.0);
    assert_eq!(g.current(), 40.0);
    assert_eq!(g.percentage(), 0.5);
}

#[test]
fn percentage_of_zero_max_is_zero() {
    let mut g = ResourceGauge::full(0.0);
    assert_eq!(g.percentage(), 0.0);
    g.mutate(10.0);
    assert_eq!(g.percentage(), 0.0);
    assert!(!g.percentage().is_nan());

    let mut h = ResourceGauge::full(10.0);
    h.set_max(-5.0);
    assert_eq!(h.max(), 0.0);
    assert_eq!(h.percentage(), 0.0);
}

#[test]
fn fill_restores_max() {
    let mut g = ResourceGauge::full(30.0);
    g.mutate(-29.0);
    assert_eq!(g.fill().current, 30.0);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let log = recorder::<GaugeReading>();
    let mut g = ResourceGauge::full(10.0);
    let sink = log.clone();
    let sub = g.subscribe(move |r| sink.lock().unwrap().push(*r));

    g.mutate(-1.0);
    assert!(g.unsubscribe(sub));
    g.mutate(-1.0);

    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn clamp_invariant_holds_for_random_mutation_sequences() {
    let mut rng = TestRng::new(0xC0FFEE_1234_5678);

    for _case in 0..2_000 {
        let max = rng.range_f32(0.0, 500.0);
        let mut g = ResourceGauge::full(max);

        for _ in 0..64 {
            match rng.next_u64() % 8 {
                0 => {
                    g.set_max(rng.range_f32(-10.0, 500.0));
                }
                1 => {
                    g.fill();
                }
                _ => {
                    g.mutate(rng.range_f32(-1_000.0, 1_000.0));
                }
            }
            assert!(g.current() >= 0.0, "current went negative: {}", g.current());
            assert!(g.current() <= g.max(), "current {} above max {}", g.current(), g.max());
            assert!((0.0..=1.0).contains(&g.percentage()));
        }
    }
}
