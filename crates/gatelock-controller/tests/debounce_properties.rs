//! Property-based tests for the signal debouncer.

use gatelock_controller::SignalDebouncer;
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

/// Times (ms from start) at which a held line sampled every `period_ms` is accepted.
fn accepted_times(window_ms: u64, period_ms: u64, samples: u64) -> Vec<u64> {
    let mut debouncer = SignalDebouncer::new(Duration::from_millis(window_ms));
    let start = Instant::now();

    (0..samples)
        .map(|i| i * period_ms)
        .filter(|&t| debouncer.check_and_accept(start + Duration::from_millis(t), true))
        .collect()
}

proptest! {
    /// Property: a held line yields one acceptance every ceil(window/period) samples.
    #[test]
    fn prop_held_line_acceptance_count(
        window_ms in 1u64..1000,
        period_ms in 1u64..500,
        samples in 1u64..200,
    ) {
        let accepted = accepted_times(window_ms, period_ms, samples);
        let stride = window_ms.div_ceil(period_ms);

        prop_assert_eq!(accepted.len() as u64, samples.div_ceil(stride));
        prop_assert_eq!(accepted.first().copied(), Some(0));
    }

    /// Property: no two acceptances are closer than the window.
    #[test]
    fn prop_acceptances_respect_window(
        window_ms in 1u64..1000,
        offsets in prop::collection::vec((0u64..2000, any::<bool>()), 1..100),
    ) {
        let mut debouncer = SignalDebouncer::new(Duration::from_millis(window_ms));
        let start = Instant::now();

        let mut times: Vec<(u64, bool)> = offsets;
        times.sort_by_key(|(t, _)| *t);

        let accepted: Vec<u64> = times
            .into_iter()
            .filter(|&(t, active)| {
                debouncer.check_and_accept(start + Duration::from_millis(t), active)
            })
            .map(|(t, _)| t)
            .collect();

        for pair in accepted.windows(2) {
            prop_assert!(pair[1] - pair[0] >= window_ms);
        }
    }

    /// Property: inactive samples never change the outcome of later samples.
    #[test]
    fn prop_inactive_samples_are_ignored(
        window_ms in 1u64..1000,
        t in 0u64..5000,
    ) {
        let mut debouncer = SignalDebouncer::new(Duration::from_millis(window_ms));
        let start = Instant::now();

        prop_assert!(!debouncer.check_and_accept(start + Duration::from_millis(t), false));
        prop_assert!(debouncer.last_accepted_at().is_none());
        prop_assert!(debouncer.check_and_accept(start + Duration::from_millis(t), true));
    }
}

#[test]
fn test_default_timing_accepts_every_third_sample() {
    assert_eq!(accepted_times(250, 100, 10), vec![0, 300, 600, 900]);
}
