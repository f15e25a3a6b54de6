//! Behavioral tests for the pacer under a simulated clock.
//!
//! Every test drives a `ManualClock`, so minutes of pacing run instantly and
//! every sleep is observable.

use metronome_rate_limit::{Clock, ManualClock, Pacer, PacingMode, WINDOW};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn pacer(rpm: u32, burst: u32, mode: PacingMode) -> (Arc<Pacer>, ManualClock) {
    let clock = ManualClock::new();
    let pacer = Pacer::new(NonZeroU32::new(rpm).unwrap(), NonZeroU32::new(burst).unwrap())
        .with_clock(Arc::new(clock.clone()))
        .with_mode(mode);
    (Arc::new(pacer), clock)
}

/// Idle gaps between calls, in seconds. Mixes back-to-back bursts, short
/// pauses and gaps longer than the window.
const GAPS: [u64; 17] = [0, 0, 1, 0, 5, 0, 0, 17, 0, 2, 30, 0, 0, 0, 61, 0, 3];

/// Run `calls` consults, idling per `GAPS`, returning each call's release time.
fn drive(pacer: &Pacer, clock: &ManualClock, calls: usize) -> Vec<Duration> {
    let mut releases = Vec::with_capacity(calls);
    for i in 0..calls {
        clock.advance(secs(GAPS[i % GAPS.len()]));
        pacer.await_slot();
        releases.push(clock.now());
    }
    releases
}

/// Largest number of timestamps inside any half-open 60-second span.
fn busiest_window(stamps: &[Duration]) -> usize {
    stamps
        .iter()
        .map(|start| {
            stamps
                .iter()
                .filter(|t| **t >= *start && **t < *start + WINDOW)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn test_scenario_three_calls_at_time_zero_do_not_wait() {
    let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

    for _ in 0..3 {
        pacer.await_slot();
    }

    assert!(clock.sleeps().is_empty());
    assert_eq!(pacer.history(), vec![secs(0); 3]);
}

#[test]
fn test_scenario_fourth_call_waits_sixty_seconds() {
    let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

    for _ in 0..3 {
        pacer.await_slot();
    }
    assert_eq!(pacer.pending_wait(), Some(secs(60)));
    pacer.await_slot();

    assert_eq!(clock.sleeps(), vec![secs(60)]);
}

#[test]
fn test_scenario_burst_cap_waits_fifty_eight_seconds() {
    let (pacer, clock) = pacer(100, 2, PacingMode::Reference);

    pacer.await_slot();
    clock.advance_to(secs(1));
    pacer.await_slot();
    clock.advance_to(secs(2));
    pacer.await_slot();

    assert_eq!(clock.sleeps(), vec![secs(58)]);
}

#[test]
fn test_scenario_long_idle_returns_immediately() {
    let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

    for _ in 0..3 {
        pacer.await_slot();
    }
    clock.advance(secs(90));
    pacer.await_slot();

    assert!(clock.sleeps().is_empty());
    assert_eq!(pacer.history(), vec![secs(90)]);
}

#[test]
fn test_strict_mode_never_overflows_either_cap() {
    for (rpm, burst) in [(3, 5), (5, 2), (10, 4), (1, 1), (4, 4)] {
        let (pacer, clock) = pacer(rpm, burst, PacingMode::Strict);
        let releases = drive(&pacer, &clock, 80);

        let busiest = busiest_window(&releases);
        assert!(
            busiest <= burst as usize,
            "rpm={rpm} burst={burst}: {busiest} calls in one window exceeds burst"
        );
        assert!(
            busiest <= rpm as usize,
            "rpm={rpm} burst={burst}: {busiest} calls in one window exceeds rpm"
        );
    }
}

#[test]
fn test_strict_mode_back_to_back_calls_fill_each_window() {
    let (pacer, clock) = pacer(3, 5, PacingMode::Strict);

    let releases: Vec<_> = (0..9)
        .map(|_| {
            pacer.await_slot();
            clock.now()
        })
        .collect();

    assert_eq!(
        releases,
        vec![
            secs(0),
            secs(0),
            secs(0),
            secs(60),
            secs(60),
            secs(60),
            secs(120),
            secs(120),
            secs(120),
        ]
    );
}

#[test]
fn test_waits_are_positive_and_bounded_by_window() {
    for mode in [PacingMode::Reference, PacingMode::Strict] {
        let (pacer, clock) = pacer(3, 2, mode);
        drive(&pacer, &clock, 60);

        let sleeps = clock.sleeps();
        assert!(!sleeps.is_empty());
        for sleep in sleeps {
            assert!(sleep > Duration::ZERO, "{mode}: zero-length sleep recorded");
            assert!(sleep <= WINDOW, "{mode}: sleep {sleep:?} longer than window");
        }
    }
}

#[test]
fn test_history_is_always_sorted() {
    for mode in [PacingMode::Reference, PacingMode::Strict] {
        let (pacer, clock) = pacer(4, 6, mode);
        for i in 0..60 {
            clock.advance(secs(GAPS[i % GAPS.len()]));
            pacer.await_slot();

            let history = pacer.history();
            assert!(
                history.windows(2).all(|pair| pair[0] <= pair[1]),
                "{mode}: unsorted history {history:?}"
            );
            assert!(history.len() <= pacer.capacity());
        }
    }
}

#[test]
fn test_stale_entries_are_pruned_and_ignored() {
    let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

    for i in 0..60 {
        clock.advance(secs(GAPS[i % GAPS.len()]));
        pacer.await_slot();

        let history = pacer.history();
        let latest = *history.last().unwrap();
        assert!(
            history.iter().all(|t| latest - *t <= WINDOW),
            "entry older than the window survived: {history:?}"
        );
    }

    // Saturate, then idle past the window: the old entries must not cause a wait.
    let before = clock.sleeps().len();
    clock.advance(secs(61));
    assert_eq!(pacer.pending_wait(), Some(Duration::ZERO));
    pacer.await_slot();
    assert_eq!(clock.sleeps().len(), before);
    assert_eq!(pacer.history().len(), 1);
}

#[test]
fn test_concurrent_callers_are_serialized() {
    let (pacer, clock) = pacer(5, 5, PacingMode::Reference);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pacer = Arc::clone(&pacer);
            thread::spawn(move || pacer.await_slot())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Five fit at t=0, the sixth waits out both checks, and by then the
    // window has cleared for the last two.
    assert_eq!(clock.sleeps(), vec![secs(60), secs(60)]);
    assert_eq!(pacer.history(), vec![secs(120), secs(120)]);
}

#[test]
fn test_concurrent_callers_in_strict_mode() {
    let (pacer, clock) = pacer(5, 5, PacingMode::Strict);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pacer = Arc::clone(&pacer);
            thread::spawn(move || pacer.await_slot())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(clock.sleeps(), vec![secs(60)]);
    assert_eq!(pacer.history(), vec![secs(60), secs(60), secs(60)]);
}

#[test]
fn test_default_clock_does_not_wait_under_caps() {
    let pacer = Pacer::new(NonZeroU32::new(10).unwrap(), NonZeroU32::new(10).unwrap());
    let started = std::time::Instant::now();
    for _ in 0..5 {
        pacer.await_slot();
    }
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(pacer.history().len(), 5);
    assert_eq!(pacer.mode(), PacingMode::Reference);
}
