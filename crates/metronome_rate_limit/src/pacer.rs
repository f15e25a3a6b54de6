//! Dual-window request pacer.
//!
//! [`Pacer`] keeps a short history of recent call timestamps and, when
//! consulted, blocks the caller until one more call fits under both the
//! steady requests-per-minute cap and the burst cap. The whole
//! check-sleep-record sequence runs under one mutex, so concurrent callers
//! queue behind whoever is currently waiting.

use crate::clock::{Clock, MonotonicClock};
use crate::Tier;
use metronome_error::{RateLimitError, RateLimitErrorKind, RateLimitResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Length of the trailing window both caps are measured over.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Upper bound on history slots reserved at construction; the deque grows
/// on demand past this, up to [`Pacer::capacity`].
const PREALLOCATED_SLOTS: usize = 64;

/// How the pacer computes waits and which timestamp it records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PacingMode {
    /// Both waits are computed from the entry time and the entry time is
    /// recorded. The steady check is anchored at the oldest retained entry,
    /// and an entry is pruned once it is strictly more than a window old.
    /// A call may sleep twice in a row even when the first sleep already
    /// satisfied the second check.
    #[default]
    Reference,
    /// The clock is re-read after every sleep and the release time is
    /// recorded. Entries a full window old are pruned, and the steady check
    /// is anchored at the `requests_per_minute`-th most recent entry. No
    /// 60-second span of release times ever holds more calls than either cap.
    Strict,
}

impl PacingMode {
    fn is_expired(self, age: Duration) -> bool {
        match self {
            PacingMode::Reference => age > WINDOW,
            PacingMode::Strict => age >= WINDOW,
        }
    }
}

/// Blocking gate enforcing a steady-state and a burst cap.
///
/// Construct one per rate-limited resource and share it with `Arc`. Call
/// [`Pacer::await_slot`] immediately before each outbound request.
///
/// # Example
///
/// ```
/// use metronome_rate_limit::{ManualClock, Pacer};
/// use std::num::NonZeroU32;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let pacer = Pacer::new(NonZeroU32::new(100).unwrap(), NonZeroU32::new(2).unwrap())
///     .with_clock(Arc::new(clock.clone()));
///
/// pacer.await_slot();
/// clock.advance(Duration::from_secs(1));
/// pacer.await_slot();
/// clock.advance(Duration::from_secs(1));
/// pacer.await_slot();
///
/// // Two calls already sit in the window anchored at t=0.
/// assert_eq!(clock.sleeps(), vec![Duration::from_secs(58)]);
/// ```
#[derive(Debug)]
pub struct Pacer {
    requests_per_minute: NonZeroU32,
    burst_limit: NonZeroU32,
    mode: PacingMode,
    clock: Arc<dyn Clock>,
    history: Mutex<VecDeque<Duration>>,
}

impl Pacer {
    /// Create a pacer on the system monotonic clock in reference mode.
    pub fn new(requests_per_minute: NonZeroU32, burst_limit: NonZeroU32) -> Self {
        let reserved = (requests_per_minute.max(burst_limit).get() as usize).min(PREALLOCATED_SLOTS);
        Self {
            requests_per_minute,
            burst_limit,
            mode: PacingMode::default(),
            clock: Arc::new(MonotonicClock::new()),
            history: Mutex::new(VecDeque::with_capacity(reserved)),
        }
    }

    /// Build a pacer from a tier's `rpm` and `burst` limits.
    ///
    /// A tier without a burst limit gets one equal to its `rpm`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTier` if the tier has no `rpm`, or if either limit is
    /// zero.
    #[instrument(skip(tier), fields(tier = tier.name()))]
    pub fn from_tier<T: Tier + ?Sized>(tier: &T) -> RateLimitResult<Self> {
        let invalid = |reason: &str| {
            RateLimitError::new(RateLimitErrorKind::InvalidTier {
                tier: tier.name().to_string(),
                reason: reason.to_string(),
            })
        };

        let rpm = tier
            .rpm()
            .ok_or_else(|| invalid("no requests-per-minute limit"))?;
        let rpm = NonZeroU32::new(rpm).ok_or_else(|| invalid("requests per minute must be positive"))?;

        let burst = match tier.burst() {
            Some(burst) => {
                NonZeroU32::new(burst).ok_or_else(|| invalid("burst limit must be positive"))?
            }
            None => rpm,
        };

        debug!(rpm = rpm.get(), burst = burst.get(), "Building pacer from tier");
        Ok(Self::new(rpm, burst))
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the pacing mode.
    pub fn with_mode(mut self, mode: PacingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Steady-state cap.
    pub fn requests_per_minute(&self) -> NonZeroU32 {
        self.requests_per_minute
    }

    /// Burst cap.
    pub fn burst_limit(&self) -> NonZeroU32 {
        self.burst_limit
    }

    /// Active pacing mode.
    pub fn mode(&self) -> PacingMode {
        self.mode
    }

    /// Maximum number of timestamps retained.
    pub fn capacity(&self) -> usize {
        self.requests_per_minute.max(self.burst_limit).get() as usize
    }

    /// Snapshot of recorded timestamps, oldest first.
    ///
    /// Waits for the gate if another caller is inside [`Pacer::await_slot`].
    pub fn history(&self) -> Vec<Duration> {
        self.lock().iter().copied().collect()
    }

    /// Block until one more call fits under both caps, then record it.
    ///
    /// Never fails. Returns immediately when neither cap is reached.
    #[instrument(
        skip(self),
        fields(
            rpm = self.requests_per_minute.get(),
            burst = self.burst_limit.get(),
            mode = %self.mode
        )
    )]
    pub fn await_slot(&self) {
        let mut history = self.lock();

        let recorded = match self.mode {
            PacingMode::Reference => self.pace_reference(&mut history),
            PacingMode::Strict => self.pace_strict(&mut history),
        };

        history.push_back(recorded);
        while history.len() > self.capacity() {
            history.pop_front();
        }

        debug!(
            recorded_secs = recorded.as_secs_f64(),
            retained = history.len(),
            "Slot granted"
        );
    }

    /// How long [`Pacer::await_slot`] would block if called right now.
    ///
    /// Returns `None` while another caller holds the gate, since the answer
    /// would be stale by the time that caller leaves. Never blocks.
    pub fn pending_wait(&self) -> Option<Duration> {
        let history = match self.history.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };

        let now = self.clock.now();
        let mut live = history.clone();
        drop(history);
        self.prune(&mut live, now);

        let burst = self.burst_wait(&live, now);
        let wait = match self.mode {
            PacingMode::Reference => burst + self.steady_wait(&live, now),
            PacingMode::Strict => {
                let steady = self.steady_wait(&live, now + burst);
                burst + steady
            }
        };
        Some(wait)
    }

    fn pace_reference(&self, history: &mut VecDeque<Duration>) -> Duration {
        let now = self.clock.now();
        self.prune(history, now);

        let burst = self.burst_wait(history, now);
        self.sleep("burst", burst);

        let steady = self.steady_wait(history, now);
        self.sleep("steady", steady);

        now
    }

    fn pace_strict(&self, history: &mut VecDeque<Duration>) -> Duration {
        let mut now = self.clock.now();
        self.prune(history, now);

        let burst = self.burst_wait(history, now);
        if self.sleep("burst", burst) {
            now = self.clock.now();
        }

        let steady = self.steady_wait(history, now);
        if self.sleep("steady", steady) {
            now = self.clock.now();
        }

        now
    }

    fn prune(&self, history: &mut VecDeque<Duration>, now: Duration) {
        while let Some(&oldest) = history.front() {
            if !self.mode.is_expired(now.saturating_sub(oldest)) {
                break;
            }
            history.pop_front();
        }
    }

    fn burst_wait(&self, history: &VecDeque<Duration>, now: Duration) -> Duration {
        let burst = self.burst_limit.get() as usize;
        if history.len() < burst {
            return Duration::ZERO;
        }
        window_remaining(history[history.len() - burst], now)
    }

    fn steady_wait(&self, history: &VecDeque<Duration>, now: Duration) -> Duration {
        let rpm = self.requests_per_minute.get() as usize;
        if history.len() < rpm {
            return Duration::ZERO;
        }
        let anchor = match self.mode {
            PacingMode::Reference => history[0],
            PacingMode::Strict => history[history.len() - rpm],
        };
        window_remaining(anchor, now)
    }

    /// Sleeps for `wait` if non-zero; returns whether it slept.
    fn sleep(&self, reason: &'static str, wait: Duration) -> bool {
        if wait.is_zero() {
            return false;
        }
        info!(reason, wait_secs = wait.as_secs_f64(), "Waiting for a free slot");
        self.clock.sleep(wait);
        true
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Duration>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Time until `anchor` falls out of the window, clamped at zero.
fn window_remaining(anchor: Duration, now: Duration) -> Duration {
    (anchor + WINDOW).saturating_sub(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn pacer(rpm: u32, burst: u32, mode: PacingMode) -> (Pacer, ManualClock) {
        let clock = ManualClock::new();
        let pacer = Pacer::new(NonZeroU32::new(rpm).unwrap(), NonZeroU32::new(burst).unwrap())
            .with_clock(Arc::new(clock.clone()))
            .with_mode(mode);
        (pacer, clock)
    }

    #[test]
    fn test_calls_under_both_caps_return_immediately() {
        let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

        for _ in 0..3 {
            pacer.await_slot();
        }

        assert!(clock.sleeps().is_empty());
        assert_eq!(pacer.history(), vec![secs(0), secs(0), secs(0)]);
    }

    #[test]
    fn test_steady_cap_blocks_fourth_call_for_full_window() {
        let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

        for _ in 0..4 {
            pacer.await_slot();
        }

        assert_eq!(clock.sleeps(), vec![secs(60)]);
        assert_eq!(clock.now(), secs(60));
        // Entry time is recorded, not release time.
        assert_eq!(pacer.history(), vec![secs(0); 4]);
    }

    #[test]
    fn test_burst_cap_anchors_at_oldest_of_last_burst_calls() {
        let (pacer, clock) = pacer(100, 2, PacingMode::Reference);

        pacer.await_slot();
        clock.advance(secs(1));
        pacer.await_slot();
        clock.advance(secs(1));
        pacer.await_slot();

        assert_eq!(clock.sleeps(), vec![secs(58)]);
        assert_eq!(pacer.history(), vec![secs(0), secs(1), secs(2)]);
    }

    #[test]
    fn test_idle_period_prunes_history() {
        let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

        for _ in 0..3 {
            pacer.await_slot();
        }
        clock.advance(secs(61));
        assert_eq!(pacer.pending_wait(), Some(Duration::ZERO));

        pacer.await_slot();

        assert!(clock.sleeps().is_empty());
        assert_eq!(pacer.history(), vec![secs(61)]);
    }

    #[test]
    fn test_entry_exactly_one_window_old_yields_zero_wait() {
        let (pacer, clock) = pacer(3, 5, PacingMode::Reference);

        for _ in 0..3 {
            pacer.await_slot();
        }
        clock.advance(secs(60));
        pacer.await_slot();

        // Not pruned (age is not strictly greater), but the wait clamps to zero.
        assert!(clock.sleeps().is_empty());
        assert_eq!(pacer.history().len(), 4);
    }

    fn seed(pacer: &Pacer, stamps: &[u64]) {
        pacer.lock().extend(stamps.iter().map(|s| secs(*s)));
    }

    #[test]
    fn test_burst_and_steady_anchor_at_different_entries() {
        let (reference, clock) = pacer(3, 2, PacingMode::Reference);
        seed(&reference, &[0, 30, 40]);
        clock.advance_to(secs(45));
        reference.await_slot();

        assert_eq!(clock.sleeps(), vec![secs(45), secs(15)]);
        assert_eq!(reference.history(), vec![secs(30), secs(40), secs(45)]);

        let (strict, clock) = pacer(3, 2, PacingMode::Strict);
        seed(&strict, &[0, 30, 40]);
        clock.advance_to(secs(45));
        strict.await_slot();

        assert_eq!(clock.sleeps(), vec![secs(45)]);
        assert_eq!(strict.history(), vec![secs(30), secs(40), secs(90)]);
    }

    #[test]
    fn test_reference_mode_double_sleep_quirk() {
        let (pacer, clock) = pacer(2, 2, PacingMode::Reference);

        pacer.await_slot();
        clock.advance_to(secs(10));
        pacer.await_slot();
        clock.advance_to(secs(20));
        pacer.await_slot();

        // Both checks anchor at t=0 and both waits come from the entry time.
        assert_eq!(clock.sleeps(), vec![secs(40), secs(40)]);
        assert_eq!(clock.now(), secs(100));
        assert_eq!(pacer.history(), vec![secs(10), secs(20)]);
    }

    #[test]
    fn test_strict_mode_rereads_clock_between_checks() {
        let (pacer, clock) = pacer(2, 2, PacingMode::Strict);

        pacer.await_slot();
        clock.advance_to(secs(10));
        pacer.await_slot();
        clock.advance_to(secs(20));
        pacer.await_slot();

        assert_eq!(clock.sleeps(), vec![secs(40)]);
        assert_eq!(clock.now(), secs(60));
        assert_eq!(pacer.history(), vec![secs(10), secs(60)]);
    }

    #[test]
    fn test_pending_wait_matches_upcoming_sleep() {
        let (pacer, clock) = pacer(2, 2, PacingMode::Reference);
        pacer.await_slot();
        clock.advance_to(secs(10));
        pacer.await_slot();
        clock.advance_to(secs(20));
        assert_eq!(pacer.pending_wait(), Some(secs(80)));

        let (strict, clock) = pacer_pair_strict();
        clock.advance_to(secs(20));
        assert_eq!(strict.pending_wait(), Some(secs(40)));
    }

    fn pacer_pair_strict() -> (Pacer, ManualClock) {
        let (pacer, clock) = pacer(2, 2, PacingMode::Strict);
        pacer.await_slot();
        clock.advance_to(secs(10));
        pacer.await_slot();
        (pacer, clock)
    }

    #[test]
    fn test_history_is_bounded_by_larger_cap() {
        let (pacer, clock) = pacer(2, 4, PacingMode::Reference);

        for _ in 0..10 {
            pacer.await_slot();
            assert!(pacer.history().len() <= 4);
        }
        assert_eq!(pacer.capacity(), 4);
        assert!(clock.total_slept() >= secs(60));
    }

    #[test]
    fn test_huge_limits_do_not_reserve_full_history() {
        let clock = ManualClock::new();
        let pacer = Pacer::new(NonZeroU32::MAX, NonZeroU32::new(1).unwrap())
            .with_clock(Arc::new(clock.clone()));

        pacer.await_slot();
        clock.advance(secs(61));
        pacer.await_slot();

        assert_eq!(pacer.capacity(), u32::MAX as usize);
        assert_eq!(pacer.history(), vec![secs(61)]);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_from_tier_defaults_burst_to_rpm() {
        let tier = crate::TierConfig {
            name: "Custom".to_string(),
            rpm: Some(7),
            burst: None,
            models: Default::default(),
        };
        let pacer = Pacer::from_tier(&tier).unwrap();
        assert_eq!(pacer.requests_per_minute().get(), 7);
        assert_eq!(pacer.burst_limit().get(), 7);
    }

    #[test]
    fn test_from_tier_rejects_missing_or_zero_limits() {
        let mut tier = crate::TierConfig {
            name: "Broken".to_string(),
            rpm: None,
            burst: Some(5),
            models: Default::default(),
        };
        let err = Pacer::from_tier(&tier).unwrap_err();
        assert!(matches!(err.kind(), RateLimitErrorKind::InvalidTier { .. }));

        tier.rpm = Some(0);
        assert!(Pacer::from_tier(&tier).is_err());

        tier.rpm = Some(3);
        tier.burst = Some(0);
        assert!(Pacer::from_tier(&tier).is_err());
    }

    #[test]
    fn test_mode_round_trips_through_strings() {
        assert_eq!("strict".parse::<PacingMode>().unwrap(), PacingMode::Strict);
        assert_eq!(PacingMode::Reference.to_string(), "reference");
        assert!("lenient".parse::<PacingMode>().is_err());
    }
}
