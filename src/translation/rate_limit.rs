/*!
 * Shared request cadence and backoff state.
 *
 * Every translation request reserves a start slot from a single
 * `RateLimiter`. Slots are handed out under a mutex, so two requests can
 * never start closer together than the interval in effect when the earlier
 * slot was reserved, no matter how many workers are calling at once.
 *
 * The same interval doubles as the backoff delay: each failure doubles it
 * (up to a ceiling), which both lengthens the retry sleep and widens the
 * spacing of every later request.
 */

use async_trait::async_trait;
use log::trace;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Source of time and suspension for the rate limiter and retry loop
#[async_trait]
pub trait Clock: Send + Sync + Debug {
    /// Current instant
    fn now(&self) -> Instant;

    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock for tests: sleeping advances time instantly and is recorded
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    inner: Mutex<ManualClockState>,
}

#[derive(Debug, Default)]
struct ManualClockState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            inner: Mutex::new(ManualClockState::default()),
        }
    }

    /// Move virtual time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().elapsed += duration;
    }

    /// Virtual time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed
    }

    /// Every sleep requested so far, in call order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().sleeps.clone()
    }

    /// The instant the clock started at
    pub fn origin(&self) -> Instant {
        self.origin
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.inner.lock().elapsed
    }

    async fn sleep(&self, duration: Duration) {
        {
            let mut state = self.inner.lock();
            state.sleeps.push(duration);
            state.elapsed += duration;
        }
        tokio::task::yield_now().await;
    }
}

/// Mutable cadence state shared by all workers
#[derive(Debug, Clone)]
pub struct RateState {
    /// Minimum spacing between request starts, also the current backoff delay
    pub interval: Duration,
    /// Start slot of the most recently reserved request
    pub last_request: Option<Instant>,
}

/// A reserved request start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// When the request may start
    pub start: Instant,
    /// How long the caller must wait from `now` to reach `start`
    pub wait: Duration,
    /// Interval in effect when the slot was reserved
    pub interval: Duration,
}

/// Process-wide rate limiter with multiplicative backoff
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<RateState>,
    initial_interval: Duration,
    max_interval: Duration,
    reset_on_success: bool,
}

impl RateLimiter {
    /// Create a limiter starting at `initial_interval`, capped at `max_interval`
    pub fn new(initial_interval: Duration, max_interval: Duration) -> Self {
        Self {
            state: Mutex::new(RateState {
                interval: initial_interval,
                last_request: None,
            }),
            initial_interval,
            max_interval: max_interval.max(initial_interval),
            reset_on_success: false,
        }
    }

    /// Restore the initial interval after every success
    pub fn with_reset_on_success(mut self, reset: bool) -> Self {
        self.reset_on_success = reset;
        self
    }

    /// Reserve the next start slot.
    ///
    /// The slot is `max(now, last + interval)` and becomes the new `last`
    /// before the lock is released, so concurrent callers queue up behind it.
    pub fn reserve(&self, now: Instant) -> Reservation {
        let mut state = self.state.lock();
        let start = match state.last_request {
            Some(last) => (last + state.interval).max(now),
            None => now,
        };
        state.last_request = Some(start);

        let reservation = Reservation {
            start,
            wait: start.saturating_duration_since(now),
            interval: state.interval,
        };
        trace!(
            "Reserved request slot in {:?} (interval {:?})",
            reservation.wait, reservation.interval
        );
        reservation
    }

    /// Double the interval, clamped to the ceiling, and return the new value
    pub fn record_failure(&self) -> Duration {
        let mut state = self.state.lock();
        state.interval = state.interval.saturating_mul(2).min(self.max_interval);
        state.interval
    }

    /// Note a successful request
    pub fn record_success(&self) {
        if self.reset_on_success {
            self.state.lock().interval = self.initial_interval;
        }
    }

    /// Interval currently in effect
    pub fn current_interval(&self) -> Duration {
        self.state.lock().interval
    }

    /// Snapshot of the shared state
    pub fn snapshot(&self) -> RateState {
        self.state.lock().clone()
    }

    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }
}
