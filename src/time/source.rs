//! Time source abstraction for real and simulated sessions.
//!
//! The scheduler never reads the system clock directly. It asks a [`TimeSource`]
//! for the calendar time (session start/end boundaries), for a monotonic elapsed
//! time (per-cycle budgets) and to sleep. The simulated source fast-forwards
//! through every sleep instantly, which keeps scheduler tests deterministic.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Trait for abstracting time operations.
pub trait TimeSource {
    /// Current calendar time.
    fn now(&self) -> DateTime<Utc>;

    /// Monotonic time elapsed since the source was created.
    fn elapsed(&self) -> Duration;

    /// Sleep for the specified duration (or simulate it).
    fn sleep(&self, duration: Duration);

    /// Check if this is a simulated time source.
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation backed by the system clock.
pub struct RealTimeSource {
    origin: Instant,
}

impl RealTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for RealTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

struct SimulatedState {
    current: DateTime<Utc>,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Fast-forward time source: sleeping advances the clock instantly.
///
/// Every sleep is recorded so tests can assert on the scheduler's cadence.
/// [`SimulatedTimeSource::advance`] moves the clock without recording a sleep,
/// which stands in for work that takes time (a long capture, for example).
pub struct SimulatedTimeSource {
    state: Mutex<SimulatedState>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(SimulatedState {
                current: start_time,
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            }),
        }
    }

    /// Move the clock forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        Self::step(&mut state, duration);
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    fn step(state: &mut SimulatedState, duration: Duration) {
        state.elapsed += duration;
        state.current += ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::MAX);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimulatedState> {
        // A poisoned lock only means a test panicked mid-update; the clock value is still usable
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.lock().current
    }

    fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.lock();
        state.sleeps.push(duration);
        Self::step(&mut state, duration);
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
