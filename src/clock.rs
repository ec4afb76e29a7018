//! Wall-clock source for cache timestamps.
//!
//! Cache entries are persisted across restarts, so their timestamps are
//! wall-clock milliseconds since the Unix epoch rather than `Instant`s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// ```rust
/// # use wayfinder::clock::{Clock, ManualClock};
/// # use std::time::Duration;
/// let clock = ManualClock::new(1_000);
/// clock.advance(Duration::from_millis(500));
/// assert_eq!(clock.now_ms(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Whether a value stamped at `stamped_ms` is still within `ttl` at `now_ms`.
///
/// An entry exactly `ttl` old is still fresh; one millisecond later it is not.
/// Stamps from the future (clock skew between processes) count as fresh.
pub fn is_fresh(stamped_ms: u64, now_ms: u64, ttl: Duration) -> bool {
    now_ms.saturating_sub(stamped_ms) <= ttl.as_millis() as u64
}
