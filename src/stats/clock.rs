//! Monotonic uptime sources

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of monotonic uptime in milliseconds.
///
/// Day identity and session timing are derived from uptime, never from
/// wall-clock time.
pub trait Clock: Send + Sync {
    fn uptime_ms(&self) -> u64;
}

/// Uptime measured from the moment the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to. Used for replay and tests.
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

    pub fn set(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
