use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use foundation::time::Time;

/// Source of engine time.
///
/// Everything time-dependent (hover debounce, search debounce, camera tweens)
/// reads time through this trait so it can be replayed deterministically.
pub trait Clock {
    fn now(&self) -> Time;
}

/// Wall clock, measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Time(self.origin.elapsed().as_millis() as u64)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: Time) -> Self {
        let c = Self::new();
        c.set(t);
        c
    }

    pub fn set(&self, t: Time) {
        self.now_ms.store(t.0, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) -> Time {
        Time(self.now_ms.fetch_add(ms, Ordering::SeqCst) + ms)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        Time(self.now_ms.load(Ordering::SeqCst))
    }
}
