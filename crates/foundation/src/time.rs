/// Monotonic engine time in milliseconds since the clock's origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub fn from_millis(ms: u64) -> Self {
        Time(ms)
    }

    pub fn millis(self) -> u64 {
        self.0
    }

    pub fn plus_millis(self, ms: u64) -> Self {
        Time(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Time) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Half-open interval `[start, end)` of engine time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn starting_at(start: Time, duration_ms: u64) -> Self {
        Self {
            start,
            end: start.plus_millis(duration_ms),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end.since(self.start)
    }

    /// Fraction of the span elapsed at `now`, clamped to `[0, 1]`.
    ///
    /// Zero-length spans are complete immediately.
    pub fn progress(&self, now: Time) -> f64 {
        let total = self.duration_ms();
        if total == 0 {
            return 1.0;
        }
        (now.since(self.start) as f64 / total as f64).clamp(0.0, 1.0)
    }
}
