use foundation::time::{Time, TimeSpan};
use foundation::viewport::Viewport;

/// Cubic ease-in-out on `[0, 1]`. Both endpoints are exact.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

/// Time-based camera animation between two viewports.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTween {
    pub from: Viewport,
    pub to: Viewport,
    pub span: TimeSpan,
}

impl CameraTween {
    pub fn new(from: Viewport, to: Viewport, start: Time, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::starting_at(start, duration_ms),
        }
    }

    pub fn sample(&self, now: Time) -> Viewport {
        self.from.lerp(self.to, ease_in_out(self.span.progress(now)))
    }

    pub fn is_finished(&self, now: Time) -> bool {
        now >= self.span.end
    }
}
