use serde::{Deserialize, Serialize};

use crate::math::LatLng;

/// Map camera state: center coordinate + zoom level.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Viewport {
    pub const fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Linear interpolation between two viewports, `t` in `[0, 1]`.
    pub fn lerp(self, to: Viewport, t: f64) -> Viewport {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return to;
        }
        Viewport {
            center: LatLng::new(
                self.center.lat + (to.center.lat - self.center.lat) * t,
                self.center.lng + (to.center.lng - self.center.lng) * t,
            ),
            zoom: self.zoom + (to.zoom - self.zoom) * t,
        }
    }
}

/// Canvas size in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// Pixel padding per canvas edge.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}
