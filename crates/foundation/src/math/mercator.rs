//! Spherical web-mercator helpers for camera fitting.
//!
//! Pixel math follows the usual slippy-map convention: the world is
//! `TILE_SIZE * 2^zoom` pixels wide at `zoom`.

use serde::{Deserialize, Serialize};

use crate::bounds::GeoBounds;
use crate::viewport::{Padding, Viewport, ViewportSize};

use super::LatLng;

pub const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the square mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Projects to normalized mercator space, `[0, 1]` on both axes, y growing south.
pub fn project_unit(p: LatLng) -> [f64; 2] {
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) * 0.5;
    [x, y]
}

pub fn unproject_unit(xy: [f64; 2]) -> LatLng {
    let lng = xy[0] * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * xy[1]);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

pub fn world_size_px(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Options for [`fit_bounds`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub padding: Padding,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

/// Computes the viewport that shows `bounds` inside the unpadded part of a
/// `size` pixel canvas.
///
/// The zoom is clamped to `[min_zoom, max_zoom]`; a degenerate (single point)
/// box therefore lands exactly on `max_zoom`. The center is shifted by half the
/// padding difference so the geometry is centered in the visible area rather
/// than under an occluding panel.
pub fn fit_bounds(bounds: GeoBounds, size: ViewportSize, opts: FitOptions) -> Viewport {
    let nw = project_unit(LatLng::new(bounds.north, bounds.west));
    let se = project_unit(LatLng::new(bounds.south, bounds.east));
    let dx = (se[0] - nw[0]).abs();
    let dy = (se[1] - nw[1]).abs();

    let avail_w = (size.width - opts.padding.left - opts.padding.right).max(1.0);
    let avail_h = (size.height - opts.padding.top - opts.padding.bottom).max(1.0);

    let zoom_x = if dx > 0.0 {
        (avail_w / (dx * TILE_SIZE)).log2()
    } else {
        f64::INFINITY
    };
    let zoom_y = if dy > 0.0 {
        (avail_h / (dy * TILE_SIZE)).log2()
    } else {
        f64::INFINITY
    };
    let zoom = zoom_x.min(zoom_y).clamp(opts.min_zoom, opts.max_zoom);

    let world = world_size_px(zoom);
    let center_unit = [(nw[0] + se[0]) * 0.5, (nw[1] + se[1]) * 0.5];
    let offset_x = (opts.padding.right - opts.padding.left) * 0.5 / world;
    let offset_y = (opts.padding.bottom - opts.padding.top) * 0.5 / world;
    let center = unproject_unit([center_unit[0] + offset_x, center_unit[1] + offset_y]);

    Viewport::new(center, zoom)
}
