use std::env;

use catalog::GazetteerQueryOptions;
use foundation::bounds::GeoBounds;
use foundation::math::LatLng;
use foundation::viewport::{Padding, Viewport};
use layers::{HighlightOptions, MarkerStyle};
use services::ServiceEndpoints;

use crate::hover_sync::HoverSyncOptions;

/// Engine constants. Loaded once at construction and never re-read.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fixed country-level view the highlight controller resets to.
    pub country_view: Viewport,
    /// Map clicks outside this box are rejected before any geocoding.
    pub thailand_bounds: GeoBounds,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Marker click target zoom.
    pub detail_zoom: f64,
    /// Hover preview zoom. Less zoomed-in than `detail_zoom`.
    pub preview_zoom: f64,
    pub hover_delay_ms: u64,
    pub preview_duration_ms: u64,
    /// Return-to-home duration. Longer than the preview on purpose.
    pub return_duration_ms: u64,
    pub detail_duration_ms: u64,
    pub fit_duration_ms: u64,
    pub search_debounce_ms: u64,
    pub search_min_chars: usize,
    pub search_max_results: usize,
    /// Width of the companion panel occluding the right edge of the map.
    pub panel_width_px: f64,
    pub fit_padding_px: f64,
    pub province_max_zoom: f64,
    pub region_max_zoom: f64,
    pub fallback_radius_m: f64,
    /// How many of the newest visible documents get a pulse ring.
    pub latest_count: usize,
    pub marker: MarkerStyle,
    pub endpoints: ServiceEndpoints,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            country_view: Viewport::new(LatLng::new(13.0, 101.0), 6.0),
            thailand_bounds: GeoBounds::new(5.6, 97.3, 20.5, 105.7),
            min_zoom: 5.0,
            max_zoom: 18.0,
            detail_zoom: 15.0,
            preview_zoom: 12.0,
            hover_delay_ms: 600,
            preview_duration_ms: 1000,
            return_duration_ms: 1500,
            detail_duration_ms: 800,
            fit_duration_ms: 800,
            search_debounce_ms: 300,
            search_min_chars: 2,
            search_max_results: 10,
            panel_width_px: 380.0,
            fit_padding_px: 40.0,
            province_max_zoom: 10.0,
            region_max_zoom: 8.0,
            fallback_radius_m: 20_000.0,
            latest_count: 3,
            marker: MarkerStyle::default(),
            endpoints: ServiceEndpoints::default(),
        }
    }
}

impl EngineConfig {
    /// Reads `PORTAL_*` overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing or unparsable
    /// values keep their defaults, and so do overrides that would break an
    /// invariant (see [`EngineConfig::validated`]).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();

        let api_url = lookup("PORTAL_API_URL");
        let mut endpoints = match api_url.as_deref() {
            Some(url) if !url.trim().is_empty() => ServiceEndpoints::from_api_url(url.trim()),
            _ => d.endpoints.clone(),
        };
        if let Some(url) = lookup("PORTAL_GEOCODE_URL").filter(|v| !v.trim().is_empty()) {
            endpoints.geocode_url = url.trim().to_string();
        }
        if let Some(url) = lookup("PORTAL_BOUNDARY_URL").filter(|v| !v.trim().is_empty()) {
            endpoints.boundary_url = url.trim().to_string();
        }
        endpoints.timeout_ms = env_var_u64(&lookup, "PORTAL_HTTP_TIMEOUT_MS", endpoints.timeout_ms);

        let config = Self {
            detail_zoom: env_var_f64(&lookup, "PORTAL_DETAIL_ZOOM", d.detail_zoom),
            preview_zoom: env_var_f64(&lookup, "PORTAL_PREVIEW_ZOOM", d.preview_zoom),
            hover_delay_ms: env_var_u64(&lookup, "PORTAL_HOVER_DELAY_MS", d.hover_delay_ms),
            search_debounce_ms: env_var_u64(&lookup, "PORTAL_SEARCH_DEBOUNCE_MS", d.search_debounce_ms),
            panel_width_px: env_var_f64(&lookup, "PORTAL_PANEL_WIDTH_PX", d.panel_width_px),
            fallback_radius_m: env_var_f64(&lookup, "PORTAL_FALLBACK_RADIUS_M", d.fallback_radius_m),
            endpoints,
            ..d.clone()
        };
        config.validated(&d)
    }

    /// Reverts values that break an invariant to `defaults`, logging each.
    ///
    /// Preview stays less zoomed-in than detail, the region cap stays below
    /// the province cap, both zooms stay inside the zoom range, the fallback
    /// radius is positive and the panel width is not negative.
    pub fn validated(mut self, defaults: &Self) -> Self {
        let (min, max) = (self.min_zoom, self.max_zoom);
        let in_range = |z: f64| (min..=max).contains(&z);
        if !in_range(self.detail_zoom) || !in_range(self.preview_zoom) || self.preview_zoom >= self.detail_zoom {
            tracing::warn!(
                preview = self.preview_zoom,
                detail = self.detail_zoom,
                "preview zoom must be below detail zoom within the zoom range; using defaults"
            );
            self.preview_zoom = defaults.preview_zoom;
            self.detail_zoom = defaults.detail_zoom;
        }
        if self.region_max_zoom >= self.province_max_zoom {
            tracing::warn!(
                region = self.region_max_zoom,
                province = self.province_max_zoom,
                "region zoom cap must be below the province cap; using defaults"
            );
            self.region_max_zoom = defaults.region_max_zoom;
            self.province_max_zoom = defaults.province_max_zoom;
        }
        if self.fallback_radius_m <= 0.0 {
            tracing::warn!(radius_m = self.fallback_radius_m, "fallback radius must be positive; using default");
            self.fallback_radius_m = defaults.fallback_radius_m;
        }
        if self.panel_width_px < 0.0 {
            tracing::warn!(width_px = self.panel_width_px, "panel width must not be negative; using default");
            self.panel_width_px = defaults.panel_width_px;
        }
        self
    }

    /// Fit padding with the companion panel reserved on the right.
    pub fn fit_padding(&self) -> Padding {
        let p = self.fit_padding_px;
        Padding {
            right: p + self.panel_width_px,
            ..Padding::uniform(p)
        }
    }

    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            padding: self.fit_padding(),
            min_zoom: self.min_zoom,
            province_max_zoom: self.province_max_zoom,
            region_max_zoom: self.region_max_zoom,
            fit_duration_ms: self.fit_duration_ms,
            country_view: self.country_view,
            reset_duration_ms: self.return_duration_ms,
        }
    }

    pub fn hover_options(&self) -> HoverSyncOptions {
        HoverSyncOptions {
            delay_ms: self.hover_delay_ms,
            preview_zoom: self.preview_zoom,
            preview_duration_ms: self.preview_duration_ms,
            return_duration_ms: self.return_duration_ms,
        }
    }

    pub fn gazetteer_options(&self) -> GazetteerQueryOptions {
        GazetteerQueryOptions {
            min_chars: self.search_min_chars,
            max_results: self.search_max_results,
        }
    }
}

fn env_var_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}
