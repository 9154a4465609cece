use foundation::DocumentId;
use foundation::math::LatLng;
use foundation::time::Time;
use foundation::viewport::Viewport;
use runtime::{Metrics, TimerSlot};
use scene::MapEngineAdapter;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HoverSyncOptions {
    pub delay_ms: u64,
    pub preview_zoom: f64,
    pub preview_duration_ms: u64,
    pub return_duration_ms: u64,
}

/// Camera move waiting on the hover debounce.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PendingMove {
    pub document: DocumentId,
    pub target: Viewport,
}

/// Couples the external document list to the map camera.
///
/// Ordering contract: every entry point cancels the outstanding timer before
/// doing anything else, and the slot holds at most one timer, so a move can
/// only ever fire for the most recent hover.
#[derive(Debug)]
pub struct HoverSync {
    opts: HoverSyncOptions,
    hovered: Option<DocumentId>,
    timer: TimerSlot<PendingMove>,
    home: Option<Viewport>,
    /// The camera left home because of a hover or a list click.
    away: bool,
}

impl HoverSync {
    pub fn new(opts: HoverSyncOptions) -> Self {
        Self {
            opts,
            hovered: None,
            timer: TimerSlot::new(),
            home: None,
            away: false,
        }
    }

    pub fn options(&self) -> &HoverSyncOptions {
        &self.opts
    }

    /// Captures the home viewport. Only the first call has any effect.
    pub fn attach(&mut self, camera: Viewport) -> bool {
        if self.home.is_some() {
            return false;
        }
        tracing::debug!(lat = camera.center.lat, lng = camera.center.lng, zoom = camera.zoom, "hover: home captured");
        self.home = Some(camera);
        true
    }

    pub fn home(&self) -> Option<Viewport> {
        self.home
    }

    pub fn hovered(&self) -> Option<DocumentId> {
        self.hovered
    }

    pub fn pending(&self) -> Option<&PendingMove> {
        self.timer.payload()
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    fn preview(&self, document: DocumentId, at: LatLng) -> PendingMove {
        PendingMove {
            document,
            target: Viewport::new(at, self.opts.preview_zoom),
        }
    }

    /// Sets the hovered id without touching the camera. Marker hovers go
    /// through here. Returns whether the id changed.
    pub fn set_hovered(&mut self, id: Option<DocumentId>) -> bool {
        if self.hovered == id {
            return false;
        }
        self.hovered = id;
        true
    }

    /// Drops the pending move, if any.
    pub fn cancel_pending(&mut self, metrics: &mut Metrics) -> bool {
        let Some(handle) = self.timer.cancel() else {
            return false;
        };
        metrics.incr("hover.timers_cancelled");
        tracing::debug!(timer = handle.0, "hover: timer cancelled");
        true
    }

    /// List row entered: highlight now, move the camera after the delay.
    pub fn on_enter(&mut self, now: Time, document: DocumentId, at: LatLng, metrics: &mut Metrics) {
        self.cancel_pending(metrics);
        self.hovered = Some(document);
        let armed = self.timer.arm(now, self.opts.delay_ms, self.preview(document, at));
        metrics.incr("hover.timers_armed");
        tracing::debug!(timer = armed.handle.0, document = document.0, delay_ms = self.opts.delay_ms, "hover: timer armed");
    }

    /// List row left. Returns `true` when the camera was sent home.
    ///
    /// The camera only goes home if a hover or click actually moved it and no
    /// highlight selection owns the view.
    pub fn on_leave(
        &mut self,
        surface: &mut dyn MapEngineAdapter,
        selection_active: bool,
        metrics: &mut Metrics,
    ) -> bool {
        self.cancel_pending(metrics);
        self.hovered = None;
        let away = std::mem::take(&mut self.away);
        if !away || selection_active {
            return false;
        }
        let Some(home) = self.home else {
            return false;
        };
        surface.fly_to(home, self.opts.return_duration_ms);
        metrics.incr("camera.commands");
        tracing::debug!(duration_ms = self.opts.return_duration_ms, "hover: camera back home");
        true
    }

    /// List row clicked: move now, bypassing the debounce.
    pub fn on_click(
        &mut self,
        surface: &mut dyn MapEngineAdapter,
        document: DocumentId,
        at: LatLng,
        metrics: &mut Metrics,
    ) {
        self.cancel_pending(metrics);
        let mv = self.preview(document, at);
        self.fly(surface, mv, metrics);
    }

    /// Fires the pending move once its deadline has passed. Returns the
    /// document the camera moved to.
    pub fn poll(
        &mut self,
        now: Time,
        surface: &mut dyn MapEngineAdapter,
        metrics: &mut Metrics,
    ) -> Option<DocumentId> {
        let (handle, mv) = self.timer.take_due(now)?;
        metrics.incr("hover.timers_fired");
        tracing::debug!(timer = handle.0, document = mv.document.0, "hover: timer fired");
        self.fly(surface, mv, metrics);
        Some(mv.document)
    }

    /// Teardown: no timer may outlive the view.
    pub fn detach(&mut self, metrics: &mut Metrics) {
        self.cancel_pending(metrics);
        self.hovered = None;
        self.away = false;
    }

    fn fly(&mut self, surface: &mut dyn MapEngineAdapter, mv: PendingMove, metrics: &mut Metrics) {
        surface.fly_to(mv.target, self.opts.preview_duration_ms);
        metrics.incr("camera.commands");
        tracing::debug!(
            document = mv.document.0,
            zoom = mv.target.zoom,
            duration_ms = self.opts.preview_duration_ms,
            "hover: camera preview"
        );
        self.away = true;
    }
}
