use catalog::{CatalogSnapshot, Category, DocumentCounts, DocumentFilter, Gazetteer, Region, region_of};
use foundation::DocumentId;
use foundation::math::LatLng;
use foundation::viewport::Viewport;
use layers::{
    BoundaryStore, CategoryColor, HighlightController, HighlightSelection, Layer, MarkerFrame,
    MarkerLayer, RenderStats, detail_view, legend, popup_for,
};
use runtime::{Clock, EventBus, Metrics};
use scene::{Color, EventKind, MapEngineAdapter, SurfaceEvent};
use services::{BoundarySource, CounterService, ReverseGeocoder};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, LocationData, NoticeKind};
use crate::hover_sync::HoverSync;
use crate::search::SearchBox;
use crate::state::EngineState;

const MARKER_LAYER: u64 = 1;
const BOUNDARY_LAYER: u64 = 2;
const HIGHLIGHT_LAYER: u64 = 3;

/// External collaborators the engine talks to over the network.
pub struct Collaborators {
    pub geocoder: Box<dyn ReverseGeocoder>,
    pub counters: CounterService,
    pub boundaries: Box<dyn BoundarySource>,
}

/// What one [`MapView::poll`] did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tick {
    /// Document whose hover preview fired.
    pub hover_fired: Option<DocumentId>,
    pub search_ran: bool,
}

/// Top-level controller: one surface, one camera, every layer and controller
/// of a session.
///
/// Ordering contract: the host feeds surface events through
/// [`MapView::handle_event`], calls [`MapView::poll`] from its loop so timers
/// can fire, and drains [`MapView::drain_events`] afterwards. Nothing runs on
/// its own.
pub struct MapView<S: MapEngineAdapter, C: Clock> {
    config: EngineConfig,
    clock: C,
    surface: S,
    state: EngineState,
    services: Collaborators,
    gazetteer: Gazetteer,
    search: SearchBox,
    hover: HoverSync,
    markers: MarkerLayer,
    boundaries: Option<BoundaryStore>,
    highlight: HighlightController,
    events: EventBus<EngineEvent>,
    metrics: Metrics,
}

impl<S: MapEngineAdapter, C: Clock> MapView<S, C> {
    pub fn new(
        config: EngineConfig,
        clock: C,
        surface: S,
        catalog: CatalogSnapshot,
        gazetteer: Gazetteer,
        services: Collaborators,
    ) -> Self {
        let state = EngineState::new(catalog, surface.camera(), config.latest_count);
        Self {
            search: SearchBox::new(config.search_debounce_ms, config.gazetteer_options()),
            hover: HoverSync::new(config.hover_options()),
            markers: MarkerLayer::new(MARKER_LAYER, config.marker),
            highlight: HighlightController::new(HIGHLIGHT_LAYER, config.highlight_options()),
            boundaries: None,
            events: EventBus::new(),
            metrics: Metrics::new(),
            config,
            clock,
            surface,
            state,
            services,
            gazetteer,
        }
    }

    // --- lifecycle ---

    /// Attaches to the surface: subscribes to its events, captures the home
    /// viewport, loads the boundary dataset (first mount only) and renders.
    ///
    /// Never fails: a missing boundary dataset degrades to circles.
    pub async fn mount(&mut self) {
        if self.state.mounted {
            return;
        }
        for kind in EventKind::ALL {
            let listener = self.surface.subscribe(kind);
            self.state.listeners.push(listener);
        }
        self.hover.attach(self.surface.camera());

        if self.boundaries.is_none() {
            let result = self.services.boundaries.fetch().await;
            let store = BoundaryStore::load(BOUNDARY_LAYER, result, self.config.fallback_radius_m);
            if store.is_degraded() {
                self.metrics.incr("boundary.degraded");
            }
            self.boundaries = Some(store);
        }
        if let Some(store) = self.boundaries.as_mut() {
            store.render_hit_targets(&mut self.surface);
        }

        self.state.view = self.surface.camera();
        self.state.mounted = true;
        let stats = self.render_markers();
        tracing::info!(
            documents = self.state.catalog.len(),
            markers = stats.added,
            boundaries = self.boundaries.as_ref().map_or(0, BoundaryStore::len),
            degraded = self.boundaries.as_ref().is_some_and(BoundaryStore::is_degraded),
            "map view mounted"
        );
    }

    /// Detaches from the surface. Cancels every timer, drops every listener
    /// and removes everything this view drew.
    pub fn unmount(&mut self) -> bool {
        if !self.state.mounted {
            return false;
        }
        self.hover.detach(&mut self.metrics);
        self.search.cancel();
        for listener in self.state.listeners.drain(..) {
            self.surface.unsubscribe(listener);
        }
        self.highlight.clear(&mut self.surface);
        self.markers.clear(&mut self.surface);
        if let Some(store) = self.boundaries.as_mut() {
            store.clear(&mut self.surface);
        }
        self.surface.close_popup();
        self.state.selected = None;
        self.state.mounted = false;
        tracing::info!("map view unmounted");
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.state.mounted
    }

    // --- event loop ---

    /// Dispatches one event reported by the surface. Events arriving while
    /// unmounted are dropped.
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> Result<(), EngineError> {
        if !self.state.mounted {
            tracing::debug!(kind = ?event.kind(), "event dropped: view not mounted");
            return Ok(());
        }
        match event {
            SurfaceEvent::MarkerClick { id } => self.click_marker(id).await.map(|_| ()),
            SurfaceEvent::MarkerHover { id } => {
                self.report_hover(Some(id));
                Ok(())
            }
            SurfaceEvent::MarkerOut { id } => {
                if self.hover.hovered() == Some(id) {
                    self.report_hover(None);
                }
                Ok(())
            }
            SurfaceEvent::PointerMove { at } => {
                if let Some(store) = self.boundaries.as_mut() {
                    store.hover_at(&mut self.surface, at);
                }
                Ok(())
            }
            SurfaceEvent::PointerOut => {
                if let Some(store) = self.boundaries.as_mut() {
                    store.clear_hover(&mut self.surface);
                }
                Ok(())
            }
            SurfaceEvent::MapClick { at } => self.map_click(at).await.map(|_| ()),
            SurfaceEvent::ViewChanged { viewport } => {
                self.state.view = viewport;
                self.render_markers();
                Ok(())
            }
        }
    }

    /// Fires whatever timers are due.
    pub fn poll(&mut self) -> Tick {
        let now = self.clock.now();
        let hover_fired = self.hover.poll(now, &mut self.surface, &mut self.metrics);
        let search_ran = self.search.poll(now, &self.gazetteer).is_some();
        Tick {
            hover_fired,
            search_ran,
        }
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain_payloads()
    }

    // --- document list ---

    /// The pointer entered a list row.
    pub fn list_enter(&mut self, id: DocumentId) -> Result<(), EngineError> {
        if !self.state.mounted {
            return Ok(());
        }
        let Some(doc) = self.state.catalog.document(id) else {
            return Err(self.notify(NoticeKind::UnknownDocument, format!("document {id} is not loaded")));
        };
        let at = doc.position();
        let changed = self.hover.hovered() != Some(id);
        self.hover.on_enter(self.clock.now(), id, at, &mut self.metrics);
        if changed {
            self.emit(EngineEvent::HoverChanged(Some(id)));
            self.render_markers();
        }
        Ok(())
    }

    /// The pointer left the list.
    pub fn list_leave(&mut self) {
        if !self.state.mounted {
            return;
        }
        let had_hover = self.hover.hovered().is_some();
        self.hover
            .on_leave(&mut self.surface, self.highlight.is_active(), &mut self.metrics);
        if had_hover {
            self.emit(EngineEvent::HoverChanged(None));
            self.render_markers();
        }
    }

    /// A list row was clicked: move without waiting for the debounce.
    pub fn list_click(&mut self, id: DocumentId) -> Result<(), EngineError> {
        if !self.state.mounted {
            return Ok(());
        }
        let Some(doc) = self.state.catalog.document(id) else {
            return Err(self.notify(NoticeKind::UnknownDocument, format!("document {id} is not loaded")));
        };
        let at = doc.position();
        self.hover.on_click(&mut self.surface, id, at, &mut self.metrics);
        self.emit(EngineEvent::DocumentClicked(id));
        Ok(())
    }

    pub fn set_filter(&mut self, filter: DocumentFilter) {
        self.state.set_filter(filter);
        let hidden = self
            .state
            .selected
            .is_some_and(|id| !self.state.visible().any(|d| d.document_id() == id));
        if hidden {
            self.close_popup();
        }
        self.render_markers();
    }

    // --- markers and popup ---

    /// Opens a document's detail: cancels any pending hover move, flies to
    /// the detail zoom, replaces the popup and counts one view.
    ///
    /// Returns the counts the popup ends up showing. Counter failures are
    /// logged and leave the local counts as they were.
    pub async fn click_marker(&mut self, id: DocumentId) -> Result<DocumentCounts, EngineError> {
        let Some(doc) = self.state.catalog.document(id) else {
            return Err(self.notify(NoticeKind::UnknownDocument, format!("document {id} is not loaded")));
        };
        let target = detail_view(doc, self.config.detail_zoom);
        let mut shown = doc.counts();
        let popup = popup_for(doc, shown);

        self.hover.cancel_pending(&mut self.metrics);
        self.camera_to(target, self.config.detail_duration_ms);
        self.surface.close_popup();
        self.surface.open_popup(&popup);
        self.state.selected = Some(id);
        self.emit(EngineEvent::DocumentClicked(id));
        self.render_markers();

        match self
            .services
            .counters
            .increment_view(&mut self.state.catalog, id)
            .await
        {
            Ok(counts) => {
                shown = counts;
                self.refresh_popup(id, counts);
            }
            Err(_) => self.metrics.incr("counter.failures"),
        }
        match self
            .services
            .counters
            .fetch_latest_counts(&mut self.state.catalog, id)
            .await
        {
            Ok(counts) => {
                shown = counts;
                self.refresh_popup(id, counts);
            }
            Err(_) => self.metrics.incr("counter.failures"),
        }
        Ok(shown)
    }

    /// Counts one download. `Ok(None)` means the counter service failed; the
    /// failure is already logged.
    pub async fn record_download(
        &mut self,
        id: DocumentId,
    ) -> Result<Option<DocumentCounts>, EngineError> {
        if self.state.catalog.document(id).is_none() {
            return Err(self.notify(NoticeKind::UnknownDocument, format!("document {id} is not loaded")));
        }
        match self
            .services
            .counters
            .increment_download(&mut self.state.catalog, id)
            .await
        {
            Ok(counts) => {
                self.refresh_popup(id, counts);
                Ok(Some(counts))
            }
            Err(_) => {
                self.metrics.incr("counter.failures");
                Ok(None)
            }
        }
    }

    pub fn close_popup(&mut self) {
        self.surface.close_popup();
        if self.state.selected.take().is_some() {
            self.render_markers();
        }
    }

    // --- boundaries ---

    /// Highlights one province. Unknown names change nothing.
    pub fn select_province(&mut self, name: &str, color: Color) -> Option<&HighlightSelection> {
        let store = self.boundaries.as_ref()?;
        self.hover.cancel_pending(&mut self.metrics);
        let selection = self
            .highlight
            .select_province(&mut self.surface, store, name, color);
        if selection.is_some() {
            self.metrics.incr("camera.commands");
        }
        selection
    }

    /// Highlights one of the static region groups by name.
    pub fn select_region(&mut self, name: &str, color: Color) -> Option<&HighlightSelection> {
        let region = Region::from_name(name)?;
        self.select_region_members(region.name(), &region.provinces(), color)
    }

    /// Highlights an arbitrary named group of provinces.
    pub fn select_region_members<P: AsRef<str>>(
        &mut self,
        name: &str,
        provinces: &[P],
        color: Color,
    ) -> Option<&HighlightSelection> {
        let store = self.boundaries.as_ref()?;
        self.hover.cancel_pending(&mut self.metrics);
        let selection = self
            .highlight
            .select_region(&mut self.surface, store, name, provinces, color);
        if selection.is_some() {
            self.metrics.incr("camera.commands");
        }
        selection
    }

    /// Drops the highlight and resets to the country view.
    pub fn close_highlight(&mut self) -> bool {
        let closed = self.highlight.close(&mut self.surface);
        if closed {
            self.metrics.incr("camera.commands");
        }
        closed
    }

    // --- places ---

    /// A click on the map itself. Points outside the country are rejected
    /// before any request is made.
    pub async fn map_click(&mut self, at: LatLng) -> Result<LocationData, EngineError> {
        if !at.is_valid() || !self.config.thailand_bounds.contains(at) {
            return Err(self.notify(
                NoticeKind::OutOfBounds,
                format!("({:.4}, {:.4}) is outside Thailand", at.lat, at.lng),
            ));
        }
        self.locate(at).await
    }

    pub fn search_input(&mut self, text: &str) {
        self.search.input(self.clock.now(), text);
    }

    /// Resolves a search result. On success the box is cleared and the camera
    /// moves to the place; on failure the box is left exactly as it was.
    pub async fn select_search_result(&mut self, index: usize) -> Result<LocationData, EngineError> {
        let Some(entry) = self.search.entry(index).cloned() else {
            return Err(self.notify(
                NoticeKind::UnknownSearchResult,
                format!("no search result at position {index}"),
            ));
        };
        let location = self.locate(entry.position()).await?;
        self.search.clear();
        self.camera_to(
            Viewport::new(entry.position(), self.config.preview_zoom),
            self.config.preview_duration_ms,
        );
        Ok(location)
    }

    async fn locate(&mut self, at: LatLng) -> Result<LocationData, EngineError> {
        let address = match self.services.geocoder.reverse(at).await {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(lat = at.lat, lng = at.lng, error = %e, "reverse geocode failed");
                return Err(self.notify(
                    NoticeKind::GeocodeFailed,
                    format!("could not resolve this location: {e}"),
                ));
            }
        };
        let location = LocationData {
            lat: at.lat,
            lng: at.lng,
            zone: region_of(&address.province).map(|r| r.name().to_string()),
            province: address.province,
            district: address.district,
            subdistrict: address.subdistrict,
        };
        self.emit(EngineEvent::LocationSelected(location.clone()));
        Ok(location)
    }

    // --- accessors ---

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Gives the surface back, e.g. to flush a bridge.
    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn hover(&self) -> &HoverSync {
        &self.hover
    }

    pub fn search(&self) -> &SearchBox {
        &self.search
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn boundaries(&self) -> Option<&BoundaryStore> {
        self.boundaries.as_ref()
    }

    pub fn highlight(&self) -> &HighlightController {
        &self.highlight
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn legend(&self) -> Vec<(&Category, CategoryColor)> {
        legend(self.state.catalog.categories())
    }

    // --- internals ---

    fn report_hover(&mut self, id: Option<DocumentId>) {
        if self.hover.set_hovered(id) {
            self.emit(EngineEvent::HoverChanged(id));
            self.render_markers();
        }
    }

    fn refresh_popup(&mut self, id: DocumentId, counts: DocumentCounts) {
        if self.state.selected != Some(id) {
            return;
        }
        if let Some(doc) = self.state.catalog.document(id) {
            self.surface.open_popup(&popup_for(doc, counts));
        }
    }

    fn camera_to(&mut self, target: Viewport, duration_ms: u64) {
        self.surface.fly_to(target, duration_ms);
        self.metrics.incr("camera.commands");
        tracing::debug!(
            lat = target.center.lat,
            lng = target.center.lng,
            zoom = target.zoom,
            duration_ms,
            "camera move"
        );
    }

    fn render_markers(&mut self) -> RenderStats {
        if !self.state.mounted {
            return RenderStats::default();
        }
        let frame = MarkerFrame {
            zoom: self.state.view.zoom,
            hovered: self.hover.hovered(),
            selected: self.state.selected,
            latest: Some(&self.state.latest),
        };
        self.markers
            .render(&mut self.surface, self.state.visible(), &frame)
    }

    fn emit(&mut self, event: EngineEvent) {
        self.events.emit(self.clock.now(), event);
    }

    /// Queues a user notice and hands back the matching error.
    fn notify(&mut self, kind: NoticeKind, message: String) -> EngineError {
        let error = EngineError::notice(kind, message);
        if let EngineError::UserNotice(notice) = &error {
            self.emit(EngineEvent::Notice(notice.clone()));
        }
        error
    }
}
