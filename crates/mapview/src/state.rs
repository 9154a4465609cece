use std::collections::BTreeSet;

use catalog::{CatalogSnapshot, DocumentFilter, GeoDocument, latest_ids};
use foundation::DocumentId;
use foundation::viewport::Viewport;
use scene::ListenerId;

/// Mutable session state, owned by the orchestrator and lent to controllers.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub catalog: CatalogSnapshot,
    pub filter: DocumentFilter,
    /// Marker currently open in the detail popup.
    pub selected: Option<DocumentId>,
    /// Last viewport the surface reported.
    pub view: Viewport,
    /// Newest visible documents, recomputed whenever the filter changes.
    pub latest: BTreeSet<DocumentId>,
    pub listeners: Vec<ListenerId>,
    pub mounted: bool,
    latest_count: usize,
}

impl EngineState {
    pub fn new(catalog: CatalogSnapshot, view: Viewport, latest_count: usize) -> Self {
        let mut state = Self {
            catalog,
            filter: DocumentFilter::all(),
            selected: None,
            view,
            latest: BTreeSet::new(),
            listeners: Vec::new(),
            mounted: false,
            latest_count,
        };
        state.refresh_latest();
        state
    }

    pub fn visible(&self) -> impl Iterator<Item = &GeoDocument> {
        self.catalog.visible(&self.filter)
    }

    pub fn set_filter(&mut self, filter: DocumentFilter) {
        self.filter = filter;
        self.refresh_latest();
    }

    pub fn is_latest(&self, id: DocumentId) -> bool {
        self.latest.contains(&id)
    }

    fn refresh_latest(&mut self) {
        self.latest = latest_ids(self.catalog.visible(&self.filter), self.latest_count);
    }
}
