use std::collections::{BTreeMap, BTreeSet};

use foundation::ids::{CategoryId, DocumentId};
use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of one geolocated document from the document store.
///
/// Only the counters are ever mutated on the engine side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoDocument {
    pub id: i64,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: i64,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub subdistrict: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub download_count: u64,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default, alias = "createdAt")]
    pub created_at_ms: u64,
}

impl GeoDocument {
    pub fn document_id(&self) -> DocumentId {
        DocumentId(self.id)
    }

    pub fn category(&self) -> CategoryId {
        CategoryId(self.category_id)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn counts(&self) -> DocumentCounts {
        DocumentCounts {
            views: self.view_count,
            downloads: self.download_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn category_id(&self) -> CategoryId {
        CategoryId(self.id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentCounts {
    pub views: u64,
    pub downloads: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CounterKind {
    View,
    Download,
}

impl CounterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::View => "view",
            CounterKind::Download => "download",
        }
    }
}

/// Which documents the list and the marker layer show.
///
/// An empty category set means "every category".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentFilter {
    pub categories: BTreeSet<CategoryId>,
    pub year: Option<i32>,
    pub query: Option<String>,
}

impl DocumentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: impl IntoIterator<Item = CategoryId>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn allows_category(&self, id: CategoryId) -> bool {
        self.categories.is_empty() || self.categories.contains(&id)
    }

    pub fn matches(&self, doc: &GeoDocument) -> bool {
        if !self.allows_category(doc.category()) {
            return false;
        }
        if let Some(year) = self.year
            && doc.year != Some(year)
        {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                [&doc.title, &doc.province, &doc.district, &doc.subdistrict]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&q))
            }
        }
    }
}

/// The engine's view of the document store at mount time.
///
/// Keyed by id in `BTreeMap`s so iteration order is stable.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CatalogSnapshot {
    documents: BTreeMap<DocumentId, GeoDocument>,
    categories: BTreeMap<CategoryId, Category>,
}

impl CatalogSnapshot {
    pub fn new(
        documents: impl IntoIterator<Item = GeoDocument>,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|d| (d.document_id(), d))
                .collect(),
            categories: categories
                .into_iter()
                .map(|c| (c.category_id(), c))
                .collect(),
        }
    }

    pub fn document(&self, id: DocumentId) -> Option<&GeoDocument> {
        self.documents.get(&id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &GeoDocument> {
        self.documents.values()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents that can be placed on the map under `filter`: published,
    /// with a valid coordinate, and matching the filter. Ascending id order.
    pub fn visible<'a>(
        &'a self,
        filter: &'a DocumentFilter,
    ) -> impl Iterator<Item = &'a GeoDocument> + 'a {
        self.documents
            .values()
            .filter(|d| d.is_published && d.position().is_valid())
            .filter(move |d| filter.matches(d))
    }

    pub fn counts(&self, id: DocumentId) -> Option<DocumentCounts> {
        self.documents.get(&id).map(GeoDocument::counts)
    }

    /// Adds one to a local counter. Returns the new counts.
    pub fn bump(&mut self, id: DocumentId, kind: CounterKind) -> Option<DocumentCounts> {
        let doc = self.documents.get_mut(&id)?;
        match kind {
            CounterKind::View => doc.view_count = doc.view_count.saturating_add(1),
            CounterKind::Download => doc.download_count = doc.download_count.saturating_add(1),
        }
        Some(doc.counts())
    }

    /// Overwrites local counters with values from the source of truth.
    pub fn set_counts(&mut self, id: DocumentId, counts: DocumentCounts) -> bool {
        let Some(doc) = self.documents.get_mut(&id) else {
            return false;
        };
        doc.view_count = counts.views;
        doc.download_count = counts.downloads;
        true
    }
}

/// The `count` most recently created documents, newest first; ties break on
/// the higher id.
pub fn latest_ids<'a>(
    docs: impl IntoIterator<Item = &'a GeoDocument>,
    count: usize,
) -> BTreeSet<DocumentId> {
    let mut all: Vec<&GeoDocument> = docs.into_iter().collect();
    all.sort_by(|a, b| {
        b.created_at_ms
            .cmp(&a.created_at_ms)
            .then_with(|| b.id.cmp(&a.id))
    });
    all.into_iter().take(count).map(|d| d.document_id()).collect()
}
