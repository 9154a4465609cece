use std::collections::{BTreeMap, BTreeSet};

use catalog::{DocumentCounts, GeoDocument};
use foundation::DocumentId;
use foundation::viewport::Viewport;
use scene::{Color, MapEngineAdapter, MarkerVisual, PopupContent};

use crate::layer::{Layer, LayerId};
use crate::symbology::color_of;

/// `clamp(min, max, base + zoom * slope)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    pub base: f64,
    pub slope: f64,
    pub min: f64,
    pub max: f64,
}

impl LinearScale {
    pub const fn new(base: f64, slope: f64, min: f64, max: f64) -> Self {
        Self {
            base,
            slope,
            min,
            max,
        }
    }

    pub fn at(&self, zoom: f64) -> f64 {
        (self.base + zoom * self.slope).clamp(self.min, self.max)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Marker diameter in px.
    pub size: LinearScale,
    /// Pulse ring radius in px, drawn only for latest documents.
    pub pulse: LinearScale,
    /// Diameter multiplier for the hovered or selected marker.
    pub highlight_scale: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size: LinearScale::new(4.0, 1.5, 8.0, 28.0),
            pulse: LinearScale::new(6.0, 2.0, 12.0, 44.0),
            highlight_scale: 1.25,
        }
    }
}

/// Per-render inputs besides the documents themselves.
#[derive(Debug, Clone, Default)]
pub struct MarkerFrame<'a> {
    pub zoom: f64,
    pub hovered: Option<DocumentId>,
    pub selected: Option<DocumentId>,
    pub latest: Option<&'a BTreeSet<DocumentId>>,
}

impl MarkerFrame<'_> {
    fn is_latest(&self, id: DocumentId) -> bool {
        self.latest.is_some_and(|l| l.contains(&id))
    }

    fn is_highlighted(&self, id: DocumentId) -> bool {
        self.hovered == Some(id) || self.selected == Some(id)
    }
}

/// Inputs a marker's visual depends on. The surface is only touched when
/// this changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct MarkerKey {
    zoom_bits: u64,
    size_bits: u64,
    is_latest: bool,
    color: Color,
    highlighted: bool,
}

#[derive(Debug, Clone)]
struct Rendered {
    key: MarkerKey,
    position_bits: (u64, u64),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Documents as zoom-scaled point markers.
#[derive(Debug)]
pub struct MarkerLayer {
    id: LayerId,
    style: MarkerStyle,
    rendered: BTreeMap<DocumentId, Rendered>,
}

impl MarkerLayer {
    pub fn new(id: u64, style: MarkerStyle) -> Self {
        Self {
            id: LayerId(id),
            style,
            rendered: BTreeMap::new(),
        }
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn size_at(&self, zoom: f64) -> f64 {
        self.style.size.at(zoom)
    }

    pub fn pulse_at(&self, zoom: f64) -> f64 {
        self.style.pulse.at(zoom)
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.rendered.contains_key(&id)
    }

    pub fn rendered_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.rendered.keys().copied()
    }

    pub fn visual_for(&self, doc: &GeoDocument, frame: &MarkerFrame<'_>) -> MarkerVisual {
        let id = doc.document_id();
        let is_latest = frame.is_latest(id);
        let highlighted = frame.is_highlighted(id);
        let mut size_px = self.size_at(frame.zoom);
        if highlighted {
            size_px *= self.style.highlight_scale;
        }
        MarkerVisual {
            position: doc.position(),
            color: color_of(doc.category()).primary,
            size_px,
            pulse_px: is_latest.then(|| self.pulse_at(frame.zoom)),
            highlighted,
            title: doc.title.clone(),
        }
    }

    /// Brings the surface in line with `docs`.
    ///
    /// Markers whose inputs did not change are left alone; documents no longer
    /// present are removed.
    pub fn render<'a>(
        &mut self,
        surface: &mut dyn MapEngineAdapter,
        docs: impl IntoIterator<Item = &'a GeoDocument>,
        frame: &MarkerFrame<'_>,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let mut seen = BTreeSet::new();

        for doc in docs {
            let id = doc.document_id();
            if !seen.insert(id) {
                continue;
            }
            let visual = self.visual_for(doc, frame);
            let key = MarkerKey {
                zoom_bits: frame.zoom.to_bits(),
                size_bits: visual.size_px.to_bits(),
                is_latest: visual.pulse_px.is_some(),
                color: visual.color,
                highlighted: visual.highlighted,
            };
            let position_bits = (doc.latitude.to_bits(), doc.longitude.to_bits());

            match self.rendered.get(&id) {
                Some(r) if r.key == key && r.position_bits == position_bits => {
                    stats.unchanged += 1;
                    continue;
                }
                Some(_) => {
                    surface.update_marker(id, &visual);
                    stats.updated += 1;
                }
                None => {
                    surface.add_marker(id, &visual);
                    stats.added += 1;
                }
            }
            self.rendered.insert(id, Rendered { key, position_bits });
        }

        let stale: Vec<DocumentId> = self
            .rendered
            .keys()
            .filter(|id| !seen.contains(id))
            .copied()
            .collect();
        for id in stale {
            surface.remove_marker(id);
            self.rendered.remove(&id);
            stats.removed += 1;
        }
        stats
    }
}

impl Layer for MarkerLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn clear(&mut self, surface: &mut dyn MapEngineAdapter) {
        for id in std::mem::take(&mut self.rendered).into_keys() {
            surface.remove_marker(id);
        }
    }
}

/// Camera target for opening a document's detail.
pub fn detail_view(doc: &GeoDocument, detail_zoom: f64) -> Viewport {
    Viewport::new(doc.position(), detail_zoom)
}

pub fn popup_for(doc: &GeoDocument, counts: DocumentCounts) -> PopupContent {
    PopupContent {
        document: doc.document_id(),
        position: doc.position(),
        title: doc.title.clone(),
        views: counts.views,
        downloads: counts.downloads,
    }
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, MarkerFrame, MarkerLayer, MarkerStyle, RenderStats};
    use crate::layer::Layer;
    use catalog::GeoDocument;
    use foundation::DocumentId;
    use foundation::math::LatLng;
    use foundation::viewport::{Viewport, ViewportSize};
    use runtime::ManualClock;
    use scene::RecordingSurface;
    use std::collections::BTreeSet;

    fn doc(id: i64, category_id: i64) -> GeoDocument {
        GeoDocument {
            id,
            title: format!("doc {id}"),
            latitude: 13.0 + id as f64 * 0.1,
            longitude: 100.0,
            category_id,
            province: String::new(),
            district: String::new(),
            subdistrict: String::new(),
            year: None,
            is_published: true,
            view_count: 0,
            download_count: 0,
            created_at_ms: 0,
        }
    }

    fn surface() -> RecordingSurface<ManualClock> {
        RecordingSurface::new(
            ManualClock::new(),
            ViewportSize::new(1200.0, 800.0),
            Viewport::new(LatLng::new(13.0, 101.0), 6.0),
        )
    }

    #[test]
    fn marker_size_is_monotone_in_zoom() {
        let layer = MarkerLayer::new(1, MarkerStyle::default());
        let mut prev = f64::MIN;
        let mut z = 5.0;
        while z <= 18.0 {
            let s = layer.size_at(z);
            assert!(s >= prev, "size shrank at zoom {z}");
            assert!((8.0..=28.0).contains(&s));
            prev = s;
            z += 0.25;
        }
        assert_eq!(layer.size_at(0.0), 8.0);
        assert_eq!(layer.size_at(30.0), 28.0);
    }

    #[test]
    fn scale_clamps() {
        let s = LinearScale::new(6.0, 2.0, 12.0, 44.0);
        assert_eq!(s.at(1.0), 12.0);
        assert_eq!(s.at(10.0), 26.0);
        assert_eq!(s.at(40.0), 44.0);
    }

    #[test]
    fn only_latest_documents_get_a_pulse_ring() {
        let layer = MarkerLayer::new(1, MarkerStyle::default());
        let latest: BTreeSet<_> = [DocumentId(2)].into_iter().collect();
        let frame = MarkerFrame {
            zoom: 10.0,
            latest: Some(&latest),
            ..MarkerFrame::default()
        };
        assert_eq!(layer.visual_for(&doc(1, 1), &frame).pulse_px, None);
        assert_eq!(layer.visual_for(&doc(2, 1), &frame).pulse_px, Some(26.0));
    }

    #[test]
    fn rerender_touches_only_changed_markers() {
        let mut s = surface();
        let mut layer = MarkerLayer::new(1, MarkerStyle::default());
        let docs = vec![doc(1, 1), doc(2, 2), doc(3, 3)];
        let frame = MarkerFrame {
            zoom: 8.0,
            ..MarkerFrame::default()
        };

        let first = layer.render(&mut s, &docs, &frame);
        assert_eq!(
            first,
            RenderStats {
                added: 3,
                ..RenderStats::default()
            }
        );

        // Same inputs: nothing is sent to the surface.
        let before = s.commands().len();
        let again = layer.render(&mut s, &docs, &frame);
        assert_eq!(again.unchanged, 3);
        assert_eq!(s.commands().len(), before);

        // Hover changes exactly one marker.
        let hovered = MarkerFrame {
            hovered: Some(DocumentId(2)),
            ..frame.clone()
        };
        let stats = layer.render(&mut s, &docs, &hovered);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.unchanged, 2);
        assert!(s.markers()[&DocumentId(2)].highlighted);

        // Zoom changes every marker.
        let zoomed = MarkerFrame {
            zoom: 12.0,
            ..hovered.clone()
        };
        assert_eq!(layer.render(&mut s, &docs, &zoomed).updated, 3);
    }

    #[test]
    fn filtered_out_documents_are_removed() {
        let mut s = surface();
        let mut layer = MarkerLayer::new(1, MarkerStyle::default());
        let frame = MarkerFrame {
            zoom: 8.0,
            ..MarkerFrame::default()
        };
        let docs = vec![doc(1, 1), doc(2, 2)];
        layer.render(&mut s, &docs, &frame);
        let stats = layer.render(&mut s, docs.iter().take(1), &frame);
        assert_eq!(stats.removed, 1);
        assert!(!layer.contains(DocumentId(2)));
        assert_eq!(s.markers().len(), 1);

        layer.clear(&mut s);
        assert!(layer.is_empty());
        assert!(s.markers().is_empty());
    }
}
