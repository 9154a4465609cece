use std::collections::BTreeMap;

use catalog::PROVINCES;
use formats::{BoundaryCollection, PolygonRings};
use foundation::bounds::GeoBounds;
use foundation::math::{LatLng, circle_bounds};
use scene::{Color, MapEngineAdapter, ShapeGeometry, ShapeId, ShapeStyle};

use crate::layer::{Layer, LayerId};

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygons(Vec<PolygonRings>),
    /// Degraded stand-in centered on the provincial seat.
    Circle { center: LatLng, radius_m: f64 },
}

/// A named administrative area.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub geometry: BoundaryGeometry,
}

impl BoundaryFeature {
    pub fn bounds(&self) -> Option<GeoBounds> {
        match &self.geometry {
            BoundaryGeometry::Polygons(polys) => {
                GeoBounds::from_points(polys.iter().flatten().flatten())
            }
            BoundaryGeometry::Circle { center, radius_m } => {
                Some(circle_bounds(*center, *radius_m))
            }
        }
    }

    pub fn shapes(&self) -> Vec<ShapeGeometry> {
        match &self.geometry {
            BoundaryGeometry::Polygons(polys) => polys
                .iter()
                .map(|rings| ShapeGeometry::Polygon {
                    rings: rings.clone(),
                })
                .collect(),
            BoundaryGeometry::Circle { center, radius_m } => vec![ShapeGeometry::Circle {
                center: *center,
                radius_m: *radius_m,
            }],
        }
    }

    pub fn contains(&self, p: LatLng) -> bool {
        self.shapes().iter().any(|s| s.contains(p))
    }

    /// Draws every part of the feature with `style`.
    pub fn draw(&self, surface: &mut dyn MapEngineAdapter, style: ShapeStyle) -> Vec<ShapeId> {
        match &self.geometry {
            BoundaryGeometry::Polygons(polys) => polys
                .iter()
                .map(|rings| surface.draw_polygon(rings, style))
                .collect(),
            BoundaryGeometry::Circle { center, radius_m } => {
                vec![surface.draw_circle(*center, *radius_m, style)]
            }
        }
    }
}

/// Province boundaries for the whole country, loaded once.
///
/// When the dataset is unavailable the store is built from fixed-radius
/// circles around each provincial seat and reports itself degraded. Either
/// way every feature is kept on the surface as an invisible hit-target; the
/// one under the pointer switches to the hover style.
#[derive(Debug)]
pub struct BoundaryStore {
    id: LayerId,
    features: BTreeMap<String, BoundaryFeature>,
    degraded: Option<String>,
    hover_color: Color,
    hit_targets: BTreeMap<String, Vec<ShapeId>>,
    hovered: Option<String>,
}

impl BoundaryStore {
    fn with_features(
        id: u64,
        features: BTreeMap<String, BoundaryFeature>,
        degraded: Option<String>,
    ) -> Self {
        Self {
            id: LayerId(id),
            features,
            degraded,
            hover_color: Color::rgb(0x25, 0x63, 0xeb),
            hit_targets: BTreeMap::new(),
            hovered: None,
        }
    }

    pub fn from_collection(id: u64, collection: &BoundaryCollection) -> Self {
        let features = collection
            .records
            .iter()
            .map(|r| {
                (
                    r.name.clone(),
                    BoundaryFeature {
                        name: r.name.clone(),
                        geometry: BoundaryGeometry::Polygons(r.polygons.clone()),
                    },
                )
            })
            .collect();
        Self::with_features(id, features, None)
    }

    /// Circles of `radius_m` around every provincial seat.
    pub fn fallback(id: u64, radius_m: f64, reason: impl Into<String>) -> Self {
        let features = PROVINCES
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    BoundaryFeature {
                        name: p.name.to_string(),
                        geometry: BoundaryGeometry::Circle {
                            center: p.seat,
                            radius_m,
                        },
                    },
                )
            })
            .collect();
        Self::with_features(id, features, Some(reason.into()))
    }

    /// Builds the store from a dataset load, falling back on failure or on an
    /// empty dataset. Never fails.
    pub fn load<E: std::fmt::Display>(
        id: u64,
        result: Result<BoundaryCollection, E>,
        fallback_radius_m: f64,
    ) -> Self {
        match result {
            Ok(collection) if !collection.records.is_empty() => {
                tracing::info!(
                    features = collection.records.len(),
                    skipped = collection.skipped,
                    "boundary dataset loaded"
                );
                Self::from_collection(id, &collection)
            }
            Ok(_) => {
                tracing::warn!("boundary dataset has no features; using circle fallback");
                Self::fallback(id, fallback_radius_m, "boundary dataset has no features")
            }
            Err(e) => {
                tracing::warn!(error = %e, radius_m = fallback_radius_m, "boundary dataset unavailable; using circle fallback");
                Self::fallback(id, fallback_radius_m, e.to_string())
            }
        }
    }

    pub fn with_hover_color(mut self, color: Color) -> Self {
        self.hover_color = color;
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    pub fn features_by_province_name(&self) -> &BTreeMap<String, BoundaryFeature> {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&BoundaryFeature> {
        self.features.get(name.trim())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Draws the invisible hit-target of every feature. Idempotent.
    pub fn render_hit_targets(&mut self, surface: &mut dyn MapEngineAdapter) {
        if !self.hit_targets.is_empty() {
            return;
        }
        for (name, feature) in &self.features {
            let ids = feature.draw(surface, ShapeStyle::hit_target());
            self.hit_targets.insert(name.clone(), ids);
        }
    }

    /// Feature under `p`. Overlaps resolve to the first name in sort order.
    pub fn feature_at(&self, p: LatLng) -> Option<&BoundaryFeature> {
        if !p.is_finite() {
            return None;
        }
        self.features.values().find(|f| f.contains(p))
    }

    /// Moves the hover highlight to the feature under `p`, if any.
    ///
    /// Purely cosmetic. Returns the hovered feature name.
    pub fn hover_at(&mut self, surface: &mut dyn MapEngineAdapter, p: LatLng) -> Option<&str> {
        let next = self.feature_at(p).map(|f| f.name.clone());
        if next != self.hovered {
            if let Some(prev) = self.hovered.take() {
                self.restyle(surface, &prev, ShapeStyle::hit_target());
            }
            if let Some(name) = &next {
                self.restyle(surface, name, ShapeStyle::hover(self.hover_color));
            }
            self.hovered = next;
        }
        self.hovered.as_deref()
    }

    pub fn clear_hover(&mut self, surface: &mut dyn MapEngineAdapter) {
        if let Some(prev) = self.hovered.take() {
            self.restyle(surface, &prev, ShapeStyle::hit_target());
        }
    }

    fn restyle(&self, surface: &mut dyn MapEngineAdapter, name: &str, style: ShapeStyle) {
        for id in self.hit_targets.get(name).into_iter().flatten() {
            surface.set_shape_style(*id, style);
        }
    }
}

impl Layer for BoundaryStore {
    fn id(&self) -> LayerId {
        self.id
    }

    fn clear(&mut self, surface: &mut dyn MapEngineAdapter) {
        self.hovered = None;
        for id in std::mem::take(&mut self.hit_targets).into_values().flatten() {
            surface.remove_shape(id);
        }
    }
}
