use foundation::bounds::GeoBounds;
use foundation::math::FitOptions;
use foundation::viewport::{Padding, Viewport};
use scene::{Color, MapEngineAdapter, ShapeId, ShapeStyle};

use crate::boundaries::BoundaryStore;
use crate::layer::{Layer, LayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightKind {
    Province,
    Region { name: String },
}

/// The drawn selection. Never edited in place: a new selection tears this one
/// down completely before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSelection {
    pub kind: HighlightKind,
    /// Resolved member names, in request order. Never empty.
    pub members: Vec<String>,
    pub color: Color,
    pub shapes: Vec<ShapeId>,
    pub bounds: GeoBounds,
    /// Camera target the selection was fitted to.
    pub view: Viewport,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighlightOptions {
    /// Fit padding, including the side occluded by the companion panel.
    pub padding: Padding,
    pub min_zoom: f64,
    pub province_max_zoom: f64,
    /// Cap for region fits; lower than `province_max_zoom`.
    pub region_max_zoom: f64,
    pub fit_duration_ms: u64,
    /// Fixed country-level view restored by `close`.
    pub country_view: Viewport,
    pub reset_duration_ms: u64,
}

/// Two states: idle (`selection() == None`) and selected.
#[derive(Debug)]
pub struct HighlightController {
    id: LayerId,
    opts: HighlightOptions,
    selection: Option<HighlightSelection>,
}

impl HighlightController {
    pub fn new(id: u64, opts: HighlightOptions) -> Self {
        Self {
            id: LayerId(id),
            opts,
            selection: None,
        }
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.opts
    }

    pub fn selection(&self) -> Option<&HighlightSelection> {
        self.selection.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.selection.is_some()
    }

    /// Selects one province. Unknown names leave the current state untouched.
    pub fn select_province(
        &mut self,
        surface: &mut dyn MapEngineAdapter,
        store: &BoundaryStore,
        name: &str,
        color: Color,
    ) -> Option<&HighlightSelection> {
        let max_zoom = self.opts.province_max_zoom;
        self.select(
            surface,
            store,
            HighlightKind::Province,
            &[name],
            color,
            max_zoom,
        )
    }

    /// Selects every resolvable province of a region. Unknown names are
    /// dropped; if none resolve the current state is left untouched.
    pub fn select_region<S: AsRef<str>>(
        &mut self,
        surface: &mut dyn MapEngineAdapter,
        store: &BoundaryStore,
        name: &str,
        provinces: &[S],
        color: Color,
    ) -> Option<&HighlightSelection> {
        let max_zoom = self.opts.region_max_zoom.min(self.opts.province_max_zoom);
        self.select(
            surface,
            store,
            HighlightKind::Region {
                name: name.to_string(),
            },
            provinces,
            color,
            max_zoom,
        )
    }

    /// Removes every drawn shape and resets the camera to the country view.
    /// Returns `false` when already idle.
    pub fn close(&mut self, surface: &mut dyn MapEngineAdapter) -> bool {
        if !self.teardown(surface) {
            return false;
        }
        surface.fly_to(self.opts.country_view, self.opts.reset_duration_ms);
        true
    }

    fn select<S: AsRef<str>>(
        &mut self,
        surface: &mut dyn MapEngineAdapter,
        store: &BoundaryStore,
        kind: HighlightKind,
        names: &[S],
        color: Color,
        max_zoom: f64,
    ) -> Option<&HighlightSelection> {
        let mut members: Vec<String> = Vec::new();
        let mut features = Vec::new();
        for name in names {
            let name: &str = name.as_ref();
            let Some(feature) = store.feature(name) else {
                tracing::debug!(province = name, "highlight: unknown boundary name dropped");
                continue;
            };
            if members.contains(&feature.name) {
                continue;
            }
            members.push(feature.name.clone());
            features.push(feature);
        }

        let bounds = features
            .iter()
            .filter_map(|f| f.bounds())
            .reduce(GeoBounds::union)?;

        self.teardown(surface);

        let style = ShapeStyle::selected(color);
        let mut shapes: Vec<ShapeId> = Vec::new();
        for feature in &features {
            shapes.extend(feature.draw(surface, style));
        }

        let opts = FitOptions {
            padding: self.opts.padding,
            min_zoom: self.opts.min_zoom,
            max_zoom,
        };
        let view = surface.fit_bounds(bounds, opts, self.opts.fit_duration_ms);

        tracing::debug!(
            members = members.len(),
            shapes = shapes.len(),
            zoom = view.zoom,
            "highlight selected"
        );
        self.selection = Some(HighlightSelection {
            kind,
            members,
            color,
            shapes,
            bounds,
            view,
        });
        self.selection.as_ref()
    }

    /// Removes the current selection's shapes as one group.
    fn teardown(&mut self, surface: &mut dyn MapEngineAdapter) -> bool {
        let Some(selection) = self.selection.take() else {
            return false;
        };
        for shape in selection.shapes {
            surface.remove_shape(shape);
        }
        true
    }
}

impl Layer for HighlightController {
    fn id(&self) -> LayerId {
        self.id
    }

    fn clear(&mut self, surface: &mut dyn MapEngineAdapter) {
        self.teardown(surface);
    }
}
