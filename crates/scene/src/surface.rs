use foundation::DocumentId;
use foundation::bounds::GeoBounds;
use foundation::math::{FitOptions, LatLng, fit_bounds};
use foundation::viewport::{Viewport, ViewportSize};
use serde::{Deserialize, Serialize};

use crate::style::{Color, ShapeStyle};

/// Handle of a polygon or circle drawn on a surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

/// Handle of an event subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MarkerClick,
    MarkerHover,
    MarkerOut,
    PointerMove,
    PointerOut,
    MapClick,
    ViewChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::MarkerClick,
        EventKind::MarkerHover,
        EventKind::MarkerOut,
        EventKind::PointerMove,
        EventKind::PointerOut,
        EventKind::MapClick,
        EventKind::ViewChanged,
    ];
}

/// Input reported by the backing map SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    MarkerClick { id: DocumentId },
    MarkerHover { id: DocumentId },
    MarkerOut { id: DocumentId },
    PointerMove { at: LatLng },
    PointerOut,
    MapClick { at: LatLng },
    ViewChanged { viewport: Viewport },
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SurfaceEvent::MarkerClick { .. } => EventKind::MarkerClick,
            SurfaceEvent::MarkerHover { .. } => EventKind::MarkerHover,
            SurfaceEvent::MarkerOut { .. } => EventKind::MarkerOut,
            SurfaceEvent::PointerMove { .. } => EventKind::PointerMove,
            SurfaceEvent::PointerOut => EventKind::PointerOut,
            SurfaceEvent::MapClick { .. } => EventKind::MapClick,
            SurfaceEvent::ViewChanged { .. } => EventKind::ViewChanged,
        }
    }
}

/// Everything a surface needs to draw one document marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerVisual {
    pub position: LatLng,
    pub color: Color,
    pub size_px: f64,
    /// Radius of the "latest" pulse ring; `None` draws no ring.
    pub pulse_px: Option<f64>,
    pub highlighted: bool,
    pub title: String,
}

/// Contents of the singleton detail popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub document: DocumentId,
    pub position: LatLng,
    pub title: String,
    pub views: u64,
    pub downloads: u64,
}

/// One surface mutation, in the form adapters replay it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SurfaceCommand {
    SetView {
        viewport: Viewport,
    },
    FlyTo {
        viewport: Viewport,
        duration_ms: u64,
    },
    AddMarker {
        id: DocumentId,
        visual: MarkerVisual,
    },
    UpdateMarker {
        id: DocumentId,
        visual: MarkerVisual,
    },
    RemoveMarker {
        id: DocumentId,
    },
    DrawPolygon {
        shape: ShapeId,
        rings: Vec<Vec<LatLng>>,
        style: ShapeStyle,
    },
    DrawCircle {
        shape: ShapeId,
        center: LatLng,
        radius_m: f64,
        style: ShapeStyle,
    },
    SetShapeStyle {
        shape: ShapeId,
        style: ShapeStyle,
    },
    RemoveShape {
        shape: ShapeId,
    },
    OpenPopup {
        content: PopupContent,
    },
    ClosePopup,
    Subscribe {
        listener: ListenerId,
        kind: EventKind,
    },
    Unsubscribe {
        listener: ListenerId,
    },
}

impl SurfaceCommand {
    /// Camera commands start a tween that supersedes any in-flight one.
    pub fn is_camera(&self) -> bool {
        matches!(
            self,
            SurfaceCommand::SetView { .. } | SurfaceCommand::FlyTo { .. }
        )
    }
}

/// The map surface contract every controller is written against.
///
/// Adapters own camera animation: `fly_to` returns immediately and a later
/// camera command always supersedes an in-flight one.
pub trait MapEngineAdapter {
    fn viewport_size(&self) -> ViewportSize;

    /// Camera as currently displayed, mid-animation included.
    fn camera(&self) -> Viewport;

    fn set_view(&mut self, viewport: Viewport);

    fn fly_to(&mut self, target: Viewport, duration_ms: u64);

    /// Flies to the viewport that fits `bounds` and returns that viewport.
    fn fit_bounds(&mut self, bounds: GeoBounds, opts: FitOptions, duration_ms: u64) -> Viewport {
        let target = fit_bounds(bounds, self.viewport_size(), opts);
        self.fly_to(target, duration_ms);
        target
    }

    fn add_marker(&mut self, id: DocumentId, visual: &MarkerVisual);

    fn update_marker(&mut self, id: DocumentId, visual: &MarkerVisual);

    fn remove_marker(&mut self, id: DocumentId) -> bool;

    /// Draws one polygon: the outer ring first, then holes.
    fn draw_polygon(&mut self, rings: &[Vec<LatLng>], style: ShapeStyle) -> ShapeId;

    fn draw_circle(&mut self, center: LatLng, radius_m: f64, style: ShapeStyle) -> ShapeId;

    fn set_shape_style(&mut self, shape: ShapeId, style: ShapeStyle);

    fn remove_shape(&mut self, shape: ShapeId) -> bool;

    /// Opens the detail popup, replacing any open one.
    fn open_popup(&mut self, content: &PopupContent);

    fn close_popup(&mut self);

    fn subscribe(&mut self, kind: EventKind) -> ListenerId;

    fn unsubscribe(&mut self, listener: ListenerId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::{EventKind, SurfaceCommand, SurfaceEvent};
    use foundation::DocumentId;
    use foundation::math::LatLng;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_json_uses_type_tag() {
        let ev: SurfaceEvent =
            serde_json::from_str(r#"{"type":"map_click","at":{"lat":13.7,"lng":100.5}}"#)
                .expect("event");
        assert_eq!(
            ev,
            SurfaceEvent::MapClick {
                at: LatLng::new(13.7, 100.5)
            }
        );
        assert_eq!(ev.kind(), EventKind::MapClick);

        let click: SurfaceEvent =
            serde_json::from_str(r#"{"type":"marker_click","id":42}"#).expect("event");
        assert_eq!(click, SurfaceEvent::MarkerClick { id: DocumentId(42) });
    }

    #[test]
    fn command_json_uses_cmd_tag() {
        let json = serde_json::to_value(SurfaceCommand::ClosePopup).expect("json");
        assert_eq!(json, serde_json::json!({ "cmd": "close_popup" }));
        assert!(!SurfaceCommand::ClosePopup.is_camera());
    }

    #[test]
    fn every_kind_is_listed_once() {
        let mut kinds = EventKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), EventKind::ALL.len());
    }
}
