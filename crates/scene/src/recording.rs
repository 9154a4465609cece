use std::collections::BTreeMap;

use foundation::DocumentId;
use foundation::math::LatLng;
use foundation::viewport::{Viewport, ViewportSize};
use runtime::Clock;

use crate::camera::CameraTween;
use crate::picking::ShapeGeometry;
use crate::style::ShapeStyle;
use crate::surface::{
    EventKind, ListenerId, MapEngineAdapter, MarkerVisual, PopupContent, ShapeId, SurfaceCommand,
};

/// A shape currently on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveShape {
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
}

/// Headless surface that keeps the live scene and a log of every command.
///
/// Camera animation is simulated with [`CameraTween`] against the injected
/// clock, so `camera()` reflects the in-flight position. Used by tests and the
/// CLI's dry runs.
#[derive(Debug)]
pub struct RecordingSurface<C: Clock> {
    clock: C,
    size: ViewportSize,
    resting: Viewport,
    tween: Option<CameraTween>,
    superseded_tweens: u64,
    next_shape: u64,
    shapes: BTreeMap<ShapeId, LiveShape>,
    markers: BTreeMap<DocumentId, MarkerVisual>,
    popup: Option<PopupContent>,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, EventKind>,
    log: Vec<SurfaceCommand>,
}

impl<C: Clock> RecordingSurface<C> {
    pub fn new(clock: C, size: ViewportSize, initial: Viewport) -> Self {
        Self {
            clock,
            size,
            resting: initial,
            tween: None,
            superseded_tweens: 0,
            next_shape: 1,
            shapes: BTreeMap::new(),
            markers: BTreeMap::new(),
            popup: None,
            next_listener: 1,
            listeners: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: ViewportSize) {
        self.size = size;
    }

    /// Where the camera ends up once the current animation completes.
    pub fn camera_target(&self) -> Viewport {
        self.resting
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some_and(|t| !t.is_finished(self.clock.now()))
    }

    /// Camera animations cut short by a later camera command.
    pub fn superseded_tweens(&self) -> u64 {
        self.superseded_tweens
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.log
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.log)
    }

    pub fn camera_commands(&self) -> Vec<&SurfaceCommand> {
        self.log.iter().filter(|c| c.is_camera()).collect()
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &LiveShape)> {
        self.shapes.iter().map(|(id, s)| (*id, s))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&LiveShape> {
        self.shapes.get(&id)
    }

    /// Shapes that are actually visible (hit-targets excluded).
    pub fn visible_shapes(&self) -> impl Iterator<Item = (ShapeId, &LiveShape)> {
        self.shapes().filter(|(_, s)| !s.style.is_invisible())
    }

    pub fn markers(&self) -> &BTreeMap<DocumentId, MarkerVisual> {
        &self.markers
    }

    pub fn popup(&self) -> Option<&PopupContent> {
        self.popup.as_ref()
    }

    pub fn listeners(&self) -> &BTreeMap<ListenerId, EventKind> {
        &self.listeners
    }

    fn start_camera(&mut self, target: Viewport, duration_ms: u64) {
        let now = self.clock.now();
        let from = self.camera();
        if let Some(t) = self.tween.take()
            && !t.is_finished(now)
        {
            self.superseded_tweens += 1;
        }
        self.resting = target;
        if duration_ms > 0 {
            self.tween = Some(CameraTween::new(from, target, now, duration_ms));
        }
    }

    fn mint_shape(&mut self, geometry: ShapeGeometry, style: ShapeStyle) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.shapes.insert(id, LiveShape { geometry, style });
        id
    }
}

impl<C: Clock> MapEngineAdapter for RecordingSurface<C> {
    fn viewport_size(&self) -> ViewportSize {
        self.size
    }

    fn camera(&self) -> Viewport {
        match self.tween {
            Some(t) => t.sample(self.clock.now()),
            None => self.resting,
        }
    }

    fn set_view(&mut self, viewport: Viewport) {
        self.start_camera(viewport, 0);
        self.log.push(SurfaceCommand::SetView { viewport });
    }

    fn fly_to(&mut self, target: Viewport, duration_ms: u64) {
        self.start_camera(target, duration_ms);
        self.log.push(SurfaceCommand::FlyTo {
            viewport: target,
            duration_ms,
        });
    }

    fn add_marker(&mut self, id: DocumentId, visual: &MarkerVisual) {
        self.markers.insert(id, visual.clone());
        self.log.push(SurfaceCommand::AddMarker {
            id,
            visual: visual.clone(),
        });
    }

    fn update_marker(&mut self, id: DocumentId, visual: &MarkerVisual) {
        self.markers.insert(id, visual.clone());
        self.log.push(SurfaceCommand::UpdateMarker {
            id,
            visual: visual.clone(),
        });
    }

    fn remove_marker(&mut self, id: DocumentId) -> bool {
        let removed = self.markers.remove(&id).is_some();
        if removed {
            self.log.push(SurfaceCommand::RemoveMarker { id });
        }
        removed
    }

    fn draw_polygon(&mut self, rings: &[Vec<LatLng>], style: ShapeStyle) -> ShapeId {
        let shape = self.mint_shape(
            ShapeGeometry::Polygon {
                rings: rings.to_vec(),
            },
            style,
        );
        self.log.push(SurfaceCommand::DrawPolygon {
            shape,
            rings: rings.to_vec(),
            style,
        });
        shape
    }

    fn draw_circle(&mut self, center: LatLng, radius_m: f64, style: ShapeStyle) -> ShapeId {
        let shape = self.mint_shape(ShapeGeometry::Circle { center, radius_m }, style);
        self.log.push(SurfaceCommand::DrawCircle {
            shape,
            center,
            radius_m,
            style,
        });
        shape
    }

    fn set_shape_style(&mut self, shape: ShapeId, style: ShapeStyle) {
        if let Some(live) = self.shapes.get_mut(&shape) {
            live.style = style;
            self.log.push(SurfaceCommand::SetShapeStyle { shape, style });
        }
    }

    fn remove_shape(&mut self, shape: ShapeId) -> bool {
        let removed = self.shapes.remove(&shape).is_some();
        if removed {
            self.log.push(SurfaceCommand::RemoveShape { shape });
        }
        removed
    }

    fn open_popup(&mut self, content: &PopupContent) {
        self.popup = Some(content.clone());
        self.log.push(SurfaceCommand::OpenPopup {
            content: content.clone(),
        });
    }

    fn close_popup(&mut self) {
        if self.popup.take().is_some() {
            self.log.push(SurfaceCommand::ClosePopup);
        }
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(listener, kind);
        self.log.push(SurfaceCommand::Subscribe { listener, kind });
        listener
    }

    fn unsubscribe(&mut self, listener: ListenerId) -> bool {
        let removed = self.listeners.remove(&listener).is_some();
        if removed {
            self.log.push(SurfaceCommand::Unsubscribe { listener });
        }
        removed
    }
}
