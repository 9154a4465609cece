use std::io::{self, Write};

use foundation::DocumentId;
use foundation::math::LatLng;
use foundation::viewport::{Viewport, ViewportSize};

use crate::style::ShapeStyle;
use crate::surface::{
    EventKind, ListenerId, MapEngineAdapter, MarkerVisual, PopupContent, ShapeId, SurfaceCommand,
};

/// Adapter that streams every command as one JSON object per line.
///
/// A thin script on the JavaScript side replays the lines against the real map
/// SDK and reports input back as [`crate::SurfaceEvent`] JSON. The bridge does
/// not animate: it reports the last commanded camera until the host confirms
/// the real one through [`BridgeSurface::sync_camera`].
///
/// The first write error is kept and every later command is dropped; it is
/// returned by [`BridgeSurface::finish`].
#[derive(Debug)]
pub struct BridgeSurface<W: Write> {
    out: W,
    error: Option<io::Error>,
    size: ViewportSize,
    camera: Viewport,
    next_shape: u64,
    next_listener: u64,
    written: u64,
}

impl<W: Write> BridgeSurface<W> {
    pub fn new(out: W, size: ViewportSize, initial: Viewport) -> Self {
        Self {
            out,
            error: None,
            size,
            camera: initial,
            next_shape: 1,
            next_listener: 1,
            written: 0,
        }
    }

    /// Camera reported by the host after its own animation settled.
    pub fn sync_camera(&mut self, viewport: Viewport) {
        self.camera = viewport;
    }

    pub fn resize(&mut self, size: ViewportSize) {
        self.size = size;
    }

    /// Number of command lines written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, cmd: &SurfaceCommand) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.out, cmd)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        match result {
            Ok(()) => self.written += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

impl<W: Write> MapEngineAdapter for BridgeSurface<W> {
    fn viewport_size(&self) -> ViewportSize {
        self.size
    }

    fn camera(&self) -> Viewport {
        self.camera
    }

    fn set_view(&mut self, viewport: Viewport) {
        self.camera = viewport;
        self.emit(&SurfaceCommand::SetView { viewport });
    }

    fn fly_to(&mut self, target: Viewport, duration_ms: u64) {
        self.camera = target;
        self.emit(&SurfaceCommand::FlyTo {
            viewport: target,
            duration_ms,
        });
    }

    fn add_marker(&mut self, id: DocumentId, visual: &MarkerVisual) {
        self.emit(&SurfaceCommand::AddMarker {
            id,
            visual: visual.clone(),
        });
    }

    fn update_marker(&mut self, id: DocumentId, visual: &MarkerVisual) {
        self.emit(&SurfaceCommand::UpdateMarker {
            id,
            visual: visual.clone(),
        });
    }

    fn remove_marker(&mut self, id: DocumentId) -> bool {
        self.emit(&SurfaceCommand::RemoveMarker { id });
        true
    }

    fn draw_polygon(&mut self, rings: &[Vec<LatLng>], style: ShapeStyle) -> ShapeId {
        let shape = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.emit(&SurfaceCommand::DrawPolygon {
            shape,
            rings: rings.to_vec(),
            style,
        });
        shape
    }

    fn draw_circle(&mut self, center: LatLng, radius_m: f64, style: ShapeStyle) -> ShapeId {
        let shape = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.emit(&SurfaceCommand::DrawCircle {
            shape,
            center,
            radius_m,
            style,
        });
        shape
    }

    fn set_shape_style(&mut self, shape: ShapeId, style: ShapeStyle) {
        self.emit(&SurfaceCommand::SetShapeStyle { shape, style });
    }

    fn remove_shape(&mut self, shape: ShapeId) -> bool {
        self.emit(&SurfaceCommand::RemoveShape { shape });
        true
    }

    fn open_popup(&mut self, content: &PopupContent) {
        self.emit(&SurfaceCommand::OpenPopup {
            content: content.clone(),
        });
    }

    fn close_popup(&mut self) {
        self.emit(&SurfaceCommand::ClosePopup);
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.emit(&SurfaceCommand::Subscribe { listener, kind });
        listener
    }

    fn unsubscribe(&mut self, listener: ListenerId) -> bool {
        self.emit(&SurfaceCommand::Unsubscribe { listener });
        true
    }
}
