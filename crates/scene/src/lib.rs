//! Engine-agnostic map surface.
//!
//! Controllers talk to a [`MapEngineAdapter`]; each backing map SDK gets one
//! adapter. Two ship here: a headless [`RecordingSurface`] and a
//! [`BridgeSurface`] that streams commands as JSON lines.

pub mod bridge;
pub mod camera;
pub mod picking;
pub mod recording;
pub mod style;
pub mod surface;

pub use bridge::*;
pub use camera::*;
pub use picking::*;
pub use recording::*;
pub use style::*;
pub use surface::*;
