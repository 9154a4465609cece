//! Map view engine for the geodocument portal.
//!
//! [`MapView`] composes the marker layer, the boundary store and highlight
//! controller, the hover-sync controller and the gazetteer search box around
//! one [`scene::MapEngineAdapter`].

pub mod config;
pub mod error;
pub mod events;
pub mod hover_sync;
pub mod orchestrator;
pub mod search;
pub mod state;

pub use config::*;
pub use error::*;
pub use events::*;
pub use hover_sync::*;
pub use orchestrator::*;
pub use search::*;
pub use state::*;
