pub mod clock;
pub mod event_bus;
pub mod metrics;
pub mod timer;

pub use clock::*;
pub use event_bus::*;
pub use metrics::*;
pub use timer::*;
