//! Clients for the engine's external collaborators.
//!
//! Every collaborator sits behind a dyn-compatible trait returning
//! [`BoxFuture`], with one reqwest-backed implementation each. Callers decide
//! how a failure is surfaced; nothing here retries.

pub mod boundary_source;
pub mod counters;
pub mod endpoints;
pub mod error;
pub mod geocode;

pub use boundary_source::*;
pub use counters::*;
pub use endpoints::*;
pub use error::*;
pub use geocode::*;

#[cfg(test)]
pub(crate) mod test_http;
