//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the client core and the outside world.
//! They are defined here (in `app`) so that both the store layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod action_bus;
pub mod error_reporter;
pub mod transport;

pub use action_bus::ActionPublisher;
pub use error_reporter::{ErrorReporter, TracingReporter};
pub use transport::{Method, Request, Transport};
