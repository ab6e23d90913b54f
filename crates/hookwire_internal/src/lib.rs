//! # Hookwire Internal Library
//!
//! Re-exports the core hookwire crates for convenience.

/// Layer 1: handler and hook metadata, introspection catalog.
pub use hookwire_system;

/// Layer 1: event bus boundary and in-memory bus.
pub use hookwire_bus;

/// Layer 2: handler registry and hook dispatcher.
pub use hookwire_invoker;

/// Layer 2: logging setup.
pub use hookwire_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookwire_bus::{Bus, Callback, HookBus, callback};
    pub use hookwire_core::{TracingFormat, TracingSetup};
    pub use hookwire_invoker::prelude::*;
    pub use hookwire_system::prelude::*;
}
