//! Infrastructure shared by hookwire applications.
//!
//! - [`TracingSetup`] - installs the `tracing` subscriber that renders the
//!   engine's structured logs
//!
//! # Example
//!
//! ```
//! use hookwire_core::TracingSetup;
//! use tracing::Level;
//!
//! TracingSetup::new().with_level(Level::DEBUG).init();
//! ```

mod tracing_setup;

pub use tracing_setup::{TracingConfig, TracingFormat, TracingSetup};
