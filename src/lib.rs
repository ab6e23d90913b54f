//! Declarative handler registration and dispatch for priority-ordered event
//! buses.
//!
//! Handler classes declare when they should be created and which of their
//! methods listen on which tags. The [`Invoker`](hookwire_invoker::Invoker)
//! reads those declarations, creates instances according to their
//! initialization strategy, and wires the methods to a [`Bus`](hookwire_bus::Bus).
//!
//! ```
//! use hookwire::prelude::*;
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Titles;
//!
//! let bus = Arc::new(HookBus::new());
//! let invoker = Invoker::builder(bus.clone())
//!     .with_config(InvokerConfig::new().with_diagnostics(false))
//!     .with_class(
//!         ClassDef::builder::<Titles>("site::Titles")
//!             .with_handler(
//!                 HandlerSpec::builder()
//!                     .with_strategy(Strategy::Immediately)
//!                     .with_tag("init"),
//!             )
//!             .with_default_constructor()
//!             .with_method(
//!                 Method::new("shout", |_: &Titles, call: Call<'_>| {
//!                     Value::from(call.value().as_str().unwrap_or_default().to_uppercase())
//!                 })
//!                 .with_params(1)
//!                 .with_hook(HookSpec::filter("the_title")),
//!             )
//!             .build()?,
//!     )
//!     .build()?;
//!
//! invoker.register_handler("site::Titles")?;
//! assert_eq!(bus.apply_filters("the_title", json!("hi"), &[]), json!("HI"));
//! # Ok::<(), ConfigError>(())
//! ```

pub use hookwire_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookwire_internal::prelude::*;
}
