//! Declarative metadata for hookwire handlers (Layer 1).
//!
//! `hookwire_system` holds everything a handler declares about itself,
//! independently of any event bus:
//!
//! - [`context`] - Execution contexts and context masks
//! - [`constants`] - Environment-level named values
//! - [`priority`] - Priority declarations and their resolution
//! - [`spec`] - Handler and hook metadata
//! - [`reflection`] - Class and function declarations, and introspection
//!   over them
//!
//! # Architecture
//!
//! - **Layer 1** (`hookwire_system`, `hookwire_bus`): metadata and the bus
//!   boundary
//! - **Layer 2** (`hookwire_invoker`): registration and dispatch
//!
//! # Example
//!
//! ```
//! use hookwire_system::prelude::*;
//! use serde_json::Value;
//!
//! #[derive(Default)]
//! struct Titles;
//!
//! let catalog = Reflection::new();
//! catalog
//!     .define(
//!         ClassDef::builder::<Titles>("app::Titles")
//!             .with_handler(HandlerSpec::builder().with_tag("init"))
//!             .with_default_constructor()
//!             .with_method(
//!                 Method::new("shout", |_: &Titles, call: Call<'_>| call.value())
//!                     .with_params(1)
//!                     .with_hook(HookSpec::filter("the_title")),
//!             )
//!             .build()?,
//!     )?;
//!
//! let class = catalog.resolve_target(Target::Class("app::Titles"))?;
//! assert_eq!(class.name(), "app::Titles");
//! # Ok::<(), ConfigError>(())
//! ```

pub mod constants;
pub mod context;
mod error;
pub mod priority;
pub mod reflection;
pub mod spec;

pub use error::ConfigError;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::ConfigError;
    pub use crate::constants::Constants;
    pub use crate::context::{Context, ContextMask, ContextProvider, ContextSignals};
    pub use crate::priority::{DEFAULT_PRIORITY, Priority, PriorityScope};
    pub use crate::reflection::{
        Call, ClassDef, Decorator, DecoratorKind, FunctionDef, HandlerObject, HookDescriptor,
        Method, MethodDef, Reflectable, Reflection, Target, Visibility, extract_decorators,
        extract_single_decorator, hookable_methods, is_hookable,
    };
    pub use crate::spec::{
        HandlerSpec, HookKind, HookSpec, InvokeMode, Requirement, Strategy,
    };
}
