//! The host event bus boundary (Layer 1).
//!
//! The invoker never fires tags itself. It only registers callbacks with a
//! [`Bus`] and asks whether a tag is currently firing. Everything else
//! (ordering, argument passing, value threading for filters) belongs to the
//! bus.
//!
//! [`HookBus`] is an in-memory, synchronous implementation suitable for
//! embedding and tests.
//!
//! # Example
//!
//! ```
//! use hookwire_bus::{Bus, HookBus, callback};
//! use serde_json::Value;
//!
//! let bus = HookBus::new();
//! bus.register(
//!     "the_title",
//!     callback(|args| Value::from(format!("{}!", args[0].as_str().unwrap_or_default()))),
//!     10,
//!     1,
//! );
//!
//! let title = bus.apply_filters("the_title", Value::from("Hello"), &[]);
//! assert_eq!(title, Value::from("Hello!"));
//! ```

mod memory;

pub use memory::{HookBus, Registration};

use serde_json::Value;
use std::sync::Arc;

/// A callback registered with a bus.
///
/// Receives at most `accepted_args` arguments. For filters the first
/// argument is the value being filtered and the return value replaces it;
/// for actions the return value is ignored.
pub type Callback = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Wraps a closure as a [`Callback`].
pub fn callback(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Callback {
    Arc::new(f)
}

/// A priority-ordered event bus.
///
/// Lower priorities run first. Implementations must allow `register` to be
/// called from inside a running callback.
pub trait Bus: Send + Sync {
    /// Registers `callback` to run when `tag` fires.
    fn register(&self, tag: &str, callback: Callback, priority: i32, accepted_args: usize);

    /// Returns true while `tag` is being fired.
    fn is_firing(&self, tag: &str) -> bool;

    /// Runs the filters on `tag` over `value`, passing `args` after it.
    fn apply_filters(&self, tag: &str, value: Value, args: &[Value]) -> Value;
}

impl<B: Bus + ?Sized> Bus for Arc<B> {
    fn register(&self, tag: &str, callback: Callback, priority: i32, accepted_args: usize) {
        (**self).register(tag, callback, priority, accepted_args);
    }

    fn is_firing(&self, tag: &str) -> bool {
        (**self).is_firing(tag)
    }

    fn apply_filters(&self, tag: &str, value: Value, args: &[Value]) -> Value {
        (**self).apply_filters(tag, value, args)
    }
}
