//! Priority declarations and their resolution.
//!
//! A declared [`Priority`] is resolved to an integer exactly once per spec
//! (see [`HookMeta::priority`](crate::spec::HookMeta::priority)). The supported
//! forms are:
//!
//! | Form | Resolution |
//! |------|------------|
//! | `Fixed(n)` | `n` |
//! | `Named(name)`, constant defined | the constant's integer value |
//! | `Named(name)`, no constant | the `name` filter applied to `10` with the tag as argument |
//! | `Callback(f)` | `f()` |
//! | `Default` | `10` |

use core::fmt;
use std::sync::Arc;

/// Priority used when nothing else applies.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Zero-argument priority callback.
pub type PriorityFn = Arc<dyn Fn() -> i32 + Send + Sync>;

/// A declared, not yet resolved priority.
#[derive(Clone, Default)]
pub enum Priority {
    /// A literal priority.
    Fixed(i32),
    /// A named constant, or failing that, the name of a priority filter.
    Named(String),
    /// Computed by a callback.
    Callback(PriorityFn),
    /// [`DEFAULT_PRIORITY`].
    #[default]
    Default,
}

impl fmt::Debug for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Priority::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Priority::Callback(_) => f.write_str("Callback(..)"),
            Priority::Default => f.write_str("Default"),
        }
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority::Fixed(value)
    }
}

/// Numeric strings become [`Priority::Fixed`], anything else is
/// [`Priority::Named`].
impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(number) => Priority::Fixed(number),
            Err(_) => Priority::Named(value.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from(value.as_str())
    }
}

impl Priority {
    /// Wraps a callback as a priority.
    pub fn callback(f: impl Fn() -> i32 + Send + Sync + 'static) -> Self {
        Priority::Callback(Arc::new(f))
    }

    /// Resolves the priority for the given tag. Does not memoize.
    pub fn resolve(&self, tag: &str, scope: &dyn PriorityScope) -> i32 {
        match self {
            Priority::Fixed(value) => *value,
            Priority::Named(name) => scope
                .constant(name)
                .unwrap_or_else(|| scope.filter_priority(name, DEFAULT_PRIORITY, tag)),
            Priority::Callback(f) => f(),
            Priority::Default => DEFAULT_PRIORITY,
        }
    }
}

/// Environment a named priority is resolved against.
pub trait PriorityScope {
    /// Looks up an integer constant.
    fn constant(&self, name: &str) -> Option<i32>;

    /// Runs the `name` priority filter over `default`, passing `tag` along.
    fn filter_priority(&self, name: &str, default: i32, tag: &str) -> i32;
}

/// A scope with no constants and no filters. Named priorities fall back to
/// [`DEFAULT_PRIORITY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScope;

impl PriorityScope for NoScope {
    fn constant(&self, _name: &str) -> Option<i32> {
        None
    }

    fn filter_priority(&self, _name: &str, default: i32, _tag: &str) -> i32 {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    struct TestScope;

    impl PriorityScope for TestScope {
        fn constant(&self, name: &str) -> Option<i32> {
            (name == "EARLY").then_some(1)
        }

        fn filter_priority(&self, name: &str, default: i32, tag: &str) -> i32 {
            if name == "my_priority" && tag == "init" {
                default + 5
            } else {
                default
            }
        }
    }

    #[test]
    fn fixed_resolves_to_itself() {
        assert_eq!(Priority::from(20).resolve("init", &TestScope), 20);
    }

    #[test]
    fn numeric_string_is_fixed() {
        assert!(matches!(Priority::from("42"), Priority::Fixed(42)));
        assert!(matches!(Priority::from("late"), Priority::Named(_)));
    }

    #[test]
    fn named_constant_wins_over_filter() {
        assert_eq!(Priority::from("EARLY").resolve("init", &TestScope), 1);
    }

    #[test]
    fn named_without_constant_runs_filter_with_default_and_tag() {
        assert_eq!(Priority::from("my_priority").resolve("init", &TestScope), 15);
        assert_eq!(Priority::from("my_priority").resolve("other", &TestScope), 10);
    }

    #[test]
    fn callback_is_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let priority = Priority::callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            7
        });

        assert_eq!(priority.resolve("init", &NoScope), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_is_ten() {
        assert_eq!(Priority::default().resolve("init", &NoScope), DEFAULT_PRIORITY);
        assert_eq!(Priority::from("unknown").resolve("init", &NoScope), DEFAULT_PRIORITY);
    }
}
