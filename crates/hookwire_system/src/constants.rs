//! Environment-level named constants.
//!
//! [`Constants`] is the configuration source for everything the engine reads
//! from its environment: named priorities, context detection signals, and the
//! debug / kill-switch settings.
//!
//! # Example
//!
//! ```
//! use hookwire_system::constants::Constants;
//!
//! let constants = Constants::new()
//!     .define("HOOKWIRE_DEBUG", "true")
//!     .define("LATE_PRIORITY", "99");
//!
//! assert!(constants.is_true("HOOKWIRE_DEBUG"));
//! assert_eq!(constants.get_int("LATE_PRIORITY"), Some(99));
//! assert_eq!(constants.get("MISSING"), None);
//! ```

use hashbrown::HashMap;

/// A table of named string constants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constants {
    values: HashMap<String, String>,
}

impl Constants {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Snapshots the process environment.
    ///
    /// Variables that are not valid unicode are skipped.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            values: std::env::vars_os()
                .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        }
    }

    /// Defines (or redefines) a constant.
    #[must_use]
    pub fn define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns true if the constant is defined.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the raw value of a constant.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Parses a constant as an integer.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|value| value.trim().parse().ok())
    }

    /// Returns true if the constant is defined with a truthy value
    /// (`1`, `true`, `yes`, `on`; case-insensitive).
    #[must_use]
    pub fn is_true(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}
