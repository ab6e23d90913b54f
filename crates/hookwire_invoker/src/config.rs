//! Invoker configuration and request parameters.

use hashbrown::HashMap;
use hookwire_system::constants::Constants;

/// Constant that turns on debug mode.
pub const DEBUG_CONSTANT: &str = "HOOKWIRE_DEBUG";

/// Constant naming the kill-switch request parameter.
pub const KILLSWITCH_CONSTANT: &str = "HOOKWIRE_KILLSWITCH";

// ─────────────────────────────────────────────────────────────────────────────
// InvokerConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Invoker settings.
///
/// Kill-switch checks only happen in debug mode. The diagnostics handler is
/// registered by default, but only initializes in debug mode.
///
/// # Example
///
/// ```
/// use hookwire_invoker::InvokerConfig;
///
/// let config = InvokerConfig::new()
///     .with_debug(true)
///     .with_killswitch("no_hooks");
///
/// assert_eq!(config.killswitch(), Some("no_hooks"));
/// assert_eq!(InvokerConfig::new().with_killswitch("no_hooks").killswitch(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerConfig {
    debug: bool,
    killswitch: Option<String>,
    diagnostics: bool,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            killswitch: None,
            diagnostics: true,
        }
    }
}

impl InvokerConfig {
    /// Debug off, no kill-switch, diagnostics handler registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`DEBUG_CONSTANT`] and [`KILLSWITCH_CONSTANT`].
    #[must_use]
    pub fn from_constants(constants: &Constants) -> Self {
        Self {
            debug: constants.is_true(DEBUG_CONSTANT),
            killswitch: constants
                .get(KILLSWITCH_CONSTANT)
                .filter(|param| !param.is_empty())
                .map(str::to_string),
            diagnostics: true,
        }
    }

    /// Turns debug mode on or off.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Names the kill-switch request parameter.
    #[must_use]
    pub fn with_killswitch(mut self, param: impl Into<String>) -> Self {
        self.killswitch = Some(param.into());
        self
    }

    /// Registers (or skips) the diagnostics handler.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Returns true in debug mode.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The kill-switch parameter, if debug mode is on and one is named.
    #[must_use]
    pub fn killswitch(&self) -> Option<&str> {
        self.killswitch.as_deref().filter(|_| self.debug)
    }

    /// Returns true if the diagnostics handler should be registered.
    #[must_use]
    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RequestParams
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    params: HashMap<String, String>,
}

impl RequestParams {
    /// No parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
