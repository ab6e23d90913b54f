//! Request-level kill-switch.

use crate::config::{InvokerConfig, RequestParams};

/// Class-name prefix of the engine's own diagnostics. Never suppressed.
pub const DEBUG_NAMESPACE: &str = "hookwire::debug";

/// Suppresses every hook outside [`DEBUG_NAMESPACE`] when the configured
/// request parameter equals `"1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillSwitch {
    param: Option<String>,
    engaged: bool,
}

impl KillSwitch {
    /// Evaluates the switch once for the current request.
    #[must_use]
    pub fn new(config: &InvokerConfig, request: &RequestParams) -> Self {
        let param = config.killswitch().map(str::to_string);
        let engaged = param
            .as_deref()
            .is_some_and(|name| request.get(name) == Some("1"));

        Self { param, engaged }
    }

    /// The configured parameter name, if any.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Returns true if the request asked for hooks to be suppressed.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Returns true if hooks owned by `classname` must be suppressed.
    #[must_use]
    pub fn suppresses(&self, classname: &str) -> bool {
        self.engaged && !is_diagnostics(classname)
    }
}

/// Returns true for classes in [`DEBUG_NAMESPACE`].
#[must_use]
pub fn is_diagnostics(classname: &str) -> bool {
    classname
        .strip_prefix(DEBUG_NAMESPACE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch(value: &str) -> KillSwitch {
        let config = InvokerConfig::new()
            .with_debug(true)
            .with_killswitch("hooks_off");
        KillSwitch::new(&config, &RequestParams::new().with_param("hooks_off", value))
    }

    #[test]
    fn engaged_only_for_one() {
        assert!(switch("1").is_engaged());
        assert!(!switch("0").is_engaged());
        assert!(!switch("true").is_engaged());
    }

    #[test]
    fn absent_parameter_has_no_effect() {
        let config = InvokerConfig::new()
            .with_debug(true)
            .with_killswitch("hooks_off");
        let killswitch = KillSwitch::new(&config, &RequestParams::new());
        assert!(!killswitch.suppresses("app::Menu"));
    }

    #[test]
    fn diagnostics_namespace_is_exempt() {
        let killswitch = switch("1");
        assert!(killswitch.suppresses("app::Menu"));
        assert!(!killswitch.suppresses("hookwire::debug::DebugHandler"));
        assert!(killswitch.suppresses("hookwire::debugger::Other"));
    }

    #[test]
    fn disabled_without_debug() {
        let config = InvokerConfig::new().with_killswitch("hooks_off");
        let killswitch = KillSwitch::new(&config, &RequestParams::new().with_param("hooks_off", "1"));
        assert!(!killswitch.is_engaged());
        assert_eq!(killswitch.param(), None);
    }
}
