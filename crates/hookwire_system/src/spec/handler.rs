//! Class-level handler metadata.

use super::tag::interpolate;
use super::{Conditional, HookMeta, Requirement, Strategy};
use crate::context::ContextMask;
use crate::error::ConfigError;
use crate::priority::{Priority, PriorityScope};
use core::fmt;
use std::sync::Arc;

/// Describes a class that groups hooks.
///
/// Built with [`HandlerSpec::builder`]. Construction fails if the tag does
/// not fit the [`Strategy`].
///
/// # Example
///
/// ```
/// use hookwire_system::context::ContextMask;
/// use hookwire_system::spec::{HandlerSpec, Strategy};
///
/// let spec = HandlerSpec::builder()
///     .with_tag("init")
///     .with_priority(5)
///     .with_context(ContextMask::ADMIN)
///     .build()
///     .unwrap();
/// assert_eq!(spec.strategy(), Strategy::Deferred);
///
/// let err = HandlerSpec::builder()
///     .with_tag("init")
///     .with_strategy(Strategy::Unconditionally)
///     .build();
/// assert!(err.is_err());
/// ```
#[derive(Clone)]
pub struct HandlerSpec {
    meta: HookMeta,
    strategy: Strategy,
    conditional: Option<Conditional<HandlerSpec>>,
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("meta", &self.meta)
            .field("strategy", &self.strategy)
            .field("conditional", &self.conditional.is_some())
            .finish()
    }
}

impl HandlerSpec {
    /// Starts a new handler declaration.
    #[must_use]
    pub fn builder() -> HandlerSpecBuilder {
        HandlerSpecBuilder::default()
    }

    /// Shared metadata.
    #[must_use]
    pub fn meta(&self) -> &HookMeta {
        &self.meta
    }

    /// The trigger tag. Empty for `Dynamically` and `Unconditionally`.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.meta.tag()
    }

    /// The initialization strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The contexts this handler may activate in.
    #[must_use]
    pub fn context(&self) -> ContextMask {
        self.meta.context()
    }

    /// The dependency, if any.
    #[must_use]
    pub fn requires(&self) -> Option<&Requirement> {
        self.meta.requires()
    }

    /// Resolves (once) and returns the priority.
    pub fn priority(&self, scope: &dyn PriorityScope) -> i32 {
        self.meta.priority(scope)
    }

    /// Returns true if no conditional was declared, otherwise the
    /// conditional's verdict.
    #[must_use]
    pub fn check_conditional(&self) -> bool {
        self.conditional
            .as_ref()
            .is_none_or(|conditional| conditional(self))
    }
}

/// Builder for [`HandlerSpec`].
#[derive(Default)]
pub struct HandlerSpecBuilder {
    tag: Option<String>,
    priority: Priority,
    context: ContextMask,
    conditional: Option<Conditional<HandlerSpec>>,
    requires: Option<Requirement>,
    strategy: Strategy,
    modifiers: Vec<String>,
}

impl HandlerSpecBuilder {
    /// Sets the trigger tag (a template if modifiers are supplied).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Sets the context mask. Defaults to [`ContextMask::GLOBAL`].
    #[must_use]
    pub fn with_context(mut self, context: ContextMask) -> Self {
        self.context = context;
        self
    }

    /// Sets a conditional predicate.
    #[must_use]
    pub fn with_conditional(
        mut self,
        conditional: impl Fn(&HandlerSpec) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.conditional = Some(Arc::new(conditional));
        self
    }

    /// Sets a dependency.
    #[must_use]
    pub fn with_requires(mut self, requires: Requirement) -> Self {
        self.requires = Some(requires);
        self
    }

    /// Sets the initialization strategy. Defaults to [`Strategy::Deferred`].
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the values interpolated into the tag template.
    #[must_use]
    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Validates and builds the spec.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TagRequired`] if the strategy needs a tag and none was set.
    /// - [`ConfigError::TagForbidden`] if the strategy forbids a tag and one was set.
    /// - [`ConfigError::TagInterpolation`] if the template needs more modifiers.
    pub fn build(self) -> Result<HandlerSpec, ConfigError> {
        let template = self.tag.unwrap_or_default();
        let tag = if self.modifiers.is_empty() {
            template
        } else {
            interpolate(&template, &self.modifiers)?
        };

        match (self.strategy.requires_tag(), tag.is_empty()) {
            (true, true) => {
                return Err(ConfigError::TagRequired {
                    strategy: self.strategy,
                });
            }
            (false, false) => {
                return Err(ConfigError::TagForbidden {
                    strategy: self.strategy,
                    tag,
                });
            }
            _ => {}
        }

        Ok(HandlerSpec {
            meta: HookMeta::new(tag, self.priority, self.context, self.requires),
            strategy: self.strategy,
            conditional: self.conditional,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Strategy; 7] = [
        Strategy::Immediately,
        Strategy::Early,
        Strategy::Deferred,
        Strategy::OnDemand,
        Strategy::JustInTime,
        Strategy::Dynamically,
        Strategy::Unconditionally,
    ];

    #[test]
    fn untagged_strategies_reject_tag() {
        for strategy in [Strategy::Dynamically, Strategy::Unconditionally] {
            let result = HandlerSpec::builder()
                .with_tag("init")
                .with_strategy(strategy)
                .build();
            assert!(matches!(result, Err(ConfigError::TagForbidden { .. })));

            HandlerSpec::builder()
                .with_strategy(strategy)
                .build()
                .expect("no tag should be accepted");
        }
    }

    #[test]
    fn tagged_strategies_require_tag() {
        for strategy in ALL.into_iter().filter(|s| s.requires_tag()) {
            let result = HandlerSpec::builder().with_strategy(strategy).build();
            assert_eq!(result.unwrap_err(), ConfigError::TagRequired { strategy });

            let result = HandlerSpec::builder()
                .with_tag("")
                .with_strategy(strategy)
                .build();
            assert!(result.is_err(), "empty tag should fail for {strategy:?}");
        }
    }

    #[test]
    fn tag_is_interpolated_at_construction() {
        let spec = HandlerSpec::builder()
            .with_tag("load_%s")
            .with_modifiers(["settings"])
            .build()
            .unwrap();
        assert_eq!(spec.tag(), "load_settings");
    }

    #[test]
    fn conditional_receives_spec() {
        let spec = HandlerSpec::builder()
            .with_tag("init")
            .with_conditional(|spec: &HandlerSpec| spec.tag() == "init")
            .build()
            .unwrap();
        assert!(spec.check_conditional());

        let spec = HandlerSpec::builder()
            .with_tag("init")
            .with_conditional(|_: &HandlerSpec| false)
            .build()
            .unwrap();
        assert!(!spec.check_conditional());
    }

    #[test]
    fn defaults() {
        let spec = HandlerSpec::builder().with_tag("init").build().unwrap();
        assert_eq!(spec.context(), ContextMask::GLOBAL);
        assert_eq!(spec.strategy(), Strategy::Deferred);
        assert!(spec.requires().is_none());
        assert!(spec.check_conditional());
    }
}
