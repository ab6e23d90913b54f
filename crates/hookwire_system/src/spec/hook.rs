//! Method-level hook metadata.

use super::tag::interpolate;
use super::{Conditional, HookKind, HookMeta, InvokeMode, Requirement};
use crate::context::ContextMask;
use crate::error::ConfigError;
use crate::priority::{Priority, PriorityScope};
use core::fmt;
use std::sync::Arc;

/// Describes one hook on a method: an action or a filter.
///
/// # Example
///
/// ```
/// use hookwire_system::spec::{HookKind, HookSpec, InvokeMode};
///
/// let hook = HookSpec::filter("the_%s")
///     .with_modifiers(["title"])
///     .with_priority(20)
///     .with_invoke(InvokeMode::Indirectly)
///     .build()
///     .unwrap();
///
/// assert_eq!(hook.tag(), "the_title");
/// assert_eq!(hook.kind(), HookKind::Filter);
/// ```
#[derive(Clone)]
pub struct HookSpec {
    kind: HookKind,
    meta: HookMeta,
    invoke: InvokeMode,
    conditional: Option<Conditional<HookSpec>>,
}

impl fmt::Debug for HookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSpec")
            .field("kind", &self.kind)
            .field("meta", &self.meta)
            .field("invoke", &self.invoke)
            .field("conditional", &self.conditional.is_some())
            .finish()
    }
}

impl HookSpec {
    /// Starts an action declaration.
    pub fn action(tag: impl Into<String>) -> HookSpecBuilder {
        HookSpecBuilder::new(HookKind::Action, tag.into())
    }

    /// Starts a filter declaration.
    pub fn filter(tag: impl Into<String>) -> HookSpecBuilder {
        HookSpecBuilder::new(HookKind::Filter, tag.into())
    }

    /// Action or filter.
    #[must_use]
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// Shared metadata.
    #[must_use]
    pub fn meta(&self) -> &HookMeta {
        &self.meta
    }

    /// The interpolated tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.meta.tag()
    }

    /// The declared invocation mode.
    #[must_use]
    pub fn invoke(&self) -> InvokeMode {
        self.invoke
    }

    /// The contexts this hook may activate in.
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

/// Builder for [`HookSpec`].
pub struct HookSpecBuilder {
    kind: HookKind,
    tag: String,
    priority: Priority,
    context: ContextMask,
    conditional: Option<Conditional<HookSpec>>,
    requires: Option<Requirement>,
    invoke: InvokeMode,
    modifiers: Vec<String>,
}

impl HookSpecBuilder {
    fn new(kind: HookKind, tag: String) -> Self {
        Self {
            kind,
            tag,
            priority: Priority::Default,
            context: ContextMask::GLOBAL,
            conditional: None,
            requires: None,
            invoke: InvokeMode::Directly,
            modifiers: Vec::new(),
        }
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
        conditional: impl Fn(&HookSpec) -> bool + Send + Sync + 'static,
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

    /// Sets the invocation mode. Defaults to [`InvokeMode::Directly`].
    #[must_use]
    pub fn with_invoke(mut self, invoke: InvokeMode) -> Self {
        self.invoke = invoke;
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
    /// - [`ConfigError::MissingHookTag`] if the tag is empty.
    /// - [`ConfigError::TagInterpolation`] if the template needs more modifiers.
    pub fn build(self) -> Result<HookSpec, ConfigError> {
        self.build_for("")
    }

    /// Builds the spec, naming `method` in errors.
    pub(crate) fn build_for(self, method: &str) -> Result<HookSpec, ConfigError> {
        let tag = if self.modifiers.is_empty() {
            self.tag
        } else {
            interpolate(&self.tag, &self.modifiers)?
        };

        if tag.is_empty() {
            return Err(ConfigError::MissingHookTag {
                method: method.to_string(),
            });
        }

        Ok(HookSpec {
            kind: self.kind,
            meta: HookMeta::new(tag, self.priority, self.context, self.requires),
            invoke: self.invoke,
            conditional: self.conditional,
        })
    }
}
