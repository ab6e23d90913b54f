//! Method and function declarations.

use super::class::HandlerObject;
use crate::error::ConfigError;
use crate::spec::{HookKind, HookSpec, HookSpecBuilder};
use core::fmt;
use serde_json::Value;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// HookDescriptor
// ─────────────────────────────────────────────────────────────────────────────

/// The hook-descriptor capability.
///
/// A method whose last declared parameter is a hook descriptor receives the
/// descriptor of the hook that fired it (see [`Method::takes_hook`]).
pub trait HookDescriptor: Send + Sync {
    /// Action or filter.
    fn kind(&self) -> HookKind;

    /// The tag the hook is registered on.
    fn tag(&self) -> &str;

    /// The resolved priority, once resolved.
    fn priority(&self) -> Option<i32>;

    /// Class name of the owning handler.
    fn handler(&self) -> &str;

    /// Name of the hooked method.
    fn method(&self) -> &str;

    /// Returns true once the hook has been wired to the bus.
    fn is_invoked(&self) -> bool;
}

impl fmt::Debug for dyn HookDescriptor + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDescriptor")
            .field("kind", &self.kind())
            .field("tag", &self.tag())
            .field("handler", &self.handler())
            .field("method", &self.method())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Call
// ─────────────────────────────────────────────────────────────────────────────

/// Arguments forwarded to a hooked method.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// Arguments passed by the bus.
    pub args: &'a [Value],
    /// The firing hook's descriptor, when the engine appended it.
    pub hook: Option<&'a dyn HookDescriptor>,
}

impl<'a> Call<'a> {
    /// Creates a call without a hook descriptor.
    #[must_use]
    pub fn new(args: &'a [Value]) -> Self {
        Self { args, hook: None }
    }

    /// Appends a hook descriptor.
    #[must_use]
    pub fn with_hook(mut self, hook: &'a dyn HookDescriptor) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Returns the argument at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// The first argument, or `null`. Filters conventionally return this
    /// when they make no change.
    #[must_use]
    pub fn value(&self) -> Value {
        self.args.first().cloned().unwrap_or(Value::Null)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MethodDef
// ─────────────────────────────────────────────────────────────────────────────

/// Method visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Always hookable.
    #[default]
    Public,
    /// Hookable only with the accessible-hook-methods capability.
    Protected,
    /// Hookable only with the accessible-hook-methods capability.
    Private,
}

/// Type-erased method body.
pub(crate) type ErasedMethod = Arc<dyn Fn(&dyn HandlerObject, Call<'_>) -> Value + Send + Sync>;

/// A declared method of a handler class.
pub struct MethodDef {
    name: String,
    visibility: Visibility,
    is_static: bool,
    params: usize,
    takes_hook: bool,
    hooks: Vec<HookSpec>,
    body: ErasedMethod,
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("params", &self.params)
            .field("takes_hook", &self.takes_hook)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl MethodDef {
    /// The method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared visibility.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns true for static (class-level) methods.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Number of declared parameters, including a trailing hook descriptor.
    #[must_use]
    pub fn declared_args(&self) -> usize {
        self.params
    }

    /// Returns true if the last parameter is a hook descriptor.
    #[must_use]
    pub fn takes_hook(&self) -> bool {
        self.takes_hook
    }

    /// The hook specs attached to this method, in declaration order.
    #[must_use]
    pub fn hooks(&self) -> &[HookSpec] {
        &self.hooks
    }

    /// Calls the method on `target`. Returns `null` if `target` is not an
    /// instance of the declaring class.
    pub fn call(&self, target: &dyn HandlerObject, call: Call<'_>) -> Value {
        (self.body)(target, call)
    }
}

/// Typed builder for a [`MethodDef`].
///
/// # Example
///
/// ```
/// use hookwire_system::reflection::{Call, Method};
/// use hookwire_system::spec::HookSpec;
/// use serde_json::Value;
///
/// struct Titles;
///
/// let method = Method::new("shout", |_: &Titles, call: Call<'_>| {
///     Value::from(call.value().as_str().unwrap_or_default().to_uppercase())
/// })
/// .with_params(1)
/// .with_hook(HookSpec::filter("the_title"));
/// ```
pub struct Method<T> {
    name: String,
    visibility: Visibility,
    is_static: bool,
    params: usize,
    takes_hook: bool,
    hooks: Vec<HookSpecBuilder>,
    body: Arc<dyn Fn(&T, Call<'_>) -> Value + Send + Sync>,
}

impl<T: HandlerObject> Method<T> {
    /// Declares a public method with no parameters.
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&T, Call<'_>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            params: 0,
            takes_hook: false,
            hooks: Vec::new(),
            body: Arc::new(body),
        }
    }

    /// Sets the number of declared parameters (including a trailing hook
    /// descriptor, if any).
    #[must_use]
    pub fn with_params(mut self, params: usize) -> Self {
        self.params = params;
        self
    }

    /// Sets the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the method as static. Static methods are never hookable.
    #[must_use]
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Declares that the last parameter is a [`HookDescriptor`].
    #[must_use]
    pub fn takes_hook(mut self) -> Self {
        self.takes_hook = true;
        self
    }

    /// Attaches a hook. Hooks keep their declaration order.
    #[must_use]
    pub fn with_hook(mut self, hook: HookSpecBuilder) -> Self {
        self.hooks.push(hook);
        self
    }

    pub(crate) fn build(self) -> Result<MethodDef, ConfigError> {
        let hooks = self
            .hooks
            .into_iter()
            .map(|hook| hook.build_for(&self.name))
            .collect::<Result<Vec<_>, _>>()?;

        let body = self.body;
        let erased: ErasedMethod = Arc::new(move |target: &dyn HandlerObject, call: Call<'_>| {
            target
                .downcast_ref::<T>()
                .map_or(Value::Null, |this| body(this, call))
        });

        Ok(MethodDef {
            name: self.name,
            visibility: self.visibility,
            is_static: self.is_static,
            params: self.params.max(usize::from(self.takes_hook)),
            takes_hook: self.takes_hook,
            hooks,
            body: erased,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FunctionDef
// ─────────────────────────────────────────────────────────────────────────────

/// A free function carrying hook metadata.
pub struct FunctionDef {
    name: String,
    params: usize,
    hooks: Vec<HookSpec>,
    body: Arc<dyn Fn(Call<'_>) -> Value + Send + Sync>,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl FunctionDef {
    /// Declares a function.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the hooks is misconfigured.
    pub fn new(
        name: impl Into<String>,
        params: usize,
        hooks: impl IntoIterator<Item = HookSpecBuilder>,
        body: impl Fn(Call<'_>) -> Value + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let hooks = hooks
            .into_iter()
            .map(|hook| hook.build_for(&name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            params,
            hooks,
            body: Arc::new(body),
        })
    }

    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn declared_args(&self) -> usize {
        self.params
    }

    /// The hook specs attached to this function.
    #[must_use]
    pub fn hooks(&self) -> &[HookSpec] {
        &self.hooks
    }

    /// Calls the function.
    pub fn call(&self, call: Call<'_>) -> Value {
        (self.body)(call)
    }
}
