//! Introspection over declared handler classes and functions.
//!
//! Rust has no runtime attribute reflection, so classes and functions are
//! declared explicitly ([`ClassDef`], [`FunctionDef`]) and stored in a
//! [`Reflection`] catalog. The catalog answers the questions the invoker
//! needs:
//!
//! - [`Reflection::resolve_target`] turns a class name, an instance, a
//!   `(class, method)` pair or a function name into a [`Reflectable`].
//! - [`extract_decorators`] / [`extract_single_decorator`] return the
//!   metadata attached to a reflectable, in declaration order.
//! - [`hookable_methods`] lists the methods of a class that may be hooked.

mod class;
mod method;

pub use class::{ClassBuilder, ClassDef, HandlerObject};
pub use method::{Call, FunctionDef, HookDescriptor, Method, MethodDef, Visibility};

use crate::error::ConfigError;
use crate::spec::{HandlerSpec, HookKind, HookSpec};
use core::any::TypeId;
use hashbrown::HashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Method names that are never hookable, even when public and decorated.
pub const RESERVED_METHODS: &[&str] = &[
    "new",
    "default",
    "drop",
    "clone",
    "call",
    "call_static",
    "check_method_access",
    "is_method_valid",
    "registered_hooks",
];

// ─────────────────────────────────────────────────────────────────────────────
// Targets
// ─────────────────────────────────────────────────────────────────────────────

/// Something to introspect.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A class by name.
    Class(&'a str),
    /// A handler instance. Resolved through its concrete type.
    Instance(&'a dyn HandlerObject),
    /// A `(class, method)` pair.
    Method(&'a str, &'a str),
    /// An `(instance, method)` pair.
    InstanceMethod(&'a dyn HandlerObject, &'a str),
    /// A free function by name.
    Function(&'a str),
}

/// A uniform handle over a class, a method or a function.
#[derive(Debug, Clone)]
pub enum Reflectable {
    /// A declared class.
    Class(Arc<ClassDef>),
    /// A method of a declared class.
    Method {
        /// The declaring class.
        class: Arc<ClassDef>,
        /// Position of the method in [`ClassDef::methods`].
        index: usize,
    },
    /// A declared free function.
    Function(Arc<FunctionDef>),
}

impl Reflectable {
    /// The name of the class, method or function.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Reflectable::Class(class) => class.name(),
            Reflectable::Method { class, index } => class
                .methods()
                .get(*index)
                .map_or_else(|| class.name(), MethodDef::name),
            Reflectable::Function(function) => function.name(),
        }
    }

    /// The class, for class and method handles.
    #[must_use]
    pub fn class(&self) -> Option<&Arc<ClassDef>> {
        match self {
            Reflectable::Class(class) | Reflectable::Method { class, .. } => Some(class),
            Reflectable::Function(_) => None,
        }
    }

    /// The method, for method handles.
    #[must_use]
    pub fn method(&self) -> Option<&MethodDef> {
        match self {
            Reflectable::Method { class, index } => class.methods().get(*index),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decorators
// ─────────────────────────────────────────────────────────────────────────────

/// A metadata instance attached to a reflectable.
#[derive(Debug, Clone, Copy)]
pub enum Decorator<'a> {
    /// Class-level handler metadata.
    Handler(&'a HandlerSpec),
    /// Method- or function-level hook metadata.
    Hook(&'a HookSpec),
}

impl<'a> Decorator<'a> {
    /// The handler spec, if this is one.
    #[must_use]
    pub fn as_handler(self) -> Option<&'a HandlerSpec> {
        match self {
            Decorator::Handler(spec) => Some(spec),
            Decorator::Hook(_) => None,
        }
    }

    /// The hook spec, if this is one.
    #[must_use]
    pub fn as_hook(self) -> Option<&'a HookSpec> {
        match self {
            Decorator::Hook(spec) => Some(spec),
            Decorator::Handler(_) => None,
        }
    }
}

/// The kind of metadata to extract.
///
/// Matching is covariant: [`DecoratorKind::Hook`] matches every action and
/// filter, and [`DecoratorKind::Action`] also matches filters, since a
/// filter is an action whose result is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorKind {
    /// Handler metadata.
    Handler,
    /// Any hook.
    Hook,
    /// Actions and filters.
    Action,
    /// Filters only.
    Filter,
}

impl DecoratorKind {
    /// Returns true if `decorator` is of this kind.
    #[must_use]
    pub fn matches(self, decorator: Decorator<'_>) -> bool {
        match (self, decorator) {
            (DecoratorKind::Handler, Decorator::Handler(_))
            | (DecoratorKind::Hook | DecoratorKind::Action, Decorator::Hook(_)) => true,
            (DecoratorKind::Filter, Decorator::Hook(hook)) => hook.kind() == HookKind::Filter,
            _ => false,
        }
    }
}

/// Returns every decorator of `kind` attached to `target`, in declaration
/// order.
#[must_use]
pub fn extract_decorators(target: &Reflectable, kind: DecoratorKind) -> Vec<Decorator<'_>> {
    let attached: Vec<Decorator<'_>> = match target {
        Reflectable::Class(class) => class
            .handler_spec()
            .map(Decorator::Handler)
            .into_iter()
            .collect(),
        Reflectable::Method { class, index } => class
            .methods()
            .get(*index)
            .map(|method| method.hooks().iter().map(Decorator::Hook).collect())
            .unwrap_or_default(),
        Reflectable::Function(function) => function.hooks().iter().map(Decorator::Hook).collect(),
    };

    attached
        .into_iter()
        .filter(|decorator| kind.matches(*decorator))
        .collect()
}

/// Returns the first decorator of `kind` attached to `target`.
#[must_use]
pub fn extract_single_decorator(target: &Reflectable, kind: DecoratorKind) -> Option<Decorator<'_>> {
    extract_decorators(target, kind).into_iter().next()
}

/// Lists the hookable methods of `class`, in declaration order.
///
/// A method is hookable when it carries at least one hook, is not static,
/// is not in [`RESERVED_METHODS`], and is public (or the class declares
/// accessible hook methods).
#[must_use]
pub fn hookable_methods(class: &ClassDef) -> Vec<&MethodDef> {
    class
        .methods()
        .iter()
        .filter(|method| is_hookable(class, method))
        .collect()
}

/// Returns true if `method` of `class` may be hooked. See [`hookable_methods`].
#[must_use]
pub fn is_hookable(class: &ClassDef, method: &MethodDef) -> bool {
    !method.hooks().is_empty()
        && !method.is_static()
        && !RESERVED_METHODS.contains(&method.name())
        && (class.has_accessible_hook_methods() || method.visibility() == Visibility::Public)
}

// ─────────────────────────────────────────────────────────────────────────────
// Reflection
// ─────────────────────────────────────────────────────────────────────────────

/// The catalog of declared classes and functions.
///
/// Declarations are append-only. Lookups hand out `Arc`s, so callers never
/// hold the catalog lock while running handler code.
#[derive(Debug, Default)]
pub struct Reflection {
    classes: RwLock<IndexMap<String, Arc<ClassDef>>>,
    types: RwLock<HashMap<TypeId, String>>,
    functions: RwLock<IndexMap<String, Arc<FunctionDef>>>,
}

impl Reflection {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateClass`] if the name is taken.
    pub fn define(&self, class: ClassDef) -> Result<Arc<ClassDef>, ConfigError> {
        let mut classes = self.classes.write();
        if classes.contains_key(class.name()) {
            return Err(ConfigError::DuplicateClass(class.name().to_string()));
        }

        let class = Arc::new(class);
        self.types
            .write()
            .entry(class.type_id())
            .or_insert_with(|| class.name().to_string());
        classes.insert(class.name().to_string(), Arc::clone(&class));

        tracing::trace!(class = class.name(), "class declared");
        Ok(class)
    }

    /// Adds a function declaration. A later declaration with the same name
    /// replaces the earlier one.
    pub fn define_function(&self, function: FunctionDef) -> Arc<FunctionDef> {
        let function = Arc::new(function);
        self.functions
            .write()
            .insert(function.name().to_string(), Arc::clone(&function));
        function
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.classes.read().get(name).cloned()
    }

    /// Looks up the class declared for the concrete type of `instance`.
    ///
    /// When several classes share a type, the first declared wins.
    #[must_use]
    pub fn class_of(&self, instance: &dyn HandlerObject) -> Option<Arc<ClassDef>> {
        let type_id = instance.as_any().type_id();
        let name = self.types.read().get(&type_id).cloned()?;
        self.class(&name)
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<Arc<FunctionDef>> {
        self.functions.read().get(name).cloned()
    }

    /// Names of all declared classes, in declaration order.
    #[must_use]
    pub fn class_names(&self) -> Vec<String> {
        self.classes.read().keys().cloned().collect()
    }

    /// Resolves `target` to a uniform handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] if the class, method or
    /// function is not declared.
    pub fn resolve_target(&self, target: Target<'_>) -> Result<Reflectable, ConfigError> {
        match target {
            Target::Class(name) => self
                .class(name)
                .map(Reflectable::Class)
                .ok_or_else(|| ConfigError::InvalidTarget(name.to_string())),
            Target::Instance(instance) => self
                .class_of(instance)
                .map(Reflectable::Class)
                .ok_or_else(|| ConfigError::InvalidTarget(instance_label(instance))),
            Target::Method(name, method) => {
                let class = self
                    .class(name)
                    .ok_or_else(|| ConfigError::InvalidTarget(format!("{name}::{method}")))?;
                method_handle(class, method)
            }
            Target::InstanceMethod(instance, method) => {
                let class = self.class_of(instance).ok_or_else(|| {
                    ConfigError::InvalidTarget(format!("{}::{method}", instance_label(instance)))
                })?;
                method_handle(class, method)
            }
            Target::Function(name) => self
                .function(name)
                .map(Reflectable::Function)
                .ok_or_else(|| ConfigError::InvalidTarget(name.to_string())),
        }
    }
}

fn method_handle(class: Arc<ClassDef>, method: &str) -> Result<Reflectable, ConfigError> {
    let index = class
        .methods()
        .iter()
        .position(|candidate| candidate.name() == method)
        .ok_or_else(|| ConfigError::InvalidTarget(format!("{}::{method}", class.name())))?;
    Ok(Reflectable::Method { class, index })
}

fn instance_label(instance: &dyn HandlerObject) -> String {
    format!("instance of {:?}", instance.as_any().type_id())
}
