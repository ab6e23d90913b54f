//! Registry entries and snapshots.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use hookwire_system::context::ContextMask;
use hookwire_system::reflection::{ClassDef, HandlerObject, HookDescriptor, MethodDef};
use hookwire_system::spec::{HandlerSpec, HookKind, HookSpec, InvokeMode, Strategy};
use serde::Serialize;
use std::sync::{Arc, OnceLock};

// ─────────────────────────────────────────────────────────────────────────────
// HandlerEntry
// ─────────────────────────────────────────────────────────────────────────────

/// A registered handler.
pub struct HandlerEntry {
    classname: String,
    spec: HandlerSpec,
    class: Arc<ClassDef>,
    target: OnceLock<Arc<dyn HandlerObject>>,
    methods_registered: AtomicBool,
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("classname", &self.classname)
            .field("spec", &self.spec)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl HandlerEntry {
    pub(crate) fn new(spec: HandlerSpec, class: Arc<ClassDef>) -> Self {
        Self {
            classname: class.name().to_string(),
            spec,
            class,
            target: OnceLock::new(),
            methods_registered: AtomicBool::new(false),
        }
    }

    /// The class name.
    #[must_use]
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// The handler metadata.
    #[must_use]
    pub fn spec(&self) -> &HandlerSpec {
        &self.spec
    }

    /// The initialization strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.spec.strategy()
    }

    /// The class declaration.
    #[must_use]
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// The handler instance, once initialized.
    #[must_use]
    pub fn target(&self) -> Option<&Arc<dyn HandlerObject>> {
        self.target.get()
    }

    /// Returns true once an instance exists.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.target.get().is_some()
    }

    /// Stores the instance. Returns false if one was already stored.
    pub(crate) fn set_target(&self, target: Arc<dyn HandlerObject>) -> bool {
        self.target.set(target).is_ok()
    }

    /// Claims method registration. Returns false if already claimed.
    pub(crate) fn claim_methods(&self) -> bool {
        !self.methods_registered.swap(true, Ordering::AcqRel)
    }

    /// Returns true once methods have been registered.
    #[must_use]
    pub fn has_methods_registered(&self) -> bool {
        self.methods_registered.load(Ordering::Acquire)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookEntry
// ─────────────────────────────────────────────────────────────────────────────

/// A hook bound to its handler and method.
///
/// Doubles as the [`HookDescriptor`] handed to methods that take one.
pub struct HookEntry {
    spec: HookSpec,
    handler: String,
    method: String,
    method_index: usize,
    declared_args: usize,
    takes_hook: bool,
    mode: InvokeMode,
    invoked: AtomicBool,
}

impl fmt::Debug for HookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEntry")
            .field("handler", &self.handler)
            .field("method", &self.method)
            .field("spec", &self.spec)
            .field("mode", &self.mode)
            .field("invoked", &self.is_invoked())
            .finish_non_exhaustive()
    }
}

impl HookEntry {
    /// Binds `spec` to `method` (at `method_index` in the class) of the
    /// handler. Lazy strategies force indirect invocation.
    pub(crate) fn new(
        spec: HookSpec,
        handler: &HandlerEntry,
        method_index: usize,
        method: &MethodDef,
    ) -> Self {
        let mode = if handler.strategy().is_lazy() {
            InvokeMode::Indirectly
        } else {
            spec.invoke()
        };

        Self {
            spec,
            handler: handler.classname().to_string(),
            method: method.name().to_string(),
            method_index,
            declared_args: method.declared_args(),
            takes_hook: method.takes_hook(),
            mode,
            invoked: AtomicBool::new(false),
        }
    }

    /// The hook metadata.
    #[must_use]
    pub fn spec(&self) -> &HookSpec {
        &self.spec
    }

    /// The effective invocation mode.
    #[must_use]
    pub fn mode(&self) -> InvokeMode {
        self.mode
    }

    /// Parameters the method declares.
    #[must_use]
    pub fn declared_args(&self) -> usize {
        self.declared_args
    }

    /// Returns true if the method's last parameter is the hook descriptor.
    #[must_use]
    pub fn takes_hook(&self) -> bool {
        self.takes_hook
    }

    /// Returns true if the engine appends the descriptor when forwarding.
    #[must_use]
    pub fn appends_hook(&self) -> bool {
        self.mode == InvokeMode::Indirectly && self.takes_hook
    }

    /// The argument count registered with the bus.
    #[must_use]
    pub fn accepted_args(&self) -> usize {
        if self.appends_hook() {
            self.declared_args.saturating_sub(1)
        } else {
            self.declared_args
        }
    }

    pub(crate) fn method_index(&self) -> usize {
        self.method_index
    }

    pub(crate) fn mark_invoked(&self) {
        self.invoked.store(true, Ordering::Release);
    }
}

impl HookDescriptor for HookEntry {
    fn kind(&self) -> HookKind {
        self.spec.kind()
    }

    fn tag(&self) -> &str {
        self.spec.tag()
    }

    fn priority(&self) -> Option<i32> {
        self.spec.meta().resolved_priority()
    }

    fn handler(&self) -> &str {
        &self.handler
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn is_invoked(&self) -> bool {
        self.invoked.load(Ordering::Acquire)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable view of the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    /// Display name of the active context.
    pub context: String,
    /// Whether the kill-switch is engaged for this request.
    pub killswitch: bool,
    /// Registered handlers in registration order.
    pub handlers: Vec<HandlerSnapshot>,
}

/// Serializable view of one handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerSnapshot {
    /// Class name.
    pub classname: String,
    /// Initialization strategy.
    pub strategy: Strategy,
    /// Trigger tag, empty for untagged strategies.
    pub tag: String,
    /// Resolved priority, if resolved.
    pub priority: Option<i32>,
    /// Context mask.
    pub context: ContextMask,
    /// Whether an instance exists.
    pub initialized: bool,
    /// Hooks in method declaration order.
    pub hooks: Vec<HookSnapshot>,
}

/// Serializable view of one hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookSnapshot {
    /// Method name.
    pub method: String,
    /// Action or filter.
    pub kind: HookKind,
    /// Tag.
    pub tag: String,
    /// Resolved priority, if resolved.
    pub priority: Option<i32>,
    /// Effective invocation mode.
    pub invoke: InvokeMode,
    /// Argument count registered with the bus.
    pub accepted_args: usize,
    /// Whether the hook is wired to the bus.
    pub invoked: bool,
}

impl HandlerSnapshot {
    pub(crate) fn capture(handler: &HandlerEntry, hooks: &[Arc<HookEntry>]) -> Self {
        Self {
            classname: handler.classname().to_string(),
            strategy: handler.strategy(),
            tag: handler.spec().tag().to_string(),
            priority: handler.spec().meta().resolved_priority(),
            context: handler.spec().context(),
            initialized: handler.is_initialized(),
            hooks: hooks.iter().map(|hook| HookSnapshot::capture(hook)).collect(),
        }
    }
}

impl HookSnapshot {
    fn capture(hook: &HookEntry) -> Self {
        Self {
            method: hook.method().to_string(),
            kind: hook.kind(),
            tag: hook.tag().to_string(),
            priority: HookDescriptor::priority(hook),
            invoke: hook.mode(),
            accepted_args: hook.accepted_args(),
            invoked: hook.is_invoked(),
        }
    }
}
