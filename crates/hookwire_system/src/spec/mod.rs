//! Handler and hook metadata.
//!
//! Metadata is declared up front and never mutated afterwards, with one
//! exception: the resolved priority, which is computed on first use and then
//! cached (see [`HookMeta::priority`]).
//!
//! - [`HandlerSpec`] describes a class that groups hooks and how it is
//!   initialized ([`Strategy`]).
//! - [`HookSpec`] describes one hooked method, either an action or a filter
//!   ([`HookKind`]).

mod handler;
mod hook;
pub mod tag;

pub use handler::{HandlerSpec, HandlerSpecBuilder};
pub use hook::{HookSpec, HookSpecBuilder};

use crate::context::ContextMask;
use crate::priority::{Priority, PriorityScope};
use serde::Serialize;
use std::sync::{Arc, OnceLock};

/// Predicate consulted before activating a spec. Receives the spec itself.
pub type Conditional<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Strategy
// ─────────────────────────────────────────────────────────────────────────────

/// When and how a handler instance is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Strategy {
    /// Created at registration, gated by context, dependencies and `can_initialize`.
    Immediately,
    /// Created at registration without gating.
    Early,
    /// Created inside a bus callback fired at the handler's tag and priority.
    #[default]
    Deferred,
    /// Created the first time one of its hooks is about to fire.
    OnDemand,
    /// Created inside each hook's indirect callback, with the
    /// initialization gate re-checked on every call.
    JustInTime,
    /// Constructed by the caller and handed to the engine.
    Dynamically,
    /// Created at registration with no gating at all.
    Unconditionally,
}

impl Strategy {
    /// Returns true if the strategy needs a trigger tag.
    ///
    /// `Dynamically` and `Unconditionally` forbid one; every other strategy
    /// requires one.
    #[must_use]
    pub fn requires_tag(self) -> bool {
        !matches!(self, Strategy::Dynamically | Strategy::Unconditionally)
    }

    /// Returns true if hooks of this strategy initialize their handler lazily
    /// from inside their own callbacks.
    #[must_use]
    pub fn is_lazy(self) -> bool {
        matches!(self, Strategy::OnDemand | Strategy::JustInTime)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook kinds
// ─────────────────────────────────────────────────────────────────────────────

/// Action or filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HookKind {
    /// Callback result is discarded.
    Action,
    /// Callback result is returned to the bus.
    Filter,
}

/// How the bus reaches the hooked method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum InvokeMode {
    /// The bus calls the method on the handler instance.
    #[default]
    Directly,
    /// The bus calls an engine wrapper that re-validates before delegating.
    Indirectly,
}

// ─────────────────────────────────────────────────────────────────────────────
// Requirement
// ─────────────────────────────────────────────────────────────────────────────

/// A dependency that must be met before a spec may activate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Requirement {
    /// The named handler must be initialized.
    Handler(String),
    /// Every hook on the named handler's method must be invoked.
    Hook {
        /// Handler class name.
        handler: String,
        /// Method name.
        method: String,
    },
}

impl Requirement {
    /// Requires the named handler to be initialized.
    pub fn handler(classname: impl Into<String>) -> Self {
        Requirement::Handler(classname.into())
    }

    /// Requires every hook on `classname::method` to be invoked.
    pub fn hook(classname: impl Into<String>, method: impl Into<String>) -> Self {
        Requirement::Hook {
            handler: classname.into(),
            method: method.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookMeta
// ─────────────────────────────────────────────────────────────────────────────

/// Metadata shared by handler and hook specs.
#[derive(Debug, Clone)]
pub struct HookMeta {
    tag: String,
    priority: Priority,
    resolved: OnceLock<i32>,
    context: ContextMask,
    requires: Option<Requirement>,
}

impl HookMeta {
    pub(crate) fn new(
        tag: String,
        priority: Priority,
        context: ContextMask,
        requires: Option<Requirement>,
    ) -> Self {
        Self {
            tag,
            priority,
            resolved: OnceLock::new(),
            context,
            requires,
        }
    }

    /// The interpolated tag. Empty for untagged handlers.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The declared priority.
    #[must_use]
    pub fn declared_priority(&self) -> &Priority {
        &self.priority
    }

    /// Resolves the priority on first call and returns the cached value
    /// afterwards. `scope` is only consulted on the first call.
    pub fn priority(&self, scope: &dyn PriorityScope) -> i32 {
        *self
            .resolved
            .get_or_init(|| self.priority.resolve(&self.tag, scope))
    }

    /// The resolved priority, if it has been resolved.
    #[must_use]
    pub fn resolved_priority(&self) -> Option<i32> {
        self.resolved.get().copied()
    }

    /// The contexts this spec may activate in.
    #[must_use]
    pub fn context(&self) -> ContextMask {
        self.context
    }

    /// The dependency, if any.
    #[must_use]
    pub fn requires(&self) -> Option<&Requirement> {
        self.requires.as_ref()
    }
}
