//! Configuration errors.
//!
//! Every variant describes a programmer error: a declaration that can never
//! be satisfied, or a lookup for something that was never declared. Gating
//! outcomes (context mismatch, unmet dependency, failed predicate) are not
//! errors and never surface here.

use crate::spec::Strategy;
use thiserror::Error;

/// Errors raised when handler or hook metadata is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The introspection target does not name a declared class, method or function.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The strategy needs a trigger tag but none was given.
    #[error("strategy {strategy:?} requires a tag")]
    TagRequired {
        /// The offending strategy.
        strategy: Strategy,
    },

    /// The strategy forbids a trigger tag but one was given.
    #[error("strategy {strategy:?} does not accept a tag, got '{tag}'")]
    TagForbidden {
        /// The offending strategy.
        strategy: Strategy,
        /// The tag that was supplied.
        tag: String,
    },

    /// A hook was declared with an empty tag.
    #[error("hook on '{method}' has an empty tag")]
    MissingHookTag {
        /// The method the hook was declared on.
        method: String,
    },

    /// The tag template has more placeholders than modifiers were supplied.
    #[error("tag template '{template}' needs {expected} modifier(s), got {given}")]
    TagInterpolation {
        /// The raw tag template.
        template: String,
        /// Number of modifiers the template refers to.
        expected: usize,
        /// Number of modifiers supplied.
        given: usize,
    },

    /// The class carries no handler metadata.
    #[error("class '{0}' has no handler metadata")]
    MissingHandlerSpec(String),

    /// The handler must be constructed by the engine but declares no way to do so.
    #[error("class '{0}' declares neither a constructor nor a singleton factory")]
    MissingConstructor(String),

    /// A class with this name is already in the catalog.
    #[error("class '{0}' is already declared")]
    DuplicateClass(String),

    /// No class with this name is in the catalog.
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    /// An instance was handed to the engine for a class that does not use
    /// [`Strategy::Dynamically`].
    #[error("class '{classname}' uses strategy {strategy:?}, instances can only be loaded for Dynamically")]
    NotDynamic {
        /// The class name.
        classname: String,
        /// The strategy the class actually declares.
        strategy: Strategy,
    },
}
