//! Execution context classification.
//!
//! Exactly one [`Context`] is active per run. Handlers and hooks declare the
//! contexts they may activate in as a [`ContextMask`]; activation requires the
//! active context's bit to intersect that mask.
//!
//! # Example
//!
//! ```
//! use hookwire_system::context::{Context, ContextMask};
//!
//! let mask = ContextMask::GLOBAL - ContextMask::CLI - ContextMask::REST;
//!
//! assert!(Context::Admin.is_valid(mask));
//! assert!(!Context::Cli.is_valid(mask));
//! ```

use crate::constants::Constants;
use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Set of contexts a handler or hook may activate in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ContextMask: u8 {
        /// Public-facing requests.
        const FRONTEND = 1;
        /// Administrative screens.
        const ADMIN = 1 << 1;
        /// Asynchronous background requests.
        const AJAX = 1 << 2;
        /// Scheduled background execution.
        const CRON = 1 << 3;
        /// API requests.
        const REST = 1 << 4;
        /// Command-line invocations.
        const CLI = 1 << 5;
        /// Every context.
        const GLOBAL = Self::FRONTEND.bits()
            | Self::ADMIN.bits()
            | Self::AJAX.bits()
            | Self::CRON.bits()
            | Self::REST.bits()
            | Self::CLI.bits();
    }
}

impl Default for ContextMask {
    fn default() -> Self {
        Self::GLOBAL
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// The execution environment of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Context {
    /// Public-facing request. Fallback when nothing else matches.
    Frontend,
    /// Administrative screen.
    Admin,
    /// Asynchronous background request.
    Ajax,
    /// Scheduled background execution.
    Cron,
    /// API request.
    #[serde(rename = "REST")]
    Rest,
    /// Command-line invocation.
    #[serde(rename = "CLI")]
    Cli,
}

impl Context {
    /// All contexts, in bit order.
    pub const ALL: [Context; 6] = [
        Context::Frontend,
        Context::Admin,
        Context::Ajax,
        Context::Cron,
        Context::Rest,
        Context::Cli,
    ];

    /// Returns the single bit representing this context.
    #[must_use]
    pub fn bit(self) -> ContextMask {
        match self {
            Context::Frontend => ContextMask::FRONTEND,
            Context::Admin => ContextMask::ADMIN,
            Context::Ajax => ContextMask::AJAX,
            Context::Cron => ContextMask::CRON,
            Context::Rest => ContextMask::REST,
            Context::Cli => ContextMask::CLI,
        }
    }

    /// Returns true if this context is a member of `mask`.
    #[must_use]
    pub fn is_valid(self, mask: ContextMask) -> bool {
        self.bit().intersects(mask)
    }

    /// Human-readable name, used by diagnostics.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Context::Frontend => "Frontend",
            Context::Admin => "Admin",
            Context::Ajax => "Ajax",
            Context::Cron => "Cron",
            Context::Rest => "REST",
            Context::Cli => "CLI",
        }
    }
}

impl core::fmt::Display for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContextProvider
// ─────────────────────────────────────────────────────────────────────────────

/// Source of the active context.
///
/// Consumed once when the invoker is built; the result is cached for the
/// remainder of the run.
pub trait ContextProvider {
    /// Classifies the current environment.
    fn context(&self) -> Context;
}

/// A fixed context classifies as itself.
impl ContextProvider for Context {
    fn context(&self) -> Context {
        *self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContextSignals
// ─────────────────────────────────────────────────────────────────────────────

/// Default URL prefix identifying API requests.
pub const DEFAULT_REST_PREFIX: &str = "api";

/// Raw environment signals used to classify the active [`Context`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSignals {
    /// The request targets an administrative screen.
    pub admin: bool,
    /// The request is an asynchronous background request.
    pub ajax: bool,
    /// The run is a scheduled background execution.
    pub cron: bool,
    /// The run is a command-line invocation.
    pub cli: bool,
    /// Path of the current request.
    pub request_uri: String,
    /// URL prefix identifying API requests.
    pub rest_prefix: String,
}

impl ContextSignals {
    /// Reads signals from environment constants.
    ///
    /// | Constant | Signal |
    /// |----------|--------|
    /// | `IS_ADMIN` | `admin` |
    /// | `DOING_AJAX` | `ajax` |
    /// | `DOING_CRON` | `cron` |
    /// | `HOOKWIRE_CLI` | `cli` |
    /// | `REQUEST_URI` | `request_uri` |
    /// | `REST_URL_PREFIX` | `rest_prefix` (default [`DEFAULT_REST_PREFIX`]) |
    #[must_use]
    pub fn from_constants(constants: &Constants) -> Self {
        Self {
            admin: constants.is_true("IS_ADMIN"),
            ajax: constants.is_true("DOING_AJAX"),
            cron: constants.is_true("DOING_CRON"),
            cli: constants.is_true("HOOKWIRE_CLI"),
            request_uri: constants.get("REQUEST_URI").unwrap_or_default().to_string(),
            rest_prefix: constants
                .get("REST_URL_PREFIX")
                .unwrap_or(DEFAULT_REST_PREFIX)
                .to_string(),
        }
    }

    fn is_admin(&self) -> bool {
        self.admin && !self.ajax
    }

    fn is_rest(&self) -> bool {
        let prefix = self.rest_prefix.trim_matches('/');
        if prefix.is_empty() {
            return false;
        }

        self.request_uri.contains(&format!("/{prefix}/"))
    }
}

impl ContextProvider for ContextSignals {
    fn context(&self) -> Context {
        if self.is_admin() {
            Context::Admin
        } else if self.ajax {
            Context::Ajax
        } else if self.cron {
            Context::Cron
        } else if self.is_rest() {
            Context::Rest
        } else if self.cli {
            Context::Cli
        } else {
            Context::Frontend
        }
    }
}
