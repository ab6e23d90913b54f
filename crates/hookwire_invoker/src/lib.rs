//! Handler registration and hook dispatch (Layer 2).
//!
//! `hookwire_invoker` turns declared handler classes into live bus
//! callbacks:
//!
//! - [`Invoker`] - the registry and dispatcher
//! - [`config`] - [`InvokerConfig`] and [`RequestParams`]
//! - [`killswitch`] - request-level suppression of hooks
//! - [`registry`] - handler and hook entries, and serializable snapshots
//! - [`debug`] - the built-in diagnostics handler
//!
//! # Strategies
//!
//! | Strategy | Instance created | Hooks wired |
//! |---|---|---|
//! | `Immediately` | at registration, gated | right after |
//! | `Early` | at registration | right after |
//! | `Deferred` | when the handler tag fires, gated | right after |
//! | `OnDemand` | when one of its hooks first fires | when the handler tag fires |
//! | `JustInTime` | inside each hook callback, re-checked per call | at registration |
//! | `Dynamically` | by the caller ([`Invoker::load_handler`]) | on load |
//! | `Unconditionally` | at registration, no gating | right after |

pub mod config;
pub mod debug;
mod invoker;
pub mod killswitch;
pub mod registry;

pub use config::{InvokerConfig, RequestParams};
pub use invoker::{HookTable, Invoker, InvokerBuilder};
pub use killswitch::KillSwitch;
pub use registry::{HandlerEntry, HookEntry, RegistrySnapshot};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{InvokerConfig, RequestParams};
    pub use crate::invoker::{HookTable, Invoker, InvokerBuilder};
    pub use crate::killswitch::KillSwitch;
    pub use crate::registry::{HandlerEntry, HookEntry, RegistrySnapshot};
}
