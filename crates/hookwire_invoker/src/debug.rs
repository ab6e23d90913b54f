//! Built-in diagnostics handler.
//!
//! Lives in [`DEBUG_NAMESPACE`](crate::killswitch::DEBUG_NAMESPACE), so the
//! kill-switch never suppresses it and the registry stays inspectable while
//! every other hook is off.

use crate::invoker::Invoker;
use hookwire_system::ConfigError;
use hookwire_system::context::ContextMask;
use hookwire_system::reflection::{Call, ClassDef, Method};
use hookwire_system::spec::{HandlerSpec, HookSpec};
use serde_json::{Value, json};
use std::sync::{Arc, Weak};

/// Class name of the diagnostics handler.
pub const DEBUG_HANDLER: &str = "hookwire::debug::DebugHandler";

/// Tag the diagnostics handler initializes on.
pub const LOADED_TAG: &str = "hookwire_loaded";

/// Filter collecting diagnostics panels.
pub const PANELS_TAG: &str = "debug_panels";

/// Filter collecting status rows.
pub const STATUSES_TAG: &str = "debug_statuses";

/// Adds registry panels and the execution-context status row.
pub struct DebugHandler {
    invoker: Weak<Invoker>,
}

impl DebugHandler {
    fn add_panel(&self, call: Call<'_>) -> Value {
        let mut panels = into_list(call.value());
        if let Some(invoker) = self.invoker.upgrade() {
            let snapshot = serde_json::to_value(invoker.snapshot()).unwrap_or(Value::Null);
            panels.push(json!({ "title": "Hook Invoker", "registry": snapshot }));
        }
        Value::Array(panels)
    }

    fn add_status(&self, call: Call<'_>) -> Value {
        let mut statuses = into_list(call.value());
        if let Some(invoker) = self.invoker.upgrade() {
            statuses.push(json!([
                "execution_ctx",
                "Execution Context",
                invoker.context().display_name(),
            ]));
        }
        Value::Array(statuses)
    }
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Declares and registers the diagnostics handler on `invoker`.
pub(crate) fn install(invoker: &Arc<Invoker>) -> Result<(), ConfigError> {
    let weak = Arc::downgrade(invoker);
    let debug = invoker.config().is_debug();

    let class = ClassDef::builder::<DebugHandler>(DEBUG_HANDLER)
        .with_handler(
            HandlerSpec::builder()
                .with_tag(LOADED_TAG)
                .with_context(ContextMask::GLOBAL - ContextMask::CLI - ContextMask::REST),
        )
        .with_constructor(move || DebugHandler {
            invoker: Weak::clone(&weak),
        })
        .with_can_initialize(move || debug)
        .with_method(
            Method::new("add_panel", DebugHandler::add_panel)
                .with_params(1)
                .with_hook(HookSpec::filter(PANELS_TAG)),
        )
        .with_method(
            Method::new("add_status", DebugHandler::add_status)
                .with_params(1)
                .with_hook(HookSpec::filter(STATUSES_TAG).with_priority(999)),
        )
        .build()?;

    invoker.define(class)?;
    invoker.register_handler(DEBUG_HANDLER)
}
