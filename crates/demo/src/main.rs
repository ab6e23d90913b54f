//! Runs one simulated request through the demo site.
//!
//! # Usage
//!
//! ```bash
//! site [area]
//! ```
//!
//! The request context and engine settings come from the environment
//! (a `.env` file is loaded first):
//!
//! ```bash
//! IS_ADMIN=1 HOOKWIRE_DEBUG=1 site sidebar
//! ```

use demo::{FUNCTIONS, HANDLERS, Site, Widget};
use hookwire_bus::{Bus, HookBus};
use hookwire_core::{TracingFormat, TracingSetup};
use hookwire_invoker::Invoker;
use hookwire_invoker::debug::{LOADED_TAG, PANELS_TAG};
use hookwire_system::ConfigError;
use hookwire_system::constants::Constants;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::Level;

fn main() -> Result<(), ConfigError> {
    let _ = dotenvy::dotenv();

    TracingSetup::new()
        .with_level(Level::DEBUG)
        .with_format(TracingFormat::Compact)
        .init();

    let area = std::env::args().nth(1).unwrap_or_else(|| "sidebar".to_string());
    let constants = Constants::from_env();
    let site = Site::new();

    let bus = Arc::new(HookBus::new());
    let mut builder = Invoker::builder(bus.clone()).with_constants(constants);
    for class in site.classes()? {
        builder = builder.with_class(class);
    }
    let invoker = builder.build()?;
    for function in site.functions()? {
        invoker.reflection().define_function(function);
    }

    invoker.register_handlers(HANDLERS)?;
    for function in FUNCTIONS {
        invoker.register_function(function)?;
    }

    // A request, front to back.
    bus.do_action("init", &[]);
    bus.do_action("wp_loaded", &[]);
    bus.do_action(LOADED_TAG, &[]);
    bus.do_action("wp_enqueue_scripts", &[]);
    bus.do_action("admin_notices", &[]);

    let title = bus.apply_filters("document_title", json!("Home"), &[json!("|")]);
    let content = bus.apply_filters("the_content", json!("Welcome!"), &[]);
    site.set_maintenance(true);
    let maintenance = bus.apply_filters("the_content", json!("Welcome!"), &[]);
    site.set_maintenance(false);

    invoker.load_handler(Arc::new(Widget::new(area, site.journal.clone())))?;
    bus.do_action("wp_footer", &[]);
    let footer = bus.apply_filters("the_footer", json!("(c) 2026"), &[]);

    tracing::info!(context = %invoker.context(), %title, %content, %maintenance, %footer, "request done");
    for entry in site.journal.entries() {
        tracing::info!(%entry, "journal");
    }

    if invoker.config().is_debug() {
        let panels = bus.apply_filters(PANELS_TAG, Value::Null, &[]);
        tracing::info!(%panels, "diagnostics");
    }

    Ok(())
}
