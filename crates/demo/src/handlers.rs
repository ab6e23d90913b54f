//! Handler declarations.

use crate::Journal;
use hookwire_system::ConfigError;
use hookwire_system::context::ContextMask;
use hookwire_system::reflection::{Call, ClassDef, FunctionDef, Method};
use hookwire_system::spec::{HandlerSpec, HookSpec, InvokeMode, Strategy};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) const ASSETS: &str = "site::Assets";
pub(crate) const SEO: &str = "site::Seo";
pub(crate) const ADMIN_NOTICES: &str = "site::AdminNotices";
pub(crate) const ANALYTICS: &str = "site::Analytics";
pub(crate) const MAINTENANCE: &str = "site::Maintenance";
pub(crate) const WIDGET: &str = "site::Widget";
pub(crate) const FOOTER_CREDIT: &str = "footer_credit";

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Assets
// ─────────────────────────────────────────────────────────────────────────────

/// Enqueues the stylesheet. Created as soon as it is registered.
pub struct Assets {
    journal: Journal,
    stylesheet: &'static str,
}

impl Assets {
    fn enqueue(&self, _: Call<'_>) -> Value {
        self.journal.write(format!("assets: enqueued {}", self.stylesheet));
        Value::Null
    }
}

pub(crate) fn assets(journal: &Journal) -> Result<ClassDef, ConfigError> {
    let journal = journal.clone();
    ClassDef::builder::<Assets>(ASSETS)
        .with_handler(
            HandlerSpec::builder()
                .with_strategy(Strategy::Immediately)
                .with_tag("init"),
        )
        .with_constructor(move || Assets {
            journal: journal.clone(),
            stylesheet: "site.css",
        })
        .with_method(
            Method::new("enqueue", Assets::enqueue).with_hook(HookSpec::action("wp_enqueue_scripts")),
        )
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Seo
// ─────────────────────────────────────────────────────────────────────────────

/// Appends the site name to document titles.
pub struct Seo {
    journal: Journal,
    site_name: String,
}

impl Seo {
    /// `value, separator, hook`: the descriptor is appended by the engine.
    fn title(&self, call: Call<'_>) -> Value {
        let separator = call.arg(1).map_or("-", text);
        if let Some(hook) = call.hook {
            tracing::trace!(tag = hook.tag(), priority = ?hook.priority(), "seo title filter");
        }
        Value::from(format!("{} {separator} {}", text(&call.value()), self.site_name))
    }
}

pub(crate) fn seo(journal: &Journal) -> Result<ClassDef, ConfigError> {
    let journal = journal.clone();
    ClassDef::builder::<Seo>(SEO)
        .with_handler(HandlerSpec::builder().with_tag("init").with_priority(5))
        .with_constructor(move || Seo {
            journal: journal.clone(),
            site_name: "Demo Site".to_string(),
        })
        .with_on_initialize(|seo| seo.journal.write("seo: ready"))
        .with_method(
            Method::new("title", Seo::title)
                .with_params(3)
                .takes_hook()
                .with_hook(
                    HookSpec::filter("document_title")
                        .with_priority("SEO_TITLE_PRIORITY")
                        .with_invoke(InvokeMode::Indirectly),
                ),
        )
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// AdminNotices
// ─────────────────────────────────────────────────────────────────────────────

/// Shows pending notices in the admin area.
struct AdminNotices {
    journal: Journal,
    pending: usize,
}

impl AdminNotices {
    fn render(&self, _: Call<'_>) -> Value {
        self.journal.write(format!("notices: {} pending", self.pending));
        Value::Null
    }
}

pub(crate) fn admin_notices(journal: &Journal) -> Result<ClassDef, ConfigError> {
    let journal = journal.clone();
    ClassDef::builder::<AdminNotices>(ADMIN_NOTICES)
        .with_handler(
            HandlerSpec::builder()
                .with_tag("init")
                .with_context(ContextMask::ADMIN),
        )
        .with_constructor(move || AdminNotices {
            journal: journal.clone(),
            pending: 1,
        })
        .with_method(Method::new("render", AdminNotices::render).with_hook(HookSpec::action("admin_notices")))
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks page views. Only created if a tracked tag actually fires.
pub struct Analytics {
    journal: Journal,
}

impl Analytics {
    fn track(&self, call: Call<'_>) -> Value {
        let tag = call.hook.map_or("unknown", |hook| hook.tag());
        self.journal.write(format!("analytics: tracking {tag}"));
        Value::Null
    }
}

pub(crate) fn analytics(journal: &Journal) -> Result<ClassDef, ConfigError> {
    let journal = journal.clone();
    ClassDef::builder::<Analytics>(ANALYTICS)
        .with_handler(
            HandlerSpec::builder()
                .with_strategy(Strategy::OnDemand)
                .with_tag("wp_loaded")
                .with_context(ContextMask::FRONTEND),
        )
        .with_constructor(move || Analytics {
            journal: journal.clone(),
        })
        .with_method(
            Method::new("track", Analytics::track)
                .takes_hook()
                .with_hook(HookSpec::action("wp_footer")),
        )
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Maintenance
// ─────────────────────────────────────────────────────────────────────────────

/// Replaces page content while maintenance mode is on.
///
/// Checked on every content filter call, so the mode can be flipped at any
/// time during a request.
pub struct Maintenance {
    journal: Journal,
}

impl Maintenance {
    fn content(&self, _: Call<'_>) -> Value {
        Value::from("Down for maintenance.")
    }
}

pub(crate) fn maintenance(
    journal: &Journal,
    enabled: Arc<AtomicBool>,
) -> Result<ClassDef, ConfigError> {
    let journal = journal.clone();
    ClassDef::builder::<Maintenance>(MAINTENANCE)
        .with_handler(
            HandlerSpec::builder()
                .with_strategy(Strategy::JustInTime)
                .with_tag("init"),
        )
        .with_constructor(move || Maintenance {
            journal: journal.clone(),
        })
        .with_can_initialize(move || enabled.load(Ordering::SeqCst))
        .with_on_initialize(|maintenance| maintenance.journal.write("maintenance: on"))
        .with_method(
            Method::new("content", Maintenance::content)
                .with_params(1)
                .with_hook(HookSpec::filter("the_content").with_priority(1)),
        )
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget
// ─────────────────────────────────────────────────────────────────────────────

/// A widget placed by the caller. The engine never creates one itself.
pub struct Widget {
    area: String,
    journal: Journal,
}

impl Widget {
    /// A widget for `area`.
    pub fn new(area: impl Into<String>, journal: Journal) -> Self {
        Self {
            area: area.into(),
            journal,
        }
    }

    fn render(&self, _: Call<'_>) -> Value {
        self.journal.write(format!("widget[{}]: rendered", self.area));
        Value::Null
    }
}

pub(crate) fn widget() -> Result<ClassDef, ConfigError> {
    ClassDef::builder::<Widget>(WIDGET)
        .with_handler(HandlerSpec::builder().with_strategy(Strategy::Dynamically))
        .with_method(Method::new("render", Widget::render).with_hook(HookSpec::action("wp_footer")))
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Free functions
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn footer_credit() -> Result<FunctionDef, ConfigError> {
    FunctionDef::new(
        FOOTER_CREDIT,
        1,
        [HookSpec::filter("the_footer")],
        |call| Value::from(format!("{} · built with hookwire", text(&call.value()))),
    )
}
