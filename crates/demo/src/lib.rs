//! A small site built from hookwire handlers.
//!
//! Each handler uses a different initialization strategy:
//!
//! ```text
//! init ─────────┬─▶ Seo (Deferred, priority 5)
//!               └─▶ AdminNotices (Deferred, admin only)
//! wp_loaded ────────▶ Analytics hooks wired (OnDemand)
//! registration ─┬─▶ Assets (Immediately)
//!               └─▶ Maintenance hooks wired (JustInTime)
//! caller ───────────▶ Widget (Dynamically)
//! ```
//!
//! Everything the handlers do is written to a shared [`Journal`].

mod handlers;

pub use handlers::{Analytics, Assets, Maintenance, Seo, Widget};

use hookwire_system::ConfigError;
use hookwire_system::reflection::{ClassDef, FunctionDef};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handlers registered at startup, in order.
pub const HANDLERS: &[&str] = &[
    handlers::ASSETS,
    handlers::SEO,
    handlers::ADMIN_NOTICES,
    handlers::ANALYTICS,
    handlers::MAINTENANCE,
    handlers::WIDGET,
];

/// Free functions with hooks.
pub const FUNCTIONS: &[&str] = &[handlers::FOOTER_CREDIT];

/// Append-only record of handler activity.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    /// Appends an entry.
    pub fn write(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    /// All entries so far.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Shared state of the site.
#[derive(Debug, Clone, Default)]
pub struct Site {
    /// Where handlers record what they did.
    pub journal: Journal,
    maintenance: Arc<AtomicBool>,
}

impl Site {
    /// A site with an empty journal and maintenance mode off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns maintenance mode on or off. Read by [`Maintenance`] on every
    /// content filter call.
    pub fn set_maintenance(&self, on: bool) {
        self.maintenance.store(on, Ordering::SeqCst);
    }

    /// Declarations of every handler class.
    ///
    /// # Errors
    ///
    /// Returns an error if a declaration is misconfigured.
    pub fn classes(&self) -> Result<Vec<ClassDef>, ConfigError> {
        Ok(vec![
            handlers::assets(&self.journal)?,
            handlers::seo(&self.journal)?,
            handlers::admin_notices(&self.journal)?,
            handlers::analytics(&self.journal)?,
            handlers::maintenance(&self.journal, Arc::clone(&self.maintenance))?,
            handlers::widget()?,
        ])
    }

    /// Declarations of every free function.
    ///
    /// # Errors
    ///
    /// Returns an error if a hook is misconfigured.
    pub fn functions(&self) -> Result<Vec<FunctionDef>, ConfigError> {
        Ok(vec![handlers::footer_credit()?])
    }
}
