//! In-memory synchronous hook bus.

use super::{Bus, Callback};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::HashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// One `register` call, as recorded by [`HookBus::registrations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The tag registered on.
    pub tag: String,
    /// The priority passed along.
    pub priority: i32,
    /// The accepted argument count passed along.
    pub accepted_args: usize,
}

/// Entry in the callback table.
struct Entry {
    priority: i32,
    /// Registration sequence. Breaks priority ties in registration order.
    seq: u64,
    accepted_args: usize,
    callback: Callback,
}

impl Entry {
    fn slot(&self) -> (i32, u64) {
        (self.priority, self.seq)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookBus
// ─────────────────────────────────────────────────────────────────────────────

/// A synchronous bus with actions and filters.
///
/// Callbacks run in ascending priority, ties in registration order. The
/// callback table is never locked while a callback runs, so callbacks may
/// register further callbacks. A callback added during a firing runs in the
/// same firing if its slot comes after the one currently running.
///
/// # Thread Safety
///
/// Interior mutability via [`RwLock`] and [`Mutex`]. Firing the same tag from
/// several threads at once is allowed but `is_firing` then reports the union.
#[derive(Default)]
pub struct HookBus {
    /// Tag to entries, kept sorted by slot.
    hooks: RwLock<HashMap<String, Vec<Entry>>>,
    /// Tags currently being fired, innermost last.
    firing: Mutex<Vec<String>>,
    /// Times each tag has been fired.
    fired: Mutex<HashMap<String, usize>>,
    /// Every `register` call in order.
    log: Mutex<Vec<Registration>>,
    next_seq: AtomicU64,
}

impl fmt::Debug for HookBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBus")
            .field("tags", &self.hooks.read().len())
            .field("firing", &*self.firing.lock())
            .finish_non_exhaustive()
    }
}

impl HookBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the actions on `tag`.
    pub fn do_action(&self, tag: &str, args: &[Value]) {
        self.dispatch(tag, None, args);
    }

    /// Number of callbacks registered on `tag`.
    #[must_use]
    pub fn callback_count(&self, tag: &str) -> usize {
        self.hooks.read().get(tag).map_or(0, Vec::len)
    }

    /// Returns true if anything is registered on `tag`.
    #[must_use]
    pub fn has_callbacks(&self, tag: &str) -> bool {
        self.callback_count(tag) > 0
    }

    /// Number of times `tag` has been fired.
    #[must_use]
    pub fn fired_count(&self, tag: &str) -> usize {
        self.fired.lock().get(tag).copied().unwrap_or_default()
    }

    /// Every `register` call so far, in order.
    #[must_use]
    pub fn registrations(&self) -> Vec<Registration> {
        self.log.lock().clone()
    }

    /// The `register` calls made for `tag`, in order.
    #[must_use]
    pub fn registrations_for(&self, tag: &str) -> Vec<Registration> {
        self.log
            .lock()
            .iter()
            .filter(|registration| registration.tag == tag)
            .cloned()
            .collect()
    }

    /// Runs every callback on `tag`. `value` is `Some` for filters.
    fn dispatch(&self, tag: &str, mut value: Option<Value>, args: &[Value]) -> Option<Value> {
        *self.fired.lock().entry_ref(tag).or_insert(0) += 1;
        self.firing.lock().push(tag.to_string());
        tracing::trace!(tag, filter = value.is_some(), "firing");

        let mut cursor: Option<(i32, u64)> = None;
        while let Some((slot, accepted, callback)) = self.next_after(tag, cursor) {
            cursor = Some(slot);

            let mut call_args = Vec::with_capacity(args.len() + 1);
            if let Some(current) = &value {
                call_args.push(current.clone());
            }
            call_args.extend_from_slice(args);
            call_args.truncate(accepted);

            let result = callback(&call_args);
            if value.is_some() {
                value = Some(result);
            }
        }

        let mut firing = self.firing.lock();
        if let Some(position) = firing.iter().rposition(|current| current == tag) {
            firing.remove(position);
        }

        value
    }

    /// The first entry on `tag` whose slot comes after `cursor`.
    fn next_after(
        &self,
        tag: &str,
        cursor: Option<(i32, u64)>,
    ) -> Option<((i32, u64), usize, Callback)> {
        let hooks = self.hooks.read();
        hooks
            .get(tag)?
            .iter()
            .find(|entry| cursor.is_none_or(|cursor| entry.slot() > cursor))
            .map(|entry| (entry.slot(), entry.accepted_args, Callback::clone(&entry.callback)))
    }
}

impl Bus for HookBus {
    fn register(&self, tag: &str, callback: Callback, priority: i32, accepted_args: usize) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            priority,
            seq,
            accepted_args,
            callback,
        };

        {
            let mut hooks = self.hooks.write();
            let entries = hooks.entry_ref(tag).or_default();
            let position = entries.partition_point(|existing| existing.slot() < entry.slot());
            entries.insert(position, entry);
        }

        self.log.lock().push(Registration {
            tag: tag.to_string(),
            priority,
            accepted_args,
        });
        tracing::trace!(tag, priority, accepted_args, "callback registered");
    }

    fn is_firing(&self, tag: &str) -> bool {
        self.firing.lock().iter().any(|current| current == tag)
    }

    fn apply_filters(&self, tag: &str, value: Value, args: &[Value]) -> Value {
        self.dispatch(tag, Some(value), args)
            .unwrap_or(Value::Null)
    }
}
