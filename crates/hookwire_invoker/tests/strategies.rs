//! Initialization strategies.


use hookwire_bus::{Bus, HookBus};
use hookwire_system::ConfigError;
use hookwire_system::reflection::{Call, ClassDef, HookDescriptor, Method};
use hookwire_system::spec::{HookSpec, InvokeMode, Strategy};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use test_utils::{Log, booting, entries, handler, invoker, log, probe, recording_action};

// ═══════════════════════════════════════════════════════════════════════════════
// UNGATED STRATEGIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn early_ignores_can_initialize() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Early", handler(Strategy::Early, "init"), &log)
        .with_can_initialize(|| false)
        .with_method(recording_action("boot", "wp_loaded", "boot"))
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Early").unwrap();

    assert!(invoker.handler("site::Early").unwrap().is_initialized());
    assert!(invoker.hooks_for("site::Early", "boot")[0].is_invoked());
    assert!(bus.registrations_for("init").is_empty());
}

#[test]
fn unconditionally_ignores_can_register() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Always", handler(Strategy::Unconditionally, ""), &log)
        .with_can_register(|| false)
        .with_method(recording_action("boot", "wp_loaded", "boot"))
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Always").unwrap();
    bus.do_action("wp_loaded", &[]);

    assert_eq!(entries(&log), ["new", "boot"]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFERRED
// ═══════════════════════════════════════════════════════════════════════════════

/// Deferred handlers initialize in ascending priority of their trigger,
/// regardless of registration order.
#[test]
fn deferred_handlers_follow_trigger_priority() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let late = probe(
        "site::Late",
        handler(Strategy::Deferred, "init").with_priority(20),
        &log,
    )
    .with_on_initialize(|this| this.record("ready:late"))
    .build()
    .unwrap();
    let soon = probe(
        "site::Soon",
        handler(Strategy::Deferred, "init").with_priority(5),
        &log,
    )
    .with_on_initialize(|this| this.record("ready:soon"))
    .build()
    .unwrap();
    let invoker = invoker(&bus)
        .with_class(late)
        .with_class(soon)
        .build()
        .unwrap();

    invoker
        .register_handlers(["site::Late", "site::Soon"])
        .unwrap();
    let priorities: Vec<_> = bus
        .registrations_for("init")
        .into_iter()
        .map(|registration| registration.priority)
        .collect();
    assert_eq!(priorities, [20, 5]);

    bus.do_action("init", &[]);

    assert_eq!(entries(&log), ["new", "ready:soon", "new", "ready:late"]);
}

#[test]
fn deferred_respects_can_initialize() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Never", handler(Strategy::Deferred, "init"), &log)
        .with_can_initialize(|| false)
        .with_method(recording_action("boot", "wp_loaded", "boot"))
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Never").unwrap();
    bus.do_action("init", &[]);
    bus.do_action("wp_loaded", &[]);

    assert!(!invoker.handler("site::Never").unwrap().is_initialized());
    assert!(invoker.hooks("site::Never").is_empty());
    assert!(entries(&log).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// LAZY STRATEGIES
// ═══════════════════════════════════════════════════════════════════════════════

/// `OnDemand` wires its hooks when the handler tag fires, and creates the
/// instance the first time one of them runs.
#[test]
fn on_demand_initializes_once_on_first_hook() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let invoker = invoker(&bus)
        .with_class(booting("site::Lazy", Strategy::OnDemand, &log))
        .build()
        .unwrap();

    invoker.register_handler("site::Lazy").unwrap();
    assert!(invoker.hooks("site::Lazy").is_empty());

    bus.do_action("init", &[]);

    let entry = invoker.handler("site::Lazy").unwrap();
    let hooks = invoker.hooks_for("site::Lazy", "boot");
    assert!(hooks[0].is_invoked());
    assert_eq!(hooks[0].mode(), InvokeMode::Indirectly);
    assert!(!entry.is_initialized());

    bus.do_action("wp_loaded", &[]);
    bus.do_action("wp_loaded", &[]);

    assert!(entry.is_initialized());
    assert_eq!(entries(&log), ["new", "boot", "boot"]);
}

/// `JustInTime` re-checks the initialization gate on every call, and
/// declined filter calls hand back the value they were given.
#[test]
fn just_in_time_rechecks_gate_per_call() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let open = Arc::new(AtomicBool::new(false));
    let gate = Arc::clone(&open);
    let class = probe("site::Jit", handler(Strategy::JustInTime, "init"), &log)
        .with_can_initialize(move || gate.load(Ordering::SeqCst))
        .with_method(
            Method::new("shout", |_: &test_utils::Probe, call: Call<'_>| {
                Value::from(call.value().as_str().unwrap_or_default().to_uppercase())
            })
            .with_params(1)
            .with_hook(HookSpec::filter("the_content")),
        )
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Jit").unwrap();
    let entry = invoker.handler("site::Jit").unwrap();
    assert!(invoker.hooks_for("site::Jit", "shout")[0].is_invoked());
    assert!(!entry.is_initialized());

    assert_eq!(bus.apply_filters("the_content", json!("hi"), &[]), json!("hi"));
    assert!(!entry.is_initialized());

    open.store(true, Ordering::SeqCst);
    assert_eq!(bus.apply_filters("the_content", json!("hi"), &[]), json!("HI"));
    assert!(entry.is_initialized());

    open.store(false, Ordering::SeqCst);
    assert_eq!(bus.apply_filters("the_content", json!("hi"), &[]), json!("hi"));
    assert_eq!(entries(&log), ["new"]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DYNAMICALLY
// ═══════════════════════════════════════════════════════════════════════════════

struct Widget {
    id: u32,
    log: Log,
}

fn widget_class() -> ClassDef {
    ClassDef::builder::<Widget>("site::Widget")
        .with_handler(handler(Strategy::Dynamically, ""))
        .with_method(
            Method::new("render", |this: &Widget, _: Call<'_>| {
                this.log.lock().unwrap().push(format!("render:{}", this.id));
                Value::Null
            })
            .with_hook(HookSpec::action("wp_footer")),
        )
        .build()
        .unwrap()
}

#[test]
fn dynamically_waits_for_load_handler() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let invoker = invoker(&bus).with_class(widget_class()).build().unwrap();

    invoker.register_handler("site::Widget").unwrap();
    assert!(!invoker.handler("site::Widget").unwrap().is_initialized());
    assert!(invoker.hooks("site::Widget").is_empty());

    invoker
        .load_handler(Arc::new(Widget {
            id: 1,
            log: Arc::clone(&log),
        }))
        .unwrap();
    invoker
        .load_handler(Arc::new(Widget {
            id: 2,
            log: Arc::clone(&log),
        }))
        .unwrap();

    let entry = invoker.handler("site::Widget").unwrap();
    let loaded = entry.target().unwrap().downcast_ref::<Widget>().unwrap();
    assert_eq!(loaded.id, 1);
    assert_eq!(bus.callback_count("wp_footer"), 1);

    bus.do_action("wp_footer", &[]);
    assert_eq!(entries(&log), ["render:1"]);
}

#[test]
fn load_handler_registers_class_on_the_fly() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let invoker = invoker(&bus).with_class(widget_class()).build().unwrap();

    invoker
        .load_handler(Arc::new(Widget {
            id: 7,
            log: Arc::clone(&log),
        }))
        .unwrap();
    bus.do_action("wp_footer", &[]);

    assert_eq!(entries(&log), ["render:7"]);
}

#[test]
fn load_handler_rejects_other_strategies() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let invoker = invoker(&bus)
        .with_class(booting("site::Boot", Strategy::Immediately, &log))
        .build()
        .unwrap();

    let err = invoker
        .load_handler(Arc::new(test_utils::Probe {
            log: Arc::clone(&log),
        }))
        .unwrap_err();

    assert_eq!(
        err,
        ConfigError::NotDynamic {
            classname: "site::Boot".into(),
            strategy: Strategy::Immediately,
        }
    );
}

#[test]
fn load_handler_needs_declared_type() {
    struct Stranger;

    let bus = Arc::new(HookBus::new());
    let invoker = invoker(&bus).build().unwrap();

    let err = invoker.load_handler(Arc::new(Stranger)).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownClass(name) if name.contains("Stranger")));
}
