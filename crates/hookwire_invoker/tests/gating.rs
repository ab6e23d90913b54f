//! Context, dependency and predicate gates.


use hookwire_bus::{Bus, HookBus};
use hookwire_system::context::{Context, ContextMask};
use hookwire_system::reflection::{Call, ClassDef, HookDescriptor, Method};
use hookwire_system::spec::{HookSpec, InvokeMode, Requirement, Strategy};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use test_utils::{Log, booting, entries, handler, invoker, log, probe, recording_action};

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn handler_outside_context_never_initializes() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe(
        "site::AdminOnly",
        handler(Strategy::Immediately, "init").with_context(ContextMask::ADMIN),
        &log,
    )
    .with_method(recording_action("boot", "wp_loaded", "boot"))
    .build()
    .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::AdminOnly").unwrap();

    assert!(!invoker.handler("site::AdminOnly").unwrap().is_initialized());
    assert!(entries(&log).is_empty());
}

#[test]
fn deferred_outside_context_registers_no_trigger() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe(
        "site::AdminOnly",
        handler(Strategy::Deferred, "init").with_context(ContextMask::ADMIN | ContextMask::AJAX),
        &log,
    )
    .build()
    .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::AdminOnly").unwrap();

    assert_eq!(bus.callback_count("init"), 0);
}

#[test]
fn hook_context_is_checked_separately() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Mixed", handler(Strategy::Immediately, "init"), &log)
        .with_method(recording_action("everywhere", "wp_loaded", "everywhere"))
        .with_method(
            Method::new("admin", |this: &test_utils::Probe, _: Call<'_>| {
                this.record("admin");
                Value::Null
            })
            .with_hook(HookSpec::action("wp_loaded").with_context(ContextMask::ADMIN)),
        )
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Mixed").unwrap();
    bus.do_action("wp_loaded", &[]);

    assert!(invoker.hooks_for("site::Mixed", "everywhere")[0].is_invoked());
    assert!(!invoker.hooks_for("site::Mixed", "admin")[0].is_invoked());
    assert_eq!(entries(&log), ["new", "everywhere"]);
}

#[test]
fn same_handler_runs_in_matching_context() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe(
        "site::AdminOnly",
        handler(Strategy::Immediately, "init").with_context(ContextMask::ADMIN),
        &log,
    )
    .build()
    .unwrap();
    let invoker = invoker(&bus)
        .with_context(Context::Admin)
        .with_class(class)
        .build()
        .unwrap();

    invoker.register_handler("site::AdminOnly").unwrap();

    assert!(invoker.handler("site::AdminOnly").unwrap().is_initialized());
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEPENDENCIES
// ═══════════════════════════════════════════════════════════════════════════════

fn dependent(name: &str, requires: Requirement, log: &Log) -> ClassDef {
    probe(
        name,
        handler(Strategy::Immediately, "init").with_requires(requires),
        log,
    )
    .build()
    .unwrap()
}

#[test]
fn handler_dependency_must_be_initialized_first() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let invoker = invoker(&bus)
        .with_class(booting("site::Base", Strategy::Immediately, &log))
        .with_class(dependent("site::After", Requirement::handler("site::Base"), &log))
        .with_class(dependent("site::Before", Requirement::handler("site::Base"), &log))
        .build()
        .unwrap();

    invoker.register_handler("site::Before").unwrap();
    invoker.register_handler("site::Base").unwrap();
    invoker.register_handler("site::After").unwrap();

    assert!(!invoker.handler("site::Before").unwrap().is_initialized());
    assert!(invoker.handler("site::After").unwrap().is_initialized());
}

#[test]
fn hook_dependency_needs_every_hook_invoked() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let invoker = invoker(&bus)
        .with_class(booting("site::Base", Strategy::Deferred, &log))
        .with_class(dependent(
            "site::Early",
            Requirement::hook("site::Base", "boot"),
            &log,
        ))
        .with_class(dependent(
            "site::Late",
            Requirement::hook("site::Base", "boot"),
            &log,
        ))
        .build()
        .unwrap();

    invoker.register_handler("site::Base").unwrap();
    invoker.register_handler("site::Early").unwrap();
    bus.do_action("init", &[]);
    invoker.register_handler("site::Late").unwrap();

    assert!(!invoker.handler("site::Early").unwrap().is_initialized());
    assert!(invoker.handler("site::Late").unwrap().is_initialized());
}

#[test]
fn hook_requirement_on_hook_gates_wiring() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Chained", handler(Strategy::Immediately, "init"), &log)
        .with_method(
            recording_action("second", "wp_loaded", "second")
                .with_hook(
                    HookSpec::action("shutdown")
                        .with_requires(Requirement::handler("site::Missing")),
                ),
        )
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Chained").unwrap();

    let hooks = invoker.hooks_for("site::Chained", "second");
    assert_eq!(hooks.len(), 2);
    assert!(hooks[0].is_invoked());
    assert!(!hooks[1].is_invoked());
    assert_eq!(bus.callback_count("shutdown"), 0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONDITIONALS AND PREDICATES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn handler_conditional_blocks_initialization() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe(
        "site::Off",
        handler(Strategy::Immediately, "init").with_conditional(|spec| spec.tag() != "init"),
        &log,
    )
    .build()
    .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Off").unwrap();

    assert!(!invoker.handler("site::Off").unwrap().is_initialized());
}

#[test]
fn hook_conditional_blocks_direct_wiring() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Cond", handler(Strategy::Immediately, "init"), &log)
        .with_method(
            Method::new("never", |_: &test_utils::Probe, _: Call<'_>| Value::Null)
                .with_hook(HookSpec::action("wp_loaded").with_conditional(|_| false)),
        )
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Cond").unwrap();

    assert!(invoker.handler("site::Cond").unwrap().is_initialized());
    assert!(!invoker.hooks_for("site::Cond", "never")[0].is_invoked());
}

#[test]
fn can_register_false_skips_construction() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Refused", handler(Strategy::Immediately, "init"), &log)
        .with_can_register(|| false)
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Refused").unwrap();

    assert!(invoker.handler("site::Refused").is_some());
    assert!(entries(&log).is_empty());
}

#[test]
fn can_invoke_false_leaves_direct_hooks_unwired() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Shy", handler(Strategy::Immediately, "init"), &log)
        .with_can_invoke(|_| false)
        .with_method(recording_action("boot", "wp_loaded", "boot"))
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Shy").unwrap();

    assert!(invoker.handler("site::Shy").unwrap().is_initialized());
    assert_eq!(bus.callback_count("wp_loaded"), 0);
}

/// Indirect hooks are wired before the handler can answer `can_invoke`,
/// so the predicate is asked again on every call.
#[test]
fn can_invoke_is_rechecked_for_indirect_calls() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let allowed = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&allowed);
    let class = probe("site::Shy", handler(Strategy::Immediately, "init"), &log)
        .with_can_invoke(move |_| flag.load(Ordering::SeqCst))
        .with_method(
            Method::new("boot", |this: &test_utils::Probe, _: Call<'_>| {
                this.record("boot");
                Value::Null
            })
            .with_hook(HookSpec::action("wp_loaded").with_invoke(InvokeMode::Indirectly)),
        )
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Shy").unwrap();
    bus.do_action("wp_loaded", &[]);
    allowed.store(false, Ordering::SeqCst);
    bus.do_action("wp_loaded", &[]);

    assert_eq!(entries(&log), ["new", "boot"]);
}

#[test]
fn method_predicate_sees_hook_and_arguments() {
    let bus = Arc::new(HookBus::new());
    let log = log();
    let class = probe("site::Picky", handler(Strategy::Immediately, "init"), &log)
        .with_can_invoke_method("tag_post", |_, hook, args| {
            hook.tag() == "the_title" && args.first() != Some(&json!("skip"))
        })
        .with_method(
            Method::new("tag_post", |_: &test_utils::Probe, call: Call<'_>| {
                Value::from(format!("[{}]", call.value().as_str().unwrap_or_default()))
            })
            .with_params(1)
            .with_hook(HookSpec::filter("the_title").with_invoke(InvokeMode::Indirectly)),
        )
        .build()
        .unwrap();
    let invoker = invoker(&bus).with_class(class).build().unwrap();

    invoker.register_handler("site::Picky").unwrap();

    assert_eq!(bus.apply_filters("the_title", json!("post"), &[]), json!("[post]"));
    assert_eq!(bus.apply_filters("the_title", json!("skip"), &[]), json!("skip"));
}
