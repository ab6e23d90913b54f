//! Property tests for dispatch order and indirect argument counts.


use hookwire_bus::HookBus;
use hookwire_system::reflection::{Call, Method};
use hookwire_system::spec::{HookSpec, InvokeMode, Strategy as InitStrategy};
use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use test_utils::{entries, handler, invoker, log, probe};

proptest! {
    /// Deferred handlers sharing a tag initialize in ascending priority,
    /// ties in registration order.
    #[test]
    fn deferred_initialization_follows_priority(priorities in prop::collection::vec(-50i32..50, 1..8)) {
        let bus = Arc::new(HookBus::new());
        let log = log();
        let mut builder = invoker(&bus);
        let mut names = Vec::new();
        for (index, priority) in priorities.iter().enumerate() {
            let name = format!("site::Handler{index}");
            let label = name.clone();
            builder = builder.with_class(
                probe(&name, handler(InitStrategy::Deferred, "init").with_priority(*priority), &log)
                    .with_on_initialize(move |this| this.record(label.clone()))
                    .build()
                    .unwrap(),
            );
            names.push(name);
        }
        let invoker = builder.build().unwrap();
        invoker.register_handlers(&names).unwrap();

        bus.do_action("init", &[]);

        let mut expected: Vec<_> = priorities.iter().copied().zip(names).collect();
        expected.sort_by_key(|(priority, _)| *priority);
        let ready: Vec<_> = entries(&log).into_iter().filter(|entry| entry != "new").collect();
        let expected: Vec<_> = expected.into_iter().map(|(_, name)| name).collect();
        prop_assert_eq!(ready, expected);
    }

    /// The bus is told one argument fewer than declared exactly when an
    /// indirect method takes the hook descriptor.
    #[test]
    fn accepted_args_account_for_descriptor(
        params in 0usize..6,
        indirect in any::<bool>(),
        takes_hook in any::<bool>(),
    ) {
        let bus = Arc::new(HookBus::new());
        let log = log();
        let mode = if indirect { InvokeMode::Indirectly } else { InvokeMode::Directly };
        let mut method = Method::new("run", |_: &test_utils::Probe, _: Call<'_>| Value::Null)
            .with_params(params)
            .with_hook(HookSpec::action("tick").with_invoke(mode));
        if takes_hook {
            method = method.takes_hook();
        }
        let class = probe("site::Ticker", handler(InitStrategy::Immediately, "init"), &log)
            .with_method(method)
            .build()
            .unwrap();
        let invoker = invoker(&bus).with_class(class).build().unwrap();
        invoker.register_handler("site::Ticker").unwrap();

        let declared = params.max(usize::from(takes_hook));
        let expected = if indirect && takes_hook { declared - 1 } else { declared };
        prop_assert_eq!(bus.registrations_for("tick")[0].accepted_args, expected);
    }
}
