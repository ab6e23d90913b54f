//! Property tests for context matching, priority resolution and the
//! strategy/tag invariant.

use hookwire_system::constants::Constants;
use hookwire_system::context::{Context, ContextMask, ContextProvider, ContextSignals};
use hookwire_system::priority::{NoScope, Priority, PriorityScope};
use hookwire_system::spec::{HandlerSpec, Strategy as InitStrategy};
use proptest::prelude::*;

struct ConstantScope(Constants);

impl PriorityScope for ConstantScope {
    fn constant(&self, name: &str) -> Option<i32> {
        self.0.get_int(name)
    }

    fn filter_priority(&self, _name: &str, default: i32, _tag: &str) -> i32 {
        default
    }
}

fn arb_strategy() -> impl Strategy<Value = InitStrategy> {
    prop_oneof![
        Just(InitStrategy::Immediately),
        Just(InitStrategy::Early),
        Just(InitStrategy::Deferred),
        Just(InitStrategy::OnDemand),
        Just(InitStrategy::JustInTime),
        Just(InitStrategy::Dynamically),
        Just(InitStrategy::Unconditionally),
    ]
}

proptest! {
    #[test]
    fn exactly_one_context_bit_matches(index in 0usize..6) {
        let active = Context::ALL[index];
        let matching = Context::ALL
            .iter()
            .filter(|candidate| active.is_valid(candidate.bit()))
            .count();

        prop_assert_eq!(matching, 1);
        prop_assert!(active.is_valid(ContextMask::GLOBAL));
        prop_assert!(!active.is_valid(ContextMask::empty()));
    }

    #[test]
    fn mask_match_is_bit_intersection(index in 0usize..6, bits in 0u8..64) {
        let active = Context::ALL[index];
        let mask = ContextMask::from_bits_truncate(bits);
        prop_assert_eq!(active.is_valid(mask), mask.contains(active.bit()));
    }

    #[test]
    fn classification_yields_one_context(
        admin in any::<bool>(),
        ajax in any::<bool>(),
        cron in any::<bool>(),
        cli in any::<bool>(),
        rest in any::<bool>(),
    ) {
        let mut constants = Constants::new();
        if admin { constants = constants.define("IS_ADMIN", "1"); }
        if ajax { constants = constants.define("DOING_AJAX", "1"); }
        if cron { constants = constants.define("DOING_CRON", "1"); }
        if cli { constants = constants.define("HOOKWIRE_CLI", "1"); }
        if rest { constants = constants.define("REQUEST_URI", "/api/v1/posts"); }

        let context = ContextSignals::from_constants(&constants).context();

        if ajax {
            prop_assert_eq!(context, Context::Ajax);
        } else if admin {
            prop_assert_eq!(context, Context::Admin);
        }
        if !admin && !ajax && !cron && !rest && !cli {
            prop_assert_eq!(context, Context::Frontend);
        }
    }

    #[test]
    fn fixed_priority_resolves_to_itself(value in any::<i32>()) {
        prop_assert_eq!(Priority::from(value).resolve("init", &NoScope), value);
        prop_assert_eq!(Priority::from(value.to_string()).resolve("init", &NoScope), value);
    }

    #[test]
    fn named_priority_is_resolved_once(first in -100i32..100, second in -100i32..100) {
        let spec = HandlerSpec::builder()
            .with_tag("init")
            .with_priority("SITE_PRIORITY")
            .build()
            .unwrap();

        let before = ConstantScope(Constants::new().define("SITE_PRIORITY", first.to_string()));
        let after = ConstantScope(Constants::new().define("SITE_PRIORITY", second.to_string()));

        prop_assert_eq!(spec.priority(&before), first);
        prop_assert_eq!(spec.priority(&after), first);
    }

    #[test]
    fn strategy_tag_invariant(strategy in arb_strategy(), tag in "[a-z_]{0,12}") {
        let built = HandlerSpec::builder()
            .with_tag(tag.clone())
            .with_strategy(strategy)
            .build();

        prop_assert_eq!(built.is_ok(), strategy.requires_tag() != tag.is_empty());
    }
}
