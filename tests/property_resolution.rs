/// Property-based tests for component resolution
///
/// These tests verify that hierarchy resolution follows registration order
/// and the single-vs-collection policy for any set of registered names.

use component_registry::{ApplicationContext, ComponentDefinition, RegistryError, Resolver, Scope};
use proptest::prelude::*;
use std::collections::HashSet;

fn register_all(ctx: &ApplicationContext, names: &[String]) {
    for (index, name) in names.iter().enumerate() {
        ctx.register(
            ComponentDefinition::<usize>::new()
                .named(name.as_str())
                .extends(["Base"])
                .constructor([], move |_| Ok(index)),
        )
        .unwrap();
    }
}

fn unique_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z0-9]{0,8}", 1..8)
        .prop_map(|set| set.into_iter().filter(|name| name != "base").collect::<Vec<_>>())
        .prop_filter("at least one name", |names| !names.is_empty())
        .prop_shuffle()
}

// Property: collections follow registration order, never name order
proptest! {
    #[test]
    fn collection_follows_registration_order(names in unique_names()) {
        let ctx = ApplicationContext::new();
        register_all(&ctx, &names);

        let keys: Vec<String> = ctx
            .get_components("Base")
            .unwrap()
            .iter()
            .map(|i| i.key().to_string())
            .collect();
        prop_assert_eq!(&keys, &names);

        let values: Vec<usize> = ctx.get_all::<usize>("Base").unwrap().iter().map(|v| **v).collect();
        prop_assert_eq!(values, (0..names.len()).collect::<Vec<_>>());
    }
}

// Property: a single request on a base succeeds exactly when it has one implementation
proptest! {
    #[test]
    fn single_request_policy(names in unique_names()) {
        let ctx = ApplicationContext::new();
        register_all(&ctx, &names);

        match ctx.get_component("Base") {
            Ok(instance) => {
                prop_assert_eq!(names.len(), 1);
                prop_assert!(instance.ptr_eq(&ctx.get_component(names[0].as_str()).unwrap()));
            }
            Err(RegistryError::AmbiguousComponent { candidates, .. }) => {
                prop_assert!(names.len() > 1);
                prop_assert_eq!(candidates.len(), names.len());
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}

// Property: collection members are the same instances single requests return
proptest! {
    #[test]
    fn collection_members_are_cached_singletons(names in unique_names()) {
        let ctx = ApplicationContext::new();
        register_all(&ctx, &names);

        let first = ctx.get_components("Base").unwrap();
        let second = ctx.get_components("Base").unwrap();
        for ((a, b), name) in first.iter().zip(&second).zip(&names) {
            prop_assert!(a.ptr_eq(b));
            prop_assert!(a.ptr_eq(&ctx.get_component(name.as_str()).unwrap()));
        }
    }
}

// Property: prototypes never share instances
proptest! {
    #[test]
    fn prototype_instances_are_distinct(resolutions in 2usize..10) {
        let ctx = ApplicationContext::new();
        ctx.register(
            ComponentDefinition::<String>::new()
                .named("Draft")
                .constructor([], |_| Ok(String::from("draft")))
                .scope(Scope::Prototype),
        )
        .unwrap();

        let instances: Vec<_> = (0..resolutions).map(|_| ctx.get::<String>("draft").unwrap()).collect();
        let distinct: HashSet<*const String> = instances.iter().map(|s| &**s as *const String).collect();
        prop_assert_eq!(distinct.len(), resolutions);
    }
}

// Property: punctuation in external names never changes which component is found
proptest! {
    #[test]
    fn external_names_ignore_punctuation(
        parts in prop::collection::vec("[A-Za-z][A-Za-z0-9]{0,5}", 1..4),
        separator in prop::sample::select(vec!["-", ".", " ", ""]),
    ) {
        let declared: String = parts.concat();
        let external = parts.join(separator);

        let ctx = ApplicationContext::new();
        ctx.register(
            ComponentDefinition::<u8>::new()
                .named(declared.as_str())
                .constructor([], |_| Ok(7u8)),
        )
        .unwrap();

        let direct = ctx.get_component(declared.as_str()).unwrap();
        let external = ctx.get_component_by_external_name(&external).unwrap();
        prop_assert!(direct.ptr_eq(&external));
    }
}
