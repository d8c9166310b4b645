use component_registry::{
    ApplicationContext, ComponentDefinition, ComponentKey, ComponentType, Dependency, RegistryError, Resolver,
};
use std::sync::Arc;

trait Item: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Derived1;
impl Item for Derived1 {
    fn name(&self) -> &'static str {
        "derived1"
    }
}

struct Derived2;
impl Item for Derived2 {
    fn name(&self) -> &'static str {
        "derived2"
    }
}

struct Consumer {
    items: Vec<Arc<dyn Item>>,
}

fn register_item<T: Item + 'static>(ctx: &ApplicationContext, build: fn() -> T) {
    ctx.register(
        ComponentDefinition::<T>::new()
            .extends(["Base"])
            .constructor([], move |_| Ok(build()))
            .view::<dyn Item>(|item| item),
    )
    .unwrap();
}

fn names(items: &[Arc<dyn Item>]) -> Vec<&'static str> {
    items.iter().map(|item| item.name()).collect()
}

#[test]
fn test_single_implementation_stands_for_its_base() {
    let ctx = ApplicationContext::new();
    ctx.register_abstract("Base", Vec::<&str>::new()).unwrap();
    register_item(&ctx, || Derived1);

    let via_base = ctx.get_component("Base").unwrap();
    let via_derived = ctx.get_component("Derived1").unwrap();

    assert!(via_base.ptr_eq(&via_derived));
    assert_eq!(via_base.key().as_str(), "derived1");
    assert_eq!(ctx.get::<dyn Item>("base").unwrap().name(), "derived1");
}

#[test]
fn test_ancestor_only_base_with_single_implementation() {
    let ctx = ApplicationContext::new();
    register_item(&ctx, || Derived1);

    let base = ctx.descriptor("Base").unwrap();
    assert!(!base.is_concrete);
    assert!(ctx.get_component("Base").unwrap().ptr_eq(&ctx.get_component("Derived1").unwrap()));
}

#[test]
fn test_several_implementations_are_ambiguous() {
    let ctx = ApplicationContext::new();
    register_item(&ctx, || Derived1);
    register_item(&ctx, || Derived2);

    assert_eq!(
        ctx.get_component("Base").err(),
        Some(RegistryError::AmbiguousComponent {
            key: "base".into(),
            candidates: vec!["derived1".into(), "derived2".into()],
        })
    );

    let all = ctx.get_components("Base").unwrap();
    let keys: Vec<&str> = all.iter().map(|i| i.key().as_str()).collect();
    assert_eq!(keys, vec!["derived1", "derived2"]);
    assert!(all[0].ptr_eq(&ctx.get_component("Derived1").unwrap()));
    assert!(all[1].ptr_eq(&ctx.get_component("Derived2").unwrap()));
}

#[test]
fn test_base_without_implementations() {
    let ctx = ApplicationContext::new();
    ctx.register_abstract("Base", Vec::<&str>::new()).unwrap();

    assert_eq!(
        ctx.get_component("Base").err(),
        Some(RegistryError::UnknownComponent("base".into()))
    );
    assert!(ctx.get_components("Base").unwrap().is_empty());
}

#[test]
fn test_collection_dependency_in_registration_order() {
    let ctx = ApplicationContext::new();
    // Registration order, not name order
    register_item(&ctx, || Derived2);
    register_item(&ctx, || Derived1);
    ctx.register(
        ComponentDefinition::<Consumer>::new()
            .constructor([Dependency::collection("Base")], |args| Ok(Consumer { items: args.collection(0)? })),
    )
    .unwrap();

    let consumer = ctx.get::<Consumer>("consumer").unwrap();
    assert_eq!(consumer.items.len(), 2);
    assert_eq!(names(&consumer.items), vec!["derived2", "derived1"]);
}

#[test]
fn test_variadic_dependency_sees_the_same_list() {
    struct Spread {
        label: String,
        items: Vec<Arc<dyn Item>>,
    }
    struct Label;

    let ctx = ApplicationContext::new();
    register_item(&ctx, || Derived1);
    register_item(&ctx, || Derived2);
    ctx.register(ComponentDefinition::<Label>::new().constructor([], |_| Ok(Label)))
        .unwrap();
    ctx.register(
        ComponentDefinition::<Spread>::new().constructor(
            [Dependency::single("Label"), Dependency::variadic("Base")],
            |args| {
                assert_eq!(args.len(), 3);
                Ok(Spread {
                    label: args.instance(0)?.key().to_string(),
                    items: args.rest(1)?,
                })
            },
        ),
    )
    .unwrap();

    let spread = ctx.get::<Spread>("spread").unwrap();
    let collected = ctx.get_all::<dyn Item>("Base").unwrap();

    assert_eq!(spread.label, "label");
    assert_eq!(names(&spread.items), names(&collected));
    for (a, b) in spread.items.iter().zip(&collected) {
        assert!(Arc::ptr_eq(a, b));
    }
}

#[test]
fn test_concrete_base_comes_first_in_collection() {
    struct Window;

    let ctx = ApplicationContext::new();
    register_item(&ctx, || Derived1);
    ctx.register_type("Base", ComponentType::new([], |_| Ok(Window)), Vec::<&str>::new())
        .unwrap();

    let keys: Vec<String> = ctx
        .get_components("Base")
        .unwrap()
        .iter()
        .map(|i| i.key().to_string())
        .collect();
    assert_eq!(keys, vec!["base", "derived1"]);

    // A concrete base resolves to itself, never to a derived key
    assert_eq!(ctx.get_component("Base").unwrap().key().as_str(), "base");
}

#[test]
fn test_deep_chain_links_every_ancestor() {
    struct Leaf;

    let ctx = ApplicationContext::new();
    ctx.register(
        ComponentDefinition::<Leaf>::new()
            .extends(["Panel", "View", "Widget"])
            .constructor([], |_| Ok(Leaf)),
    )
    .unwrap();

    for base in ["Panel", "View", "Widget"] {
        let descriptor = ctx.descriptor(base).unwrap();
        assert!(!descriptor.is_concrete);
        assert_eq!(descriptor.derived_names(), vec!["leaf"]);
        assert!(ctx.get_component(base).unwrap().ptr_eq(&ctx.get_component("leaf").unwrap()));
    }
    let leaf = ctx.descriptor("Leaf").unwrap();
    assert!(leaf.extends(&"widget".into()));
    assert_eq!(ctx.descriptor("View").unwrap().ancestor_keys, vec![ComponentKey::new("widget")]);
}

#[test]
fn test_external_names_are_normalized() {
    struct StatusBar;

    let ctx = ApplicationContext::new();
    ctx.register(ComponentDefinition::<StatusBar>::new().constructor([], |_| Ok(StatusBar)))
        .unwrap();

    let direct = ctx.get_component("StatusBar").unwrap();
    for name in ["status-bar", "Status.Bar", "status bar", "STATUS_BAR"] {
        match name {
            "STATUS_BAR" => assert!(ctx.get_component_by_external_name(name).is_err()),
            _ => assert!(ctx.get_component_by_external_name(name).unwrap().ptr_eq(&direct)),
        }
    }
}

#[test]
fn test_declared_and_external_names_share_one_key() {
    struct StatusBar;

    let ctx = ApplicationContext::new();
    let key = ctx
        .register(
            ComponentDefinition::<StatusBar>::new()
                .named("status-bar")
                .constructor([], |_| Ok(StatusBar)),
        )
        .unwrap();
    assert_eq!(key.as_str(), "statusbar");

    let direct = ctx.get_component("status-bar").unwrap();
    assert!(ctx.get_component_by_external_name("status-bar").unwrap().ptr_eq(&direct));
    assert!(ctx.get_component("StatusBar").unwrap().ptr_eq(&direct));

    // The punctuation-free spelling is the same component, not a second one
    let second = ctx.register(
        ComponentDefinition::<StatusBar>::new()
            .named("statusbar")
            .constructor([], |_| Ok(StatusBar)),
    );
    assert_eq!(second.err(), Some(RegistryError::DuplicateComponent("statusbar".into())));
}

#[test]
fn test_registering_a_self_ancestor_fails() {
    struct Loop;

    let ctx = ApplicationContext::new();
    let result = ctx.register(
        ComponentDefinition::<Loop>::new()
            .extends(["Base", "Loop"])
            .constructor([], |_| Ok(Loop)),
    );
    assert!(matches!(result, Err(RegistryError::InvalidDeclaration { .. })));
    assert!(!ctx.is_registered("base"));
}
