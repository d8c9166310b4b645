use component_registry::{
    ApplicationContext, ComponentDefinition, ContextHandle, Dependency, RegistryError, Resolver, Scope,
};
use std::sync::Arc;

fn path(err: &RegistryError) -> Vec<&str> {
    match err {
        RegistryError::CyclicDependency(path) => path.iter().map(|k| k.as_str()).collect(),
        other => panic!("expected a cyclic dependency, got {:?}", other),
    }
}

#[test]
fn test_self_circular_dependency() {
    struct SelfReferencing;

    let ctx = ApplicationContext::new();
    ctx.register(
        ComponentDefinition::<SelfReferencing>::new()
            .constructor([Dependency::single("SelfReferencing")], |_| Ok(SelfReferencing)),
    )
    .unwrap();

    let err = ctx.get_component("selfreferencing").unwrap_err();
    assert_eq!(path(&err), vec!["selfreferencing", "selfreferencing"]);
}

#[test]
fn test_two_component_cycle() {
    struct A;
    struct B;

    let ctx = ApplicationContext::new();
    ctx.register(ComponentDefinition::<A>::new().constructor([Dependency::single("B")], |_| Ok(A)))
        .unwrap();
    ctx.register(ComponentDefinition::<B>::new().constructor([Dependency::single("A")], |_| Ok(B)))
        .unwrap();

    let err = ctx.get_component("A").unwrap_err();
    assert_eq!(path(&err), vec!["a", "b", "a"]);
    assert_eq!(err.to_string(), "Cyclic dependency: a -> b -> a");

    let err = ctx.get_component("B").unwrap_err();
    assert_eq!(path(&err), vec!["b", "a", "b"]);

    assert!(!ctx.is_instantiated("a"));
    assert!(!ctx.is_instantiated("b"));
}

#[test]
fn test_cycle_through_base_key_and_method_injection() {
    struct Service;
    struct Client;

    let ctx = ApplicationContext::new();
    ctx.register(
        ComponentDefinition::<Service>::new()
            .extends(["Api"])
            .constructor([], |_| Ok(Service))
            .method("setClient", [Dependency::single("Client")], |_, _| Ok(())),
    )
    .unwrap();
    ctx.register(ComponentDefinition::<Client>::new().constructor([Dependency::single("Api")], |_| Ok(Client)))
        .unwrap();

    let err = ctx.get_component("Client").unwrap_err();
    assert_eq!(path(&err), vec!["client", "service", "client"]);
}

#[test]
fn test_prototype_cycle_is_detected() {
    struct Ping;
    struct Pong;

    let ctx = ApplicationContext::new();
    ctx.register(
        ComponentDefinition::<Ping>::new()
            .constructor([Dependency::single("Pong")], |_| Ok(Ping))
            .scope(Scope::Prototype),
    )
    .unwrap();
    ctx.register(
        ComponentDefinition::<Pong>::new()
            .constructor([Dependency::single("Ping")], |_| Ok(Pong))
            .scope(Scope::Prototype),
    )
    .unwrap();

    assert!(matches!(
        ctx.get_component("ping"),
        Err(RegistryError::CyclicDependency(_))
    ));
}

#[test]
fn test_collection_cycle() {
    struct Host;
    struct Plugin;

    let ctx = ApplicationContext::new();
    ctx.register(ComponentDefinition::<Host>::new().constructor([Dependency::collection("Extension")], |_| Ok(Host)))
        .unwrap();
    ctx.register(
        ComponentDefinition::<Plugin>::new()
            .extends(["Extension"])
            .constructor([Dependency::single("Host")], |_| Ok(Plugin)),
    )
    .unwrap();

    let err = ctx.get_components("Extension").unwrap_err();
    assert_eq!(path(&err), vec!["plugin", "host", "plugin"]);
}

#[test]
fn test_diamond_is_not_a_cycle() {
    struct Bottom;
    struct Left(Arc<Bottom>);
    struct Right(Arc<Bottom>);
    struct Top {
        left: Arc<Left>,
        right: Arc<Right>,
    }

    let ctx = ApplicationContext::new();
    ctx.register(ComponentDefinition::<Bottom>::new().constructor([], |_| Ok(Bottom)))
        .unwrap();
    ctx.register(ComponentDefinition::<Left>::new().constructor([Dependency::single("Bottom")], |a| Ok(Left(a.single(0)?))))
        .unwrap();
    ctx.register(ComponentDefinition::<Right>::new().constructor([Dependency::single("Bottom")], |a| Ok(Right(a.single(0)?))))
        .unwrap();
    ctx.register(ComponentDefinition::<Top>::new().constructor(
        [Dependency::single("Left"), Dependency::single("Right")],
        |a| Ok(Top { left: a.single(0)?, right: a.single(1)? }),
    ))
    .unwrap();

    let top = ctx.get::<Top>("top").unwrap();
    assert!(Arc::ptr_eq(&top.left.0, &top.right.0));
}

#[test]
fn test_lazy_lookup_through_context_is_not_a_cycle() {
    struct Lazy {
        context: Arc<ContextHandle>,
    }

    let ctx = ApplicationContext::new();
    ctx.register(
        ComponentDefinition::<Lazy>::new()
            .constructor([Dependency::single("ApplicationContext")], |a| Ok(Lazy { context: a.single(0)? })),
    )
    .unwrap();

    let lazy = ctx.get::<Lazy>("lazy").unwrap();
    // Resolving itself after construction finished hits the cache
    let again = lazy.context.get::<Lazy>("lazy").unwrap();
    assert!(Arc::ptr_eq(&lazy, &again));
}

#[test]
fn test_resolving_inside_constructor_is_reentrant() {
    struct Inner;
    struct Outer(Arc<Inner>);

    let ctx = ApplicationContext::new();
    ctx.register(ComponentDefinition::<Inner>::new().constructor([], |_| Ok(Inner)))
        .unwrap();
    ctx.register(ComponentDefinition::<Outer>::new().constructor(
        [Dependency::single("ApplicationContext")],
        |a| {
            let context = a.single::<ContextHandle>(0)?;
            Ok(Outer(context.get::<Inner>("inner")?))
        },
    ))
    .unwrap();

    let outer = ctx.get::<Outer>("outer").unwrap();
    assert!(Arc::ptr_eq(&outer.0, &ctx.get::<Inner>("inner").unwrap()));
}

#[test]
fn test_self_lookup_inside_constructor_is_a_cycle() {
    struct Eager;

    let ctx = ApplicationContext::new();
    ctx.register(ComponentDefinition::<Eager>::new().constructor(
        [Dependency::single("ApplicationContext")],
        |a| {
            let context = a.single::<ContextHandle>(0)?;
            context.get_component("eager")?;
            Ok(Eager)
        },
    ))
    .unwrap();

    let err = ctx.get_component("eager").unwrap_err();
    assert_eq!(path(&err), vec!["eager", "eager"]);
}
