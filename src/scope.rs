//! Component scope definitions.

/// Instantiation scopes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use component_registry::{ApplicationContext, ComponentDefinition, Resolver, Scope};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Token;
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Clock>::new().constructor([], |_| Ok(Clock))).unwrap();
/// ctx.register(
///     ComponentDefinition::<Token>::new()
///         .constructor([], |_| Ok(Token))
///         .scope(Scope::Prototype),
/// ).unwrap();
///
/// // Singleton: same instance on every resolution
/// let a = ctx.get::<Clock>("clock").unwrap();
/// let b = ctx.get::<Clock>("clock").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Prototype: a fresh instance every time
/// let t1 = ctx.get::<Token>("token").unwrap();
/// let t2 = ctx.get::<Token>("token").unwrap();
/// assert!(!Arc::ptr_eq(&t1, &t2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Scope {
    /// One instance per context, created lazily on first resolution
    #[default]
    Singleton,
    /// New instance per resolution, never cached
    Prototype,
}
