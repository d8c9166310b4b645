//! Resolver traits for component resolution.

use std::sync::Arc;

use crate::error::RegistryResult;
use crate::instance::Instance;
use crate::key::ComponentKey;

/// Core resolver trait for object-safe component resolution.
///
/// This trait provides the fundamental resolution entry points that are
/// object-safe. The injection binder resolves every declared dependency
/// through it, which is how nested resolution re-enters the context.
///
/// Most users should use the [`Resolver`] trait instead, which provides more
/// ergonomic generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single instance for `key`.
    ///
    /// A concrete key resolves to its own instance; a base key resolves to
    /// its only implementation.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The resolved, fully wired instance
    /// * `Err(RegistryError)` - Unknown, ambiguous, cyclic, ...
    fn resolve_component(&self, key: &ComponentKey) -> RegistryResult<Instance>;

    /// Resolves every implementation of `key` in registration order.
    ///
    /// A concrete key comes first, followed by each derived key.
    fn resolve_components(&self, key: &ComponentKey) -> RegistryResult<Vec<Instance>>;

    /// Whether `key` was ever registered, concrete or not.
    fn contains_component(&self, key: &ComponentKey) -> bool;
}

/// High-level resolver interface with generic methods.
///
/// Both `ApplicationContext` and the `ContextHandle` components receive when
/// they depend on the context implement this trait.
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ComponentDefinition, Resolver};
///
/// struct Settings { tab_size: usize }
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Settings>::new().constructor([], |_| Ok(Settings { tab_size: 4 }))).unwrap();
///
/// let instance = ctx.get_component("Settings").unwrap();
/// assert_eq!(instance.key().as_str(), "settings");
///
/// let settings = ctx.get::<Settings>("settings").unwrap();
/// assert_eq!(settings.tab_size, 4);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a single instance by declared key.
    fn get_component(&self, key: impl Into<ComponentKey>) -> RegistryResult<Instance>
    where
        Self: Sized,
    {
        self.resolve_component(&key.into())
    }

    /// Resolves a single instance by a name from an external caller.
    ///
    /// The name is normalized with [`ComponentKey::from_external`], so
    /// `"status-bar"` finds the component registered as `StatusBar`.
    fn get_component_by_external_name(&self, name: &str) -> RegistryResult<Instance>
    where
        Self: Sized,
    {
        self.resolve_component(&ComponentKey::from_external(name))
    }

    /// Resolves every implementation of `key` in registration order.
    fn get_components(&self, key: impl Into<ComponentKey>) -> RegistryResult<Vec<Instance>>
    where
        Self: Sized,
    {
        self.resolve_components(&key.into())
    }

    /// Resolves a single instance and projects it to `Arc<V>`.
    ///
    /// `V` is either the concrete type or a view the component declared.
    fn get<V>(&self, key: impl Into<ComponentKey>) -> RegistryResult<Arc<V>>
    where
        Self: Sized,
        V: ?Sized + Send + Sync + 'static,
    {
        self.resolve_component(&key.into())?.view::<V>()
    }

    /// Resolves every implementation of `key` and projects each to `Arc<V>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use component_registry::{ApplicationContext, ComponentDefinition, Resolver};
    ///
    /// trait Plugin: Send + Sync { fn name(&self) -> &str; }
    ///
    /// struct Git;
    /// impl Plugin for Git { fn name(&self) -> &str { "git" } }
    /// struct Lint;
    /// impl Plugin for Lint { fn name(&self) -> &str { "lint" } }
    ///
    /// let ctx = ApplicationContext::new();
    /// ctx.register(ComponentDefinition::<Git>::new().extends(["Plugin"]).constructor([], |_| Ok(Git)).view::<dyn Plugin>(|p| p)).unwrap();
    /// ctx.register(ComponentDefinition::<Lint>::new().extends(["Plugin"]).constructor([], |_| Ok(Lint)).view::<dyn Plugin>(|p| p)).unwrap();
    ///
    /// let plugins = ctx.get_all::<dyn Plugin>("plugin").unwrap();
    /// let names: Vec<&str> = plugins.iter().map(|p| p.name()).collect();
    /// assert_eq!(names, vec!["git", "lint"]);
    /// ```
    fn get_all<V>(&self, key: impl Into<ComponentKey>) -> RegistryResult<Vec<Arc<V>>>
    where
        Self: Sized,
        V: ?Sized + Send + Sync + 'static,
    {
        self.resolve_components(&key.into())?
            .iter()
            .map(Instance::view::<V>)
            .collect()
    }
}

impl<T: ResolverCore + ?Sized> Resolver for T {}
