use std::sync::{Arc, Weak};

use crate::error::{RegistryError, RegistryResult};
use crate::instance::Instance;
use crate::key::ComponentKey;
use crate::traits::ResolverCore;

use super::{ApplicationContext, ContextInner};

/// What components receive when they depend on `ApplicationContext`.
///
/// Holds the context weakly, so a singleton that keeps the handle does not
/// keep the context alive. Resolving through a handle whose context is gone
/// fails with `ContextShutDown`.
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ComponentDefinition, ContextHandle, Dependency, Resolver};
/// use std::sync::Arc;
///
/// struct Workbench { context: Arc<ContextHandle> }
///
/// let ctx = ApplicationContext::new();
/// ctx.register(
///     ComponentDefinition::<Workbench>::new()
///         .constructor([Dependency::single("ApplicationContext")], |args| {
///             Ok(Workbench { context: args.single(0)? })
///         }),
/// ).unwrap();
///
/// let workbench = ctx.get::<Workbench>("workbench").unwrap();
/// assert!(workbench.context.is_context(&ctx));
/// assert!(workbench.context.get_component("workbench").unwrap().key().as_str() == "workbench");
/// ```
#[derive(Clone)]
pub struct ContextHandle {
    inner: Weak<ContextInner>,
}

impl ContextHandle {
    pub(crate) fn new(inner: Weak<ContextInner>) -> Self {
        Self { inner }
    }

    /// A strong reference to the context, if it is still alive.
    pub fn context(&self) -> RegistryResult<ApplicationContext> {
        self.upgrade().map(|inner| ApplicationContext { inner })
    }

    /// Whether this handle points at `context`.
    pub fn is_context(&self, context: &ApplicationContext) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Arc::as_ptr(&context.inner))
    }

    fn upgrade(&self) -> RegistryResult<Arc<ContextInner>> {
        self.inner.upgrade().ok_or(RegistryError::ContextShutDown)
    }
}

impl std::fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl ResolverCore for ContextHandle {
    fn resolve_component(&self, key: &ComponentKey) -> RegistryResult<Instance> {
        self.upgrade()?.resolve_component(key)
    }

    fn resolve_components(&self, key: &ComponentKey) -> RegistryResult<Vec<Instance>> {
        self.upgrade()?.resolve_components(key)
    }

    fn contains_component(&self, key: &ComponentKey) -> bool {
        self.upgrade().map_or(false, |inner| inner.contains_component(key))
    }
}
