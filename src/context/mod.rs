//! Application context: the public face of the component registry.
//!
//! The context owns the descriptor table, the singleton cache and the
//! observers, and drives resolution: it applies the single-vs-collection
//! policy, consults the scope manager and hands concrete keys to the
//! injection binder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{ReentrantMutex, RwLock};

use crate::binder::InjectionBinder;
use crate::collection::CollectionResolver;
use crate::config::ContextOptions;
use crate::definition::ComponentDefinition;
use crate::descriptors::ComponentDescriptor;
use crate::error::{RegistryError, RegistryResult};
use crate::injection::InjectionPoint;
use crate::instance::{Instance, ViewTable};
use crate::internal::ResolutionGuard;
use crate::key::ComponentKey;
use crate::observer::{Observers, RegistryObserver};
use crate::registry::{ComponentRegistry, ComponentType};
use crate::scope::Scope;
use crate::scope_manager::ScopeManager;
use crate::traits::ResolverCore;
use crate::validation::{self, ValidationReport};

mod handle;

pub use handle::ContextHandle;

/// The component registry and resolution engine.
///
/// Every context registers itself on construction under the key
/// `ApplicationContext`, so components can declare a dependency on it and
/// receive a [`ContextHandle`] to resolve further components lazily.
///
/// # Thread Safety
///
/// The context is `Clone + Send + Sync`; clones share the same registry and
/// cache. Top-level resolutions are serialized by a re-entrant lock, so a
/// singleton is never constructed twice even when many threads request it at
/// once, while constructors may call back into the context on their own
/// thread. No registry lock is held while user constructors or hooks run.
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ComponentDefinition, Dependency, Resolver};
/// use std::sync::Arc;
///
/// struct Buffer;
/// struct Editor { buffer: Arc<Buffer> }
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Buffer>::new().constructor([], |_| Ok(Buffer))).unwrap();
/// ctx.register(
///     ComponentDefinition::<Editor>::new()
///         .constructor([Dependency::single("Buffer")], |args| Ok(Editor { buffer: args.single(0)? })),
/// ).unwrap();
///
/// let editor = ctx.get::<Editor>("editor").unwrap();
/// let buffer = ctx.get::<Buffer>("buffer").unwrap();
/// assert!(Arc::ptr_eq(&editor.buffer, &buffer));
/// ```
#[derive(Clone)]
pub struct ApplicationContext {
    inner: Arc<ContextInner>,
}

pub(crate) struct ContextInner {
    registry: RwLock<ComponentRegistry>,
    scopes: ScopeManager,
    /// Serializes resolution; re-entrant for nested dependency resolution
    resolution: ReentrantMutex<()>,
    observers: RwLock<Observers>,
    options: ContextOptions,
    shut_down: AtomicBool,
}

impl ApplicationContext {
    /// Creates an empty context with default options.
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    /// Creates an empty context; the only registered key is the context itself.
    pub fn with_options(options: ContextOptions) -> Self {
        let inner = Arc::new(ContextInner {
            registry: RwLock::new(ComponentRegistry::new()),
            scopes: ScopeManager::new(),
            resolution: ReentrantMutex::new(()),
            observers: RwLock::new(Observers::new()),
            options,
            shut_down: AtomicBool::new(false),
        });
        let context = Self { inner };
        context.register_self();
        context
    }

    /// Registers the context under its own key and seeds the singleton cache
    /// with a weak handle to it.
    fn register_self(&self) {
        let key = ComponentKey::of::<ApplicationContext>();
        let weak = Arc::downgrade(&self.inner);
        let handle = ContextHandle::new(weak.clone());
        let component = ComponentType::new([], move |_| Ok(ContextHandle::new(weak.clone())))
            .with_view::<dyn ResolverCore>(|handle| handle);

        let mut views = ViewTable::of::<ContextHandle>();
        views.insert::<ContextHandle, dyn ResolverCore>(|handle| handle);
        let instance = Instance::new(key.clone(), Arc::new(handle), Arc::new(views));

        let registered = self
            .inner
            .registry
            .write()
            .register_type(key.clone(), component.erase(), Vec::new(), Scope::Singleton);
        match registered {
            Ok(()) => self.inner.scopes.seed(key, instance),
            Err(error) => tracing::warn!(%error, "context self-registration failed"),
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.inner.options
    }

    /// Registers a concrete type under `key` with its ancestor chain.
    ///
    /// Ancestors are listed from the immediate parent to the root. Each one
    /// that was never seen gets a non-concrete descriptor, and `key` is
    /// appended to every ancestor's derived keys.
    pub fn register_type<T, K>(
        &self,
        key: impl Into<ComponentKey>,
        component: ComponentType<T>,
        ancestors: impl IntoIterator<Item = K>,
    ) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        K: Into<ComponentKey>,
    {
        self.inner.ensure_open()?;
        let key = key.into();
        let ancestors = ancestors.into_iter().map(Into::into).collect();
        self.inner
            .registry
            .write()
            .register_type(key.clone(), component.erase(), ancestors, self.inner.options.default_scope)?;
        self.inner.observers().registered(&key);
        Ok(())
    }

    /// Declares a non-concrete base so hooks can be attached to it before any
    /// implementation is registered.
    pub fn register_abstract<K: Into<ComponentKey>>(
        &self,
        key: impl Into<ComponentKey>,
        ancestors: impl IntoIterator<Item = K>,
    ) -> RegistryResult<()> {
        self.inner.ensure_open()?;
        let key = key.into();
        let ancestors = ancestors.into_iter().map(Into::into).collect();
        self.inner
            .registry
            .write()
            .register_abstract(key.clone(), ancestors, self.inner.options.default_scope)?;
        self.inner.observers().registered(&key);
        Ok(())
    }

    /// Attaches a method injection or post-construct hook to its owner.
    pub fn register_injection_point(&self, point: InjectionPoint) -> RegistryResult<()> {
        self.inner.ensure_open()?;
        self.inner.registry.write().register_injection_point(point)
    }

    /// Registers a complete [`ComponentDefinition`] atomically.
    pub fn register<T: Send + Sync + 'static>(&self, definition: ComponentDefinition<T>) -> RegistryResult<ComponentKey> {
        self.inner.ensure_open()?;
        let parts = definition.into_parts()?;
        let scope = parts.scope.unwrap_or(self.inner.options.default_scope);
        {
            let mut registry = self.inner.registry.write();
            registry.register_type(parts.key.clone(), parts.component, parts.ancestors, scope)?;
            for point in parts.points {
                // Owner exists and points were checked up front
                registry.register_injection_point(point)?;
            }
        }
        self.inner.observers().registered(&parts.key);
        Ok(parts.key)
    }

    /// Changes the scope of `key`.
    ///
    /// Once an instance of `key` exists the scope is frozen: a change fails
    /// with `InvalidScopeTransition`, or is ignored with a warning when
    /// [`ContextOptions::strict_scope_transitions`] is off.
    pub fn set_scope(&self, key: impl Into<ComponentKey>, scope: Scope) -> RegistryResult<()> {
        self.inner.ensure_open()?;
        let key = key.into();
        let _resolution = self.inner.resolution.lock();
        let mut registry = self.inner.registry.write();

        let current = registry.lookup(&key)?.scope;
        if current == scope {
            return Ok(());
        }
        if self.inner.scopes.is_instantiated(&key) {
            if self.inner.options.strict_scope_transitions {
                return Err(RegistryError::InvalidScopeTransition {
                    key,
                    from: current,
                    to: scope,
                });
            }
            tracing::warn!(component = %key, from = ?current, to = ?scope, "ignoring scope change after instantiation");
            return Ok(());
        }
        registry.set_scope(&key, scope)
    }

    pub fn add_observer(&self, observer: Arc<dyn RegistryObserver>) {
        self.inner.observers.write().add(observer);
    }

    pub fn descriptor(&self, key: impl Into<ComponentKey>) -> RegistryResult<ComponentDescriptor> {
        self.inner.registry.read().lookup(&key.into()).cloned()
    }

    /// All descriptors in first-seen order, the context's own included.
    pub fn descriptors(&self) -> Vec<ComponentDescriptor> {
        self.inner.registry.read().descriptors().cloned().collect()
    }

    pub fn is_registered(&self, key: impl Into<ComponentKey>) -> bool {
        self.inner.registry.read().contains(&key.into())
    }

    /// Whether an instance of `key` was ever created.
    pub fn is_instantiated(&self, key: impl Into<ComponentKey>) -> bool {
        self.inner.scopes.is_instantiated(&key.into())
    }

    /// Checks the wiring graph without constructing anything.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.inner.registry.read())
    }

    /// Drops every cached singleton; later calls fail with `ContextShutDown`.
    pub fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let _resolution = self.inner.resolution.lock();
        let dropped = self.inner.scopes.clear();
        tracing::debug!(singletons = dropped, "application context shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    /// Dumps the descriptor table for debugging.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let registry = self.inner.registry.read();
        let names = |keys: &[ComponentKey]| keys.iter().map(ComponentKey::as_str).collect::<Vec<_>>().join(", ");

        let mut s = String::new();
        s.push_str("=== Application Context Debug ===\n");
        for d in registry.descriptors() {
            s.push_str(&format!(
                "  {} [{:?}{}{}] ancestors: ({}) derived: ({})\n",
                d.key,
                d.scope,
                if d.is_concrete { ", concrete" } else { "" },
                if self.inner.scopes.is_instantiated(&d.key) { ", instantiated" } else { "" },
                names(&d.ancestor_keys),
                names(&d.derived_keys),
            ));
        }
        s
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("components", &self.inner.registry.read().descriptors().count())
            .field("options", &self.inner.options)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl ResolverCore for ApplicationContext {
    fn resolve_component(&self, key: &ComponentKey) -> RegistryResult<Instance> {
        self.inner.resolve_component(key)
    }

    fn resolve_components(&self, key: &ComponentKey) -> RegistryResult<Vec<Instance>> {
        self.inner.resolve_components(key)
    }

    fn contains_component(&self, key: &ComponentKey) -> bool {
        self.inner.contains_component(key)
    }
}

impl ContextInner {
    /// Tags this context's entries on the thread-local resolution stack.
    #[inline]
    fn id(&self) -> usize {
        self as *const ContextInner as usize
    }

    fn ensure_open(&self) -> RegistryResult<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(RegistryError::ContextShutDown);
        }
        Ok(())
    }

    fn observers(&self) -> Observers {
        self.observers.read().clone()
    }

    /// Runs `resolve` between the observers' start and end notifications.
    fn observed<T>(&self, key: &ComponentKey, resolve: impl FnOnce() -> RegistryResult<T>) -> RegistryResult<T> {
        let observers = self.observers();
        if !observers.has_observers() {
            return resolve();
        }

        observers.resolving(key);
        let start = Instant::now();
        let result = resolve();
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(error) => observers.failed(key, error),
        }
        result
    }

    /// Single-instance policy: a concrete key builds itself, a base key
    /// stands for its only implementation.
    fn resolve_single(&self, key: &ComponentKey) -> RegistryResult<Instance> {
        let (is_concrete, scope, derived) = {
            let registry = self.registry.read();
            let descriptor = registry.lookup(key)?;
            (descriptor.is_concrete, descriptor.scope, descriptor.derived_keys.clone())
        };

        if is_concrete {
            return self.scopes.get_or_create(key, scope, || self.build(key));
        }
        match derived.as_slice() {
            [] => Err(RegistryError::UnknownComponent(key.clone())),
            [only] => self.resolve_single(only),
            candidates => Err(RegistryError::AmbiguousComponent {
                key: key.clone(),
                candidates: candidates.to_vec(),
            }),
        }
    }

    /// Fresh, fully wired instance of a concrete key.
    fn build(&self, key: &ComponentKey) -> RegistryResult<Instance> {
        let _guard = ResolutionGuard::enter(self.id(), key, self.options.max_resolution_depth)?;
        let plan = self.registry.read().plan(key)?;
        InjectionBinder::new(self).wire(&plan)
    }
}

impl ResolverCore for ContextInner {
    fn resolve_component(&self, key: &ComponentKey) -> RegistryResult<Instance> {
        self.ensure_open()?;
        let _resolution = self.resolution.lock();
        self.observed(key, || self.resolve_single(key))
    }

    fn resolve_components(&self, key: &ComponentKey) -> RegistryResult<Vec<Instance>> {
        self.ensure_open()?;
        let _resolution = self.resolution.lock();
        self.observed(key, || {
            let members = CollectionResolver::members(self.registry.read().lookup(key)?);
            CollectionResolver::new(self).resolve_all(&members)
        })
    }

    fn contains_component(&self, key: &ComponentKey) -> bool {
        self.registry.read().contains(key)
    }
}
