//! Descriptor table and hierarchy bookkeeping.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::descriptors::ComponentDescriptor;
use crate::error::{RegistryError, RegistryResult};
use crate::injection::{Args, ConstructorFn, Dependency, InjectionPoint, Invoker};
use crate::instance::ViewTable;
use crate::key::ComponentKey;
use crate::scope::Scope;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// Concrete type behind a component registration.
///
/// Bundles the Rust type, its constructor with declared dependencies, and the
/// views the instance can be consumed through. Usually built for you by
/// [`ComponentDefinition`](crate::ComponentDefinition).
///
/// # Examples
///
/// ```rust
/// use component_registry::{ApplicationContext, ComponentType, Dependency, Resolver};
/// use std::sync::Arc;
///
/// trait Theme: Send + Sync {}
/// struct Dark;
/// impl Theme for Dark {}
/// struct Workbench { theme: Arc<dyn Theme> }
///
/// let ctx = ApplicationContext::new();
/// ctx.register_type(
///     "Dark",
///     ComponentType::new([], |_| Ok(Dark)).with_view::<dyn Theme>(|d| d),
///     ["Theme"],
/// ).unwrap();
/// ctx.register_type(
///     "Workbench",
///     ComponentType::new([Dependency::single("Theme")], |args| {
///         Ok(Workbench { theme: args.single::<dyn Theme>(0)? })
///     }),
///     Vec::<&str>::new(),
/// ).unwrap();
///
/// assert!(ctx.get::<Workbench>("workbench").is_ok());
/// ```
pub struct ComponentType<T> {
    dependencies: Vec<Dependency>,
    constructor: ConstructorFn,
    views: ViewTable,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ComponentType<T> {
    /// Type `T` built by `construct` from the resolved `dependencies`.
    pub fn new<F>(dependencies: impl IntoIterator<Item = Dependency>, construct: F) -> Self
    where
        F: Fn(&Args) -> RegistryResult<T> + Send + Sync + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().collect(),
            constructor: Arc::new(move |args| Ok(Arc::new(construct(args)?))),
            views: ViewTable::of::<T>(),
            _marker: PhantomData,
        }
    }

    /// Exposes instances as `Arc<V>` as well, typically a trait object of a base key.
    pub fn with_view<V>(mut self, cast: impl Fn(Arc<T>) -> Arc<V> + Send + Sync + 'static) -> Self
    where
        V: ?Sized + Send + Sync + 'static,
    {
        self.views.insert::<T, V>(cast);
        self
    }

    pub fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    pub(crate) fn erase(self) -> ErasedType {
        ErasedType {
            type_name: std::any::type_name::<T>(),
            dependencies: self.dependencies,
            constructor: self.constructor,
            views: self.views,
        }
    }
}

impl<T: Default + Send + Sync + 'static> ComponentType<T> {
    /// Type `T` with no dependencies, built from `Default`.
    pub fn of_default() -> Self {
        Self::new([], |_| Ok(T::default()))
    }
}

/// [`ComponentType`] with the Rust type erased, as stored in the registry.
pub(crate) struct ErasedType {
    pub(crate) type_name: &'static str,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) constructor: ConstructorFn,
    pub(crate) views: ViewTable,
}

/// Registry entry: public descriptor plus the wiring attached to it.
pub(crate) struct Entry {
    pub(crate) descriptor: ComponentDescriptor,
    pub(crate) constructor: Option<InjectionPoint>,
    pub(crate) methods: Vec<InjectionPoint>,
    pub(crate) views: Arc<ViewTable>,
}

/// Everything the binder needs to build one concrete component, detached
/// from the registry so no lock is held while user code runs.
pub(crate) struct WiringPlan {
    pub(crate) key: ComponentKey,
    pub(crate) constructor: InjectionPoint,
    pub(crate) views: Arc<ViewTable>,
    /// Method points per level, most-derived first
    pub(crate) levels: Vec<(ComponentKey, Vec<InjectionPoint>)>,
}

/// Component registry holding all descriptors
pub(crate) struct ComponentRegistry {
    entries: Map<ComponentKey, Entry>,
    /// Keys in first-seen order, for stable introspection
    order: Vec<ComponentKey>,
}

impl ComponentRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Map::default(),
            order: Vec::new(),
        }
    }

    /// Registers a concrete type under `key` and links it into its ancestors.
    pub(crate) fn register_type(
        &mut self,
        key: ComponentKey,
        component: ErasedType,
        ancestors: Vec<ComponentKey>,
        scope: Scope,
    ) -> RegistryResult<()> {
        if let Some(existing) = self.entries.get(&key) {
            if existing.descriptor.is_concrete {
                return Err(RegistryError::DuplicateComponent(key));
            }
        }
        self.check_chain(&key, &ancestors)?;
        let constructor = InjectionPoint {
            owner: key.clone(),
            member: "constructor".to_string(),
            dependencies: component.dependencies,
            is_post_construct: false,
            invoker: Invoker::Constructor(component.constructor),
        };
        constructor.check()?;

        self.ensure_descriptor(&key, &ancestors, scope);
        self.link_ancestors(&key, &ancestors, scope);
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.descriptor.is_concrete = true;
            entry.descriptor.type_name = Some(component.type_name);
            entry.descriptor.scope = scope;
            entry.constructor = Some(constructor);
            entry.views = Arc::new(component.views);
        }
        tracing::debug!(component = %key, ancestors = ancestors.len(), "registered component type");
        Ok(())
    }

    /// Declares a non-concrete base key.
    pub(crate) fn register_abstract(
        &mut self,
        key: ComponentKey,
        ancestors: Vec<ComponentKey>,
        scope: Scope,
    ) -> RegistryResult<()> {
        self.check_chain(&key, &ancestors)?;
        self.ensure_descriptor(&key, &ancestors, scope);
        // Only concrete keys are listed as derived; a base is never a candidate
        for (index, ancestor) in ancestors.iter().enumerate() {
            self.ensure_descriptor(ancestor, &ancestors[index + 1..], scope);
        }
        tracing::debug!(component = %key, "registered abstract component");
        Ok(())
    }

    /// Attaches a method-level point to its owner, after any earlier ones.
    pub(crate) fn register_injection_point(&mut self, point: InjectionPoint) -> RegistryResult<()> {
        point.check()?;
        let entry = self
            .entries
            .get_mut(&point.owner)
            .ok_or_else(|| RegistryError::UnknownComponent(point.owner.clone()))?;
        tracing::debug!(
            component = %point.owner,
            member = %point.member,
            post_construct = point.is_post_construct,
            "registered injection point"
        );
        entry.methods.push(point);
        Ok(())
    }

    pub(crate) fn lookup(&self, key: &ComponentKey) -> RegistryResult<&ComponentDescriptor> {
        self.entries
            .get(key)
            .map(|entry| &entry.descriptor)
            .ok_or_else(|| RegistryError::UnknownComponent(key.clone()))
    }

    pub(crate) fn contains(&self, key: &ComponentKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn set_scope(&mut self, key: &ComponentKey, scope: Scope) -> RegistryResult<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| RegistryError::UnknownComponent(key.clone()))?;
        entry.descriptor.scope = scope;
        Ok(())
    }

    /// Descriptors in first-seen order.
    pub(crate) fn descriptors(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| &entry.descriptor))
    }

    /// Snapshot of the wiring for a concrete key.
    pub(crate) fn plan(&self, key: &ComponentKey) -> RegistryResult<WiringPlan> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| RegistryError::UnknownComponent(key.clone()))?;
        let constructor = entry
            .constructor
            .clone()
            .ok_or_else(|| RegistryError::UnknownComponent(key.clone()))?;

        let mut levels = Vec::with_capacity(entry.descriptor.ancestor_keys.len() + 1);
        levels.push((key.clone(), entry.methods.clone()));
        for ancestor in &entry.descriptor.ancestor_keys {
            let methods = self
                .entries
                .get(ancestor)
                .map(|e| e.methods.clone())
                .unwrap_or_default();
            levels.push((ancestor.clone(), methods));
        }

        Ok(WiringPlan {
            key: key.clone(),
            constructor,
            views: entry.views.clone(),
            levels,
        })
    }

    /// Validates an ancestor chain against itself and the descriptors already known.
    fn check_chain(&self, key: &ComponentKey, ancestors: &[ComponentKey]) -> RegistryResult<()> {
        let invalid = |reason: String| RegistryError::InvalidDeclaration {
            key: key.clone(),
            reason,
        };

        for (index, ancestor) in ancestors.iter().enumerate() {
            if ancestor == key {
                return Err(invalid(format!("{} cannot extend itself", key)));
            }
            if ancestors[..index].contains(ancestor) {
                return Err(invalid(format!("{} appears twice in the ancestor chain", ancestor)));
            }
        }

        if let Some(existing) = self.entries.get(key) {
            if existing.descriptor.ancestor_keys != ancestors {
                return Err(invalid(format!(
                    "ancestor chain conflicts with earlier declaration ({})",
                    join(&existing.descriptor.ancestor_keys)
                )));
            }
        }

        for (index, ancestor) in ancestors.iter().enumerate() {
            if let Some(existing) = self.entries.get(ancestor) {
                let expected = &ancestors[index + 1..];
                if existing.descriptor.ancestor_keys != expected {
                    return Err(invalid(format!(
                        "{} was declared with ancestors ({}), not ({})",
                        ancestor,
                        join(&existing.descriptor.ancestor_keys),
                        join(expected)
                    )));
                }
            }
        }
        Ok(())
    }

    fn ensure_descriptor(&mut self, key: &ComponentKey, ancestors: &[ComponentKey], scope: Scope) {
        if !self.entries.contains_key(key) {
            self.entries.insert(
                key.clone(),
                Entry {
                    descriptor: ComponentDescriptor::new_abstract(key.clone(), ancestors.to_vec(), scope),
                    constructor: None,
                    methods: Vec::new(),
                    views: Arc::new(ViewTable::default()),
                },
            );
            self.order.push(key.clone());
        }
    }

    fn link_ancestors(&mut self, key: &ComponentKey, ancestors: &[ComponentKey], scope: Scope) {
        for (index, ancestor) in ancestors.iter().enumerate() {
            self.ensure_descriptor(ancestor, &ancestors[index + 1..], scope);
            if let Some(entry) = self.entries.get_mut(ancestor) {
                if !entry.descriptor.derived_keys.contains(key) {
                    entry.descriptor.derived_keys.push(key.clone());
                }
            }
        }
    }
}

fn join(keys: &[ComponentKey]) -> String {
    keys.iter().map(ComponentKey::as_str).collect::<Vec<_>>().join(", ")
}
