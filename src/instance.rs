//! Resolved component instances and their typed views.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::key::ComponentKey;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

type ViewFn = Arc<dyn Fn(&AnyArc) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// Projections from a stored component to the typed handles it can be used as.
///
/// Every concrete component exposes itself (`Arc<T>`); registrations may add
/// further views such as `Arc<dyn Widget>`, which is how a component is
/// consumed through one of its base keys.
#[derive(Clone, Default)]
pub(crate) struct ViewTable {
    views: HashMap<TypeId, (&'static str, ViewFn)>,
}

impl ViewTable {
    /// Table exposing only the concrete type itself.
    pub(crate) fn of<T: Send + Sync + 'static>() -> Self {
        let mut table = ViewTable::default();
        table.insert::<T, T>(|value| value);
        table
    }

    /// Adds a view `Arc<V>` computed from the concrete `Arc<T>`.
    pub(crate) fn insert<T, V>(&mut self, cast: impl Fn(Arc<T>) -> Arc<V> + Send + Sync + 'static)
    where
        T: Send + Sync + 'static,
        V: ?Sized + Send + Sync + 'static,
    {
        let project: ViewFn = Arc::new(move |value: &AnyArc| {
            let concrete = value.clone().downcast::<T>().ok()?;
            Some(Box::new(cast(concrete)) as Box<dyn Any + Send + Sync>)
        });
        self.views
            .insert(TypeId::of::<V>(), (std::any::type_name::<V>(), project));
    }

    fn project<V: ?Sized + Send + Sync + 'static>(&self, value: &AnyArc) -> Option<Arc<V>> {
        let (_, project) = self.views.get(&TypeId::of::<V>())?;
        project(value)?.downcast::<Arc<V>>().ok().map(|boxed| *boxed)
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.views.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }
}

/// A resolved component.
///
/// Cloning an `Instance` shares the same underlying object. Use
/// [`view`](Instance::view) to get a typed handle.
///
/// # Examples
///
/// ```rust
/// use component_registry::{ApplicationContext, ComponentDefinition, Resolver};
///
/// trait Panel: Send + Sync { fn title(&self) -> &str; }
/// struct Outline;
/// impl Panel for Outline { fn title(&self) -> &str { "Outline" } }
///
/// let ctx = ApplicationContext::new();
/// ctx.register(
///     ComponentDefinition::<Outline>::new()
///         .extends(["Panel"])
///         .constructor([], |_| Ok(Outline))
///         .view::<dyn Panel>(|o| o),
/// ).unwrap();
///
/// let instance = ctx.get_component("panel").unwrap();
/// assert_eq!(instance.view::<dyn Panel>().unwrap().title(), "Outline");
/// assert!(instance.view::<Outline>().is_ok());
/// assert!(instance.view::<String>().is_err());
/// ```
#[derive(Clone)]
pub struct Instance {
    key: ComponentKey,
    value: AnyArc,
    views: Arc<ViewTable>,
}

impl Instance {
    pub(crate) fn new(key: ComponentKey, value: AnyArc, views: Arc<ViewTable>) -> Self {
        Self { key, value, views }
    }

    /// Key of the concrete component this instance was built for.
    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    /// Projects the instance to `Arc<V>`, where `V` is the concrete type or a declared view.
    pub fn view<V: ?Sized + Send + Sync + 'static>(&self) -> RegistryResult<Arc<V>> {
        self.views
            .project::<V>(&self.value)
            .ok_or_else(|| RegistryError::TypeMismatch {
                key: self.key.clone(),
                expected: std::any::type_name::<V>(),
            })
    }

    /// Whether two instances are the same object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("key", &self.key)
            .field("views", &self.views.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> String;
    }

    struct Tab(u8);

    impl Named for Tab {
        fn name(&self) -> String {
            format!("tab-{}", self.0)
        }
    }

    fn tab_instance() -> Instance {
        let mut views = ViewTable::of::<Tab>();
        views.insert::<Tab, dyn Named>(|tab| tab);
        Instance::new(ComponentKey::new("Tab"), Arc::new(Tab(3)), Arc::new(views))
    }

    #[test]
    fn projects_concrete_and_trait_views() {
        let instance = tab_instance();
        assert_eq!(instance.view::<Tab>().unwrap().0, 3);
        assert_eq!(instance.view::<dyn Named>().unwrap().name(), "tab-3");
    }

    #[test]
    fn views_share_the_same_object() {
        let instance = tab_instance();
        let concrete = instance.view::<Tab>().unwrap();
        let again = instance.clone().view::<Tab>().unwrap();
        assert!(Arc::ptr_eq(&concrete, &again));
    }

    #[test]
    fn undeclared_view_is_type_mismatch() {
        let instance = tab_instance();
        match instance.view::<String>() {
            Err(RegistryError::TypeMismatch { key, expected }) => {
                assert_eq!(key.as_str(), "tab");
                assert!(expected.contains("String"));
            }
            other => panic!("expected TypeMismatch, got {:?}", other.map(|_| ())),
        }
    }
}
