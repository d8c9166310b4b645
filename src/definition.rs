//! Typed builder for a complete component registration.

use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::injection::{Args, ConstructorFn, Dependency, InjectionPoint};
use crate::instance::ViewTable;
use crate::key::ComponentKey;
use crate::registry::ErasedType;
use crate::scope::Scope;

/// Everything needed to register one concrete component type `T`.
///
/// Collects the key, the ancestor chain, the constructor with its declared
/// dependencies, the views the instance is exposed through, and any method
/// injections and post-construct hooks. Registered in one step with
/// [`ApplicationContext::register`](crate::ApplicationContext::register):
/// either the whole definition is applied or none of it is.
///
/// The key defaults to the short name of `T`, lower-cased.
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ComponentDefinition, Dependency, Resolver, Scope};
/// use std::sync::{Arc, Mutex};
///
/// trait Panel: Send + Sync { fn title(&self) -> String; }
///
/// struct Output;
/// impl Panel for Output { fn title(&self) -> String { "Output".into() } }
///
/// struct Terminal { shell: Mutex<Option<String>> }
/// impl Panel for Terminal { fn title(&self) -> String { "Terminal".into() } }
///
/// struct Shell;
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Shell>::new().constructor([], |_| Ok(Shell))).unwrap();
/// ctx.register(
///     ComponentDefinition::<Output>::new()
///         .extends(["Panel"])
///         .constructor([], |_| Ok(Output))
///         .view::<dyn Panel>(|p| p),
/// ).unwrap();
/// ctx.register(
///     ComponentDefinition::<Terminal>::new()
///         .extends(["Panel"])
///         .constructor([], |_| Ok(Terminal { shell: Mutex::new(None) }))
///         .view::<dyn Panel>(|p| p)
///         .method("setShell", [Dependency::single("Shell")], |terminal, _args| {
///             *terminal.shell.lock().unwrap() = Some("sh".into());
///             Ok(())
///         })
///         .scope(Scope::Prototype),
/// ).unwrap();
///
/// let titles: Vec<String> = ctx.get_all::<dyn Panel>("Panel").unwrap().iter().map(|p| p.title()).collect();
/// assert_eq!(titles, vec!["Output", "Terminal"]);
/// ```
pub struct ComponentDefinition<T> {
    key: ComponentKey,
    ancestors: Vec<ComponentKey>,
    dependencies: Vec<Dependency>,
    constructor: Option<ConstructorFn>,
    views: ViewTable,
    points: Vec<InjectionPoint>,
    scope: Option<Scope>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

/// A definition taken apart for registration.
pub(crate) struct DefinitionParts {
    pub(crate) key: ComponentKey,
    pub(crate) ancestors: Vec<ComponentKey>,
    pub(crate) component: ErasedType,
    pub(crate) points: Vec<InjectionPoint>,
    pub(crate) scope: Option<Scope>,
}

impl<T: Send + Sync + 'static> ComponentDefinition<T> {
    pub fn new() -> Self {
        Self {
            key: ComponentKey::of::<T>(),
            ancestors: Vec::new(),
            dependencies: Vec::new(),
            constructor: None,
            views: ViewTable::of::<T>(),
            points: Vec::new(),
            scope: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Registers under `key` instead of the type's short name.
    pub fn named(mut self, key: impl Into<ComponentKey>) -> Self {
        self.key = key.into();
        self
    }

    /// Ancestor chain, immediate parent first, root last.
    pub fn extends<K: Into<ComponentKey>>(mut self, ancestors: impl IntoIterator<Item = K>) -> Self {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    /// Constructor receiving the resolved `dependencies` positionally.
    pub fn constructor<F>(mut self, dependencies: impl IntoIterator<Item = Dependency>, construct: F) -> Self
    where
        F: Fn(&Args) -> RegistryResult<T> + Send + Sync + 'static,
    {
        self.dependencies = dependencies.into_iter().collect();
        self.constructor = Some(Arc::new(move |args| Ok(Arc::new(construct(args)?))));
        self
    }

    /// Exposes instances as `Arc<V>` as well.
    pub fn view<V>(mut self, cast: impl Fn(Arc<T>) -> Arc<V> + Send + Sync + 'static) -> Self
    where
        V: ?Sized + Send + Sync + 'static,
    {
        self.views.insert::<T, V>(cast);
        self
    }

    /// Method injection, run after construction in declaration order.
    pub fn method<F>(mut self, member: impl Into<String>, dependencies: impl IntoIterator<Item = Dependency>, inject: F) -> Self
    where
        F: Fn(&T, &Args) -> RegistryResult<()> + Send + Sync + 'static,
    {
        self.points
            .push(InjectionPoint::method::<T, F>(self.key.clone(), member, dependencies, inject));
        self
    }

    /// Post-construct hook, run once every method injection has been applied.
    pub fn post_construct<F>(
        mut self,
        member: impl Into<String>,
        dependencies: impl IntoIterator<Item = Dependency>,
        hook: F,
    ) -> Self
    where
        F: Fn(&T, &Args) -> RegistryResult<()> + Send + Sync + 'static,
    {
        self.points
            .push(InjectionPoint::post_construct::<T, F>(self.key.clone(), member, dependencies, hook));
        self
    }

    /// Instantiation scope; the context default applies when unset.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    /// Checks the definition and splits it for the registry.
    pub(crate) fn into_parts(self) -> RegistryResult<DefinitionParts> {
        let constructor = self.constructor.ok_or_else(|| RegistryError::InvalidDeclaration {
            key: self.key.clone(),
            reason: "no constructor declared".to_string(),
        })?;

        let mut points = self.points;
        for point in &mut points {
            point.owner = self.key.clone();
            point.check()?;
        }

        Ok(DefinitionParts {
            key: self.key,
            ancestors: self.ancestors,
            component: ErasedType {
                type_name: std::any::type_name::<T>(),
                dependencies: self.dependencies,
                constructor,
                views: self.views,
            },
            points,
            scope: self.scope,
        })
    }
}

impl<T: Default + Send + Sync + 'static> ComponentDefinition<T> {
    /// Constructor with no dependencies, built from `Default`.
    pub fn default_constructor(self) -> Self {
        self.constructor([], |_| Ok(T::default()))
    }
}

impl<T: Send + Sync + 'static> Default for ComponentDefinition<T> {
    fn default() -> Self {
        Self::new()
    }
}
