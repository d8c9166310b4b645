//! Declared dependencies, injection points and resolved argument lists.
//!
//! Components never discover their dependencies by introspection: each
//! constructor and injection method carries an explicit, ordered list of
//! [`Dependency`] declarations. At resolution time the binder turns that list
//! into [`Args`], which the constructor or hook reads positionally.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{RegistryError, RegistryResult};
use crate::instance::{AnyArc, Instance};
use crate::key::ComponentKey;

/// How many instances a dependency resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one instance (a base key must have a single implementation)
    Single,
    /// Every implementation of the key, in registration order
    Collection,
}

/// One declared dependency of a constructor or injection method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub key: ComponentKey,
    pub cardinality: Cardinality,
    /// Collection elements are passed as separate trailing arguments
    pub spread: bool,
}

impl Dependency {
    /// A single-instance dependency.
    pub fn single(key: impl Into<ComponentKey>) -> Self {
        Self {
            key: key.into(),
            cardinality: Cardinality::Single,
            spread: false,
        }
    }

    /// All implementations of `key`, bound to one sequence argument.
    pub fn collection(key: impl Into<ComponentKey>) -> Self {
        Self {
            key: key.into(),
            cardinality: Cardinality::Collection,
            spread: false,
        }
    }

    /// All implementations of `key`, appended as trailing positional arguments.
    pub fn variadic(key: impl Into<ComponentKey>) -> Self {
        Self {
            key: key.into(),
            cardinality: Cardinality::Collection,
            spread: true,
        }
    }
}

/// Where an injection point sits in a component's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionKind {
    Constructor,
    Method,
}

pub(crate) type ConstructorFn = Arc<dyn Fn(&Args) -> RegistryResult<AnyArc> + Send + Sync>;
pub(crate) type MethodFn = Arc<dyn Fn(&Instance, &Args) -> RegistryResult<()> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Invoker {
    Constructor(ConstructorFn),
    Method(MethodFn),
}

/// A constructor or method that receives resolved dependencies.
///
/// Method points are declared against the owner key they belong to and may
/// be typed on any view of the instance, so a base key can declare a hook
/// typed on `dyn Trait` and have it applied to every implementation.
///
/// # Examples
///
/// ```rust
/// use component_registry::{ApplicationContext, ComponentDefinition, Dependency, InjectionPoint, Resolver};
/// use std::sync::{Arc, Mutex};
///
/// trait View: Send + Sync { fn attach(&self, host: &str); }
/// struct Host;
/// struct Outline { host: Mutex<Option<String>> }
/// impl View for Outline {
///     fn attach(&self, host: &str) { *self.host.lock().unwrap() = Some(host.to_string()); }
/// }
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Host>::new().constructor([], |_| Ok(Host))).unwrap();
/// ctx.register_abstract("View", Vec::<&str>::new()).unwrap();
/// ctx.register_injection_point(InjectionPoint::method::<dyn View, _>(
///     "View",
///     "attach",
///     [Dependency::single("Host")],
///     |view, _args| { view.attach("host"); Ok(()) },
/// )).unwrap();
/// ctx.register(
///     ComponentDefinition::<Outline>::new()
///         .extends(["View"])
///         .constructor([], |_| Ok(Outline { host: Mutex::new(None) }))
///         .view::<dyn View>(|o| o),
/// ).unwrap();
///
/// let outline = ctx.get::<Outline>("outline").unwrap();
/// assert_eq!(outline.host.lock().unwrap().as_deref(), Some("host"));
/// ```
#[derive(Clone)]
pub struct InjectionPoint {
    pub(crate) owner: ComponentKey,
    pub(crate) member: String,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) is_post_construct: bool,
    pub(crate) invoker: Invoker,
}

impl InjectionPoint {
    /// Injection method invoked on the `V` view of the instance.
    pub fn method<V, F>(
        owner: impl Into<ComponentKey>,
        member: impl Into<String>,
        dependencies: impl IntoIterator<Item = Dependency>,
        inject: F,
    ) -> Self
    where
        V: ?Sized + Send + Sync + 'static,
        F: Fn(&V, &Args) -> RegistryResult<()> + Send + Sync + 'static,
    {
        Self::typed_method(owner, member, dependencies, false, inject)
    }

    /// Post-construct hook, run once every injection of the instance is done.
    pub fn post_construct<V, F>(
        owner: impl Into<ComponentKey>,
        member: impl Into<String>,
        dependencies: impl IntoIterator<Item = Dependency>,
        hook: F,
    ) -> Self
    where
        V: ?Sized + Send + Sync + 'static,
        F: Fn(&V, &Args) -> RegistryResult<()> + Send + Sync + 'static,
    {
        Self::typed_method(owner, member, dependencies, true, hook)
    }

    fn typed_method<V, F>(
        owner: impl Into<ComponentKey>,
        member: impl Into<String>,
        dependencies: impl IntoIterator<Item = Dependency>,
        is_post_construct: bool,
        f: F,
    ) -> Self
    where
        V: ?Sized + Send + Sync + 'static,
        F: Fn(&V, &Args) -> RegistryResult<()> + Send + Sync + 'static,
    {
        let method: MethodFn = Arc::new(move |instance: &Instance, args: &Args| {
            let target = instance.view::<V>()?;
            f(&target, args)
        });
        Self {
            owner: owner.into(),
            member: member.into(),
            dependencies: dependencies.into_iter().collect(),
            is_post_construct,
            invoker: Invoker::Method(method),
        }
    }

    pub fn owner(&self) -> &ComponentKey {
        &self.owner
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn kind(&self) -> InjectionKind {
        match self.invoker {
            Invoker::Constructor(_) => InjectionKind::Constructor,
            Invoker::Method(_) => InjectionKind::Method,
        }
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn is_post_construct(&self) -> bool {
        self.is_post_construct
    }

    /// Checks the declaration shape: a spread dependency may only come last.
    pub(crate) fn check(&self) -> RegistryResult<()> {
        let last = self.dependencies.len().saturating_sub(1);
        for (index, dependency) in self.dependencies.iter().enumerate() {
            if dependency.spread && dependency.cardinality != Cardinality::Collection {
                return Err(self.invalid(format!(
                    "{}: spread dependency on {} must be a collection",
                    self.member, dependency.key
                )));
            }
            if dependency.spread && index != last {
                return Err(self.invalid(format!(
                    "{}: spread dependency on {} must be the last argument",
                    self.member, dependency.key
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> RegistryError {
        RegistryError::InvalidDeclaration {
            key: self.owner.clone(),
            reason,
        }
    }
}

impl std::fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("owner", &self.owner)
            .field("member", &self.member)
            .field("kind", &self.kind())
            .field("dependencies", &self.dependencies)
            .field("is_post_construct", &self.is_post_construct)
            .finish()
    }
}

/// One resolved positional argument.
#[derive(Debug, Clone)]
pub enum Arg {
    Single(Instance),
    Collection(Vec<Instance>),
}

/// Resolved arguments handed to a constructor or injection method.
///
/// Arguments are positional and follow the declared dependency order. A
/// variadic dependency contributes one [`Arg::Single`] per element at the end
/// of the list.
#[derive(Debug, Clone, Default)]
pub struct Args {
    args: SmallVec<[Arg; 4]>,
}

impl Args {
    pub(crate) fn push(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Raw argument at `index`.
    pub fn get(&self, index: usize) -> RegistryResult<&Arg> {
        self.args.get(index).ok_or(RegistryError::MissingArgument {
            index,
            len: self.args.len(),
        })
    }

    /// Instance bound at `index`.
    pub fn instance(&self, index: usize) -> RegistryResult<&Instance> {
        match self.get(index)? {
            Arg::Single(instance) => Ok(instance),
            Arg::Collection(_) => Err(RegistryError::MissingArgument {
                index,
                len: self.args.len(),
            }),
        }
    }

    /// Single argument at `index`, projected to `Arc<V>`.
    pub fn single<V: ?Sized + Send + Sync + 'static>(&self, index: usize) -> RegistryResult<Arc<V>> {
        self.instance(index)?.view::<V>()
    }

    /// Collection argument at `index`, each element projected to `Arc<V>`.
    pub fn collection<V: ?Sized + Send + Sync + 'static>(
        &self,
        index: usize,
    ) -> RegistryResult<Vec<Arc<V>>> {
        match self.get(index)? {
            Arg::Collection(items) => items.iter().map(Instance::view::<V>).collect(),
            Arg::Single(_) => Err(RegistryError::MissingArgument {
                index,
                len: self.args.len(),
            }),
        }
    }

    /// Trailing single arguments from `start` onward (variadic dependencies).
    pub fn rest<V: ?Sized + Send + Sync + 'static>(&self, start: usize) -> RegistryResult<Vec<Arc<V>>> {
        (start..self.args.len()).map(|index| self.single::<V>(index)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }
}
