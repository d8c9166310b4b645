//! Constructor, method and post-construct injection for one instance.

use crate::error::{RegistryError, RegistryResult};
use crate::injection::{Arg, Args, Cardinality, InjectionPoint, Invoker};
use crate::instance::Instance;
use crate::key::ComponentKey;
use crate::registry::WiringPlan;
use crate::traits::ResolverCore;

/// Builds and wires instances from a [`WiringPlan`].
///
/// Every dependency is resolved through the resolver it was created with, so
/// nested components go through the same caching, cycle detection and
/// hierarchy rules as top-level requests.
pub(crate) struct InjectionBinder<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> InjectionBinder<'a> {
    pub(crate) fn new(resolver: &'a dyn ResolverCore) -> Self {
        Self { resolver }
    }

    /// Constructs the instance, runs every injection, then every post-construct hook.
    pub(crate) fn wire(&self, plan: &WiringPlan) -> RegistryResult<Instance> {
        let instance = self.construct(plan)?;
        self.apply_injections(plan, &instance)?;
        self.apply_post_construct(plan, &instance)?;
        Ok(instance)
    }

    pub(crate) fn construct(&self, plan: &WiringPlan) -> RegistryResult<Instance> {
        let args = self.resolve_args(&plan.constructor)?;
        match &plan.constructor.invoker {
            Invoker::Constructor(construct) => {
                tracing::trace!(component = %plan.key, args = args.len(), "constructing");
                let value = construct(&args)?;
                Ok(Instance::new(plan.key.clone(), value, plan.views.clone()))
            }
            Invoker::Method(_) => Err(RegistryError::InvalidDeclaration {
                key: plan.key.clone(),
                reason: "constructor slot holds a method".to_string(),
            }),
        }
    }

    /// Method injections, most-derived level first, registration order within a level.
    pub(crate) fn apply_injections(&self, plan: &WiringPlan, instance: &Instance) -> RegistryResult<()> {
        self.walk(plan, instance, false)
    }

    /// Post-construct hooks, same walk as [`apply_injections`](Self::apply_injections).
    pub(crate) fn apply_post_construct(&self, plan: &WiringPlan, instance: &Instance) -> RegistryResult<()> {
        self.walk(plan, instance, true)
    }

    fn walk(&self, plan: &WiringPlan, instance: &Instance, post_construct: bool) -> RegistryResult<()> {
        for (level, points) in &plan.levels {
            for point in points.iter().filter(|p| p.is_post_construct == post_construct) {
                tracing::trace!(
                    component = %plan.key,
                    level = %level,
                    member = %point.member,
                    post_construct,
                    "invoking injection point"
                );
                self.invoke(point, instance)?;
            }
        }
        Ok(())
    }

    fn invoke(&self, point: &InjectionPoint, instance: &Instance) -> RegistryResult<()> {
        let args = self.resolve_args(point)?;
        match &point.invoker {
            Invoker::Method(method) => method(instance, &args),
            Invoker::Constructor(_) => Err(RegistryError::InvalidDeclaration {
                key: point.owner.clone(),
                reason: format!("method slot `{}` holds a constructor", point.member),
            }),
        }
    }

    /// Resolves a point's dependencies into positional arguments, in declared order.
    fn resolve_args(&self, point: &InjectionPoint) -> RegistryResult<Args> {
        let mut args = Args::default();
        for dependency in &point.dependencies {
            match (dependency.cardinality, dependency.spread) {
                (Cardinality::Single, _) => {
                    let instance = self
                        .resolver
                        .resolve_component(&dependency.key)
                        .map_err(|e| self.missing_binding(e, &point.owner, &dependency.key))?;
                    args.push(Arg::Single(instance));
                }
                (Cardinality::Collection, spread) => {
                    let items = self
                        .resolver
                        .resolve_components(&dependency.key)
                        .map_err(|e| self.missing_binding(e, &point.owner, &dependency.key))?;
                    if spread {
                        for item in items {
                            args.push(Arg::Single(item));
                        }
                    } else {
                        args.push(Arg::Collection(items));
                    }
                }
            }
        }
        Ok(args)
    }

    /// A dependency key nobody registered is a wiring error of the owner.
    /// Registered keys keep their own error, even a base with no implementations.
    fn missing_binding(&self, error: RegistryError, owner: &ComponentKey, dependency: &ComponentKey) -> RegistryError {
        match error {
            RegistryError::UnknownComponent(ref key) if key == dependency && !self.resolver.contains_component(key) => {
                RegistryError::MissingDependencyBinding {
                    owner: owner.clone(),
                    dependency: dependency.clone(),
                }
            }
            other => other,
        }
    }
}
