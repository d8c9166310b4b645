//! Fan-out of a base key into all of its implementations.

use crate::descriptors::ComponentDescriptor;
use crate::error::RegistryResult;
use crate::instance::Instance;
use crate::key::ComponentKey;
use crate::traits::ResolverCore;

/// Resolves the ordered instance list behind a key.
///
/// Collection dependencies and variadic dependencies both come through here
/// and therefore see the same elements in the same order.
pub(crate) struct CollectionResolver<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> CollectionResolver<'a> {
    pub(crate) fn new(resolver: &'a dyn ResolverCore) -> Self {
        Self { resolver }
    }

    /// Keys making up the collection: the key itself when concrete, then
    /// every derived key in registration order.
    pub(crate) fn members(descriptor: &ComponentDescriptor) -> Vec<ComponentKey> {
        let mut members = Vec::with_capacity(descriptor.derived_keys.len() + 1);
        if descriptor.is_concrete {
            members.push(descriptor.key.clone());
        }
        members.extend(descriptor.derived_keys.iter().cloned());
        members
    }

    /// Resolves each member as a single instance.
    pub(crate) fn resolve_all(&self, members: &[ComponentKey]) -> RegistryResult<Vec<Instance>> {
        members
            .iter()
            .map(|key| self.resolver.resolve_component(key))
            .collect()
    }
}
