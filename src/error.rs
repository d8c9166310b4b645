//! Error types for the component registry.

use std::fmt;

use crate::key::ComponentKey;
use crate::scope::Scope;

/// Registry errors
///
/// Every variant is raised synchronously at the registration or resolution
/// call that caused it and propagates straight to the caller. Nothing is
/// retried and no partially wired instance is ever cached.
///
/// # Examples
///
/// ```rust
/// use component_registry::{ApplicationContext, RegistryError, Resolver};
///
/// let ctx = ApplicationContext::new();
/// match ctx.get_component("editor") {
///     Err(RegistryError::UnknownComponent(key)) => assert_eq!(key.as_str(), "editor"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Key was never registered, not even as an ancestor
    UnknownComponent(ComponentKey),
    /// Single-instance request on a base key with several implementations
    AmbiguousComponent {
        key: ComponentKey,
        candidates: Vec<ComponentKey>,
    },
    /// Dependency cycle (path starts and ends with the repeated key)
    CyclicDependency(Vec<ComponentKey>),
    /// Scope change requested after the key was first instantiated
    InvalidScopeTransition {
        key: ComponentKey,
        from: Scope,
        to: Scope,
    },
    /// A declared dependency names a key nobody registered
    MissingDependencyBinding {
        owner: ComponentKey,
        dependency: ComponentKey,
    },
    /// Concrete type registered twice under the same key
    DuplicateComponent(ComponentKey),
    /// Malformed registration (bad ancestor chain, misplaced spread, ...)
    InvalidDeclaration {
        key: ComponentKey,
        reason: String,
    },
    /// Instance does not expose the requested view
    TypeMismatch {
        key: ComponentKey,
        expected: &'static str,
    },
    /// Constructor or hook read an argument that was not resolved
    MissingArgument { index: usize, len: usize },
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// A constructor or injection hook reported a failure
    ComponentFailed {
        key: ComponentKey,
        reason: String,
    },
    /// The context has been shut down
    ContextShutDown,
}

impl RegistryError {
    /// Convenience for constructors and hooks that need to report their own failure.
    pub fn component_failed(key: impl Into<ComponentKey>, reason: impl Into<String>) -> Self {
        RegistryError::ComponentFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// The key the error is about, when there is a single one.
    pub fn key(&self) -> Option<&ComponentKey> {
        match self {
            RegistryError::UnknownComponent(key)
            | RegistryError::AmbiguousComponent { key, .. }
            | RegistryError::InvalidScopeTransition { key, .. }
            | RegistryError::DuplicateComponent(key)
            | RegistryError::InvalidDeclaration { key, .. }
            | RegistryError::TypeMismatch { key, .. }
            | RegistryError::ComponentFailed { key, .. } => Some(key),
            RegistryError::MissingDependencyBinding { dependency, .. } => Some(dependency),
            RegistryError::CyclicDependency(path) => path.first(),
            RegistryError::MissingArgument { .. }
            | RegistryError::DepthExceeded(_)
            | RegistryError::ContextShutDown => None,
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownComponent(key) => write!(f, "Unknown component: {}", key),
            RegistryError::AmbiguousComponent { key, candidates } => {
                let names: Vec<&str> = candidates.iter().map(|k| k.as_str()).collect();
                write!(
                    f,
                    "Ambiguous component: {} has {} implementations ({})",
                    key,
                    candidates.len(),
                    names.join(", ")
                )
            }
            RegistryError::CyclicDependency(path) => {
                let names: Vec<&str> = path.iter().map(|k| k.as_str()).collect();
                write!(f, "Cyclic dependency: {}", names.join(" -> "))
            }
            RegistryError::InvalidScopeTransition { key, from, to } => write!(
                f,
                "Cannot change scope of {} from {:?} to {:?} after first instantiation",
                key, from, to
            ),
            RegistryError::MissingDependencyBinding { owner, dependency } => write!(
                f,
                "Missing dependency binding: {} depends on unregistered {}",
                owner, dependency
            ),
            RegistryError::DuplicateComponent(key) => {
                write!(f, "Component already registered: {}", key)
            }
            RegistryError::InvalidDeclaration { key, reason } => {
                write!(f, "Invalid declaration for {}: {}", key, reason)
            }
            RegistryError::TypeMismatch { key, expected } => {
                write!(f, "Type mismatch: {} does not provide {}", key, expected)
            }
            RegistryError::MissingArgument { index, len } => write!(
                f,
                "Missing argument: index {} requested, {} resolved",
                index, len
            ),
            RegistryError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            RegistryError::ComponentFailed { key, reason } => {
                write!(f, "Component {} failed: {}", key, reason)
            }
            RegistryError::ContextShutDown => write!(f, "Application context has been shut down"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
