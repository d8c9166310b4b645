//! Context configuration.
//!
//! Options are plain data. With the `config` feature they derive serde's
//! traits so a host can load them from its own configuration file; the core
//! never reads the environment.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Default bound on nested resolution depth.
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 1024;

/// Options for an [`ApplicationContext`](crate::ApplicationContext).
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ContextOptions, Scope};
///
/// let options = ContextOptions {
///     default_scope: Scope::Prototype,
///     ..ContextOptions::default()
/// };
/// let ctx = ApplicationContext::with_options(options);
/// assert_eq!(ctx.options().default_scope, Scope::Prototype);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContextOptions {
    /// Nested resolutions deeper than this fail with `DepthExceeded`
    pub max_resolution_depth: usize,
    /// Scope given to keys registered without an explicit one
    pub default_scope: Scope,
    /// Reject scope changes after first instantiation instead of ignoring them
    pub strict_scope_transitions: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            default_scope: Scope::Singleton,
            strict_scope_transitions: true,
        }
    }
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    pub fn with_default_scope(mut self, scope: Scope) -> Self {
        self.default_scope = scope;
        self
    }

    /// Lenient mode: late scope changes are logged and ignored.
    pub fn lenient_scope_transitions(mut self) -> Self {
        self.strict_scope_transitions = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ContextOptions::default();
        assert_eq!(options.max_resolution_depth, 1024);
        assert_eq!(options.default_scope, Scope::Singleton);
        assert!(options.strict_scope_transitions);
    }

    #[test]
    fn builder_methods() {
        let options = ContextOptions::new()
            .with_max_resolution_depth(8)
            .with_default_scope(Scope::Prototype)
            .lenient_scope_transitions();
        assert_eq!(options.max_resolution_depth, 8);
        assert_eq!(options.default_scope, Scope::Prototype);
        assert!(!options.strict_scope_transitions);
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_partial_json() {
        let options: ContextOptions =
            serde_json::from_str(r#"{ "default_scope": "prototype" }"#).unwrap();
        assert_eq!(options.default_scope, Scope::Prototype);
        assert_eq!(options.max_resolution_depth, 1024);
        assert!(options.strict_scope_transitions);

        let json = serde_json::to_string(&ContextOptions::default()).unwrap();
        assert!(json.contains("\"default_scope\":\"singleton\""));
    }
}
