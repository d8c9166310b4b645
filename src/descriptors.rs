//! Component descriptors for introspection and diagnostics.

use crate::key::ComponentKey;
use crate::scope::Scope;

/// Component descriptor for introspection and diagnostics
///
/// A snapshot of one registry entry: its key, scope and place in the
/// component hierarchy. Descriptors for base keys that were only ever seen in
/// an ancestor chain are non-concrete and carry no type name.
///
/// # Examples
///
/// ```rust
/// use component_registry::{ApplicationContext, ComponentDefinition, Scope};
///
/// struct Console;
/// struct Problems;
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Console>::new().extends(["Panel"]).constructor([], |_| Ok(Console))).unwrap();
/// ctx.register(ComponentDefinition::<Problems>::new().extends(["Panel"]).constructor([], |_| Ok(Problems))).unwrap();
///
/// let panel = ctx.descriptor("Panel").unwrap();
/// assert!(!panel.is_concrete);
/// assert_eq!(panel.derived_names(), vec!["console", "problems"]);
///
/// let console = ctx.descriptor("Console").unwrap();
/// assert!(console.is_concrete);
/// assert_eq!(console.scope, Scope::Singleton);
/// assert_eq!(console.ancestor_keys[0].as_str(), "panel");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// Component key
    pub key: ComponentKey,
    /// Concrete Rust type name, `None` for pure bases
    pub type_name: Option<&'static str>,
    /// Instantiation scope
    pub scope: Scope,
    /// Whether the key was registered directly with a concrete type
    pub is_concrete: bool,
    /// Ancestors from immediate parent to root
    pub ancestor_keys: Vec<ComponentKey>,
    /// Keys registered below this one, in registration order
    pub derived_keys: Vec<ComponentKey>,
}

impl ComponentDescriptor {
    pub(crate) fn new_abstract(key: ComponentKey, ancestor_keys: Vec<ComponentKey>, scope: Scope) -> Self {
        Self {
            key,
            type_name: None,
            scope,
            is_concrete: false,
            ancestor_keys,
            derived_keys: Vec::new(),
        }
    }

    /// Whether `ancestor` appears in this descriptor's ancestor chain.
    pub fn extends(&self, ancestor: &ComponentKey) -> bool {
        self.ancestor_keys.contains(ancestor)
    }

    /// Derived keys as plain strings.
    pub fn derived_names(&self) -> Vec<&str> {
        self.derived_keys.iter().map(ComponentKey::as_str).collect()
    }
}
