//! Component key types for the registry.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Case-insensitive identifier of a registered component.
///
/// Keys are stored lower-cased, so `"Editor"`, `"EDITOR"` and `"editor"` all
/// name the same component. Cloning a key is a reference-count bump.
///
/// Every key source applies the same normalization: characters that are not
/// alphanumeric or `_` are dropped, then the rest is lower-cased. A declared
/// `"status-bar"` and an external `"StatusBar"` therefore name one component.
///
/// # Key sources
///
/// - **Declared names**: [`ComponentKey::new`].
/// - **Rust types**: [`ComponentKey::of`] uses the type's short name
///   (`my_app::views::Editor<T>` becomes `editor`).
/// - **External callers**: [`ComponentKey::from_external`].
///
/// # Examples
///
/// ```rust
/// use component_registry::ComponentKey;
///
/// struct StatusBar;
///
/// assert_eq!(ComponentKey::new("StatusBar"), ComponentKey::of::<StatusBar>());
/// assert_eq!(ComponentKey::from_external("status-bar").as_str(), "statusbar");
/// assert_eq!(ComponentKey::new("status-bar"), ComponentKey::from_external("Status.Bar"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey(Arc<str>);

impl ComponentKey {
    /// Creates a key from a declared name.
    pub fn new(name: &str) -> Self {
        ComponentKey(Arc::from(normalize(name)))
    }

    /// Creates a key from a name supplied by an external caller, such as a
    /// hyphenated markup attribute. Normalizes exactly like [`ComponentKey::new`].
    pub fn from_external(name: &str) -> Self {
        Self::new(name)
    }

    /// Creates a key from a Rust type's short name.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(short_type_name(std::any::type_name::<T>()))
    }

    /// The normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Strips module paths and generic arguments from a `type_name` result.
fn short_type_name(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(idx) => &full[..idx],
        None => full,
    };
    let base = base.trim_start_matches("dyn ");
    match base.rfind("::") {
        Some(idx) => &base[idx + 2..],
        None => base,
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKey({})", self.0)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ComponentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentKey {
    fn from(name: &str) -> Self {
        ComponentKey::new(name)
    }
}

impl From<String> for ComponentKey {
    fn from(name: String) -> Self {
        ComponentKey::new(&name)
    }
}

impl From<&ComponentKey> for ComponentKey {
    fn from(key: &ComponentKey) -> Self {
        key.clone()
    }
}
