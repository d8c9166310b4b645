//! # component-registry
//!
//! An in-process component registry: a small dependency-injection runtime
//! that wires components together by declared identity.
//!
//! ## Features
//!
//! - **Declared dependencies**: constructors and injection methods list the keys they need
//! - **Scopes**: Singleton (one per context) and Prototype (fresh per resolution)
//! - **Hierarchy polymorphism**: a base key resolves to its only implementation or fans out to all of them
//! - **Method injection**: applied most-derived level first, followed by post-construct hooks
//! - **Thread-safe**: singletons are constructed exactly once, cycles are reported with their path
//!
//! ## Quick Start
//!
//! ```rust
//! use component_registry::{ApplicationContext, ComponentDefinition, Dependency, Resolver};
//! use std::sync::Arc;
//!
//! trait Panel: Send + Sync {
//!     fn title(&self) -> &str;
//! }
//!
//! struct Explorer;
//! impl Panel for Explorer {
//!     fn title(&self) -> &str { "Explorer" }
//! }
//!
//! struct Search;
//! impl Panel for Search {
//!     fn title(&self) -> &str { "Search" }
//! }
//!
//! struct Sidebar {
//!     panels: Vec<Arc<dyn Panel>>,
//! }
//!
//! let ctx = ApplicationContext::new();
//! ctx.register(
//!     ComponentDefinition::<Explorer>::new()
//!         .extends(["Panel"])
//!         .constructor([], |_| Ok(Explorer))
//!         .view::<dyn Panel>(|p| p),
//! ).unwrap();
//! ctx.register(
//!     ComponentDefinition::<Search>::new()
//!         .extends(["Panel"])
//!         .constructor([], |_| Ok(Search))
//!         .view::<dyn Panel>(|p| p),
//! ).unwrap();
//! ctx.register(
//!     ComponentDefinition::<Sidebar>::new()
//!         .constructor([Dependency::collection("Panel")], |args| {
//!             Ok(Sidebar { panels: args.collection(0)? })
//!         }),
//! ).unwrap();
//!
//! let sidebar = ctx.get::<Sidebar>("sidebar").unwrap();
//! let titles: Vec<&str> = sidebar.panels.iter().map(|p| p.title()).collect();
//! assert_eq!(titles, vec!["Explorer", "Search"]);
//!
//! // Two implementations: a single request on the base is ambiguous
//! assert!(ctx.get_component("Panel").is_err());
//! ```
//!
//! ## Resolution Rules
//!
//! - A **concrete** key builds (or returns the cached) instance of its own type
//! - A **base** key with exactly one implementation resolves as that implementation
//! - A base key with several implementations fails with `AmbiguousComponent`
//! - `get_components` returns every implementation in registration order, the base first when it is concrete itself
//!
//! ## Logging
//!
//! Registration and scope events are emitted with `tracing`. Attach a
//! [`TracingObserver`] to also log every resolution with its duration.

// Module declarations
pub mod config;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod observer;
pub mod scope;
pub mod traits;
pub mod validation;

mod binder;
mod collection;
mod context;
mod definition;
mod injection;
mod instance;
mod registry;
mod scope_manager;

// Internal modules
mod internal;

// Re-exports
pub use config::ContextOptions;
pub use context::{ApplicationContext, ContextHandle};
pub use definition::ComponentDefinition;
pub use descriptors::ComponentDescriptor;
pub use error::{RegistryError, RegistryResult};
pub use injection::{Arg, Args, Cardinality, Dependency, InjectionKind, InjectionPoint};
pub use instance::Instance;
pub use key::ComponentKey;
pub use observer::{MetricsObserver, RegistryObserver, TracingObserver};
pub use registry::ComponentType;
pub use scope::Scope;
pub use traits::{Resolver, ResolverCore};
pub use validation::ValidationReport;
