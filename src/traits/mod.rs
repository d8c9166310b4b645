//! Core traits for the component registry.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
