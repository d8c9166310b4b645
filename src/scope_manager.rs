//! Singleton instance cache and scope decisions.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{RegistryError, RegistryResult};
use crate::instance::Instance;
use crate::key::ComponentKey;
use crate::registry::Map;
use crate::scope::Scope;

/// Owns the singleton cache.
///
/// The cache is the only owner of singleton instances: entries are created
/// lazily, never replaced, and dropped only when the context shuts down.
/// Callers serialize resolution (see `ApplicationContext`), so the
/// check-then-insert in [`get_or_create`](ScopeManager::get_or_create) never
/// races with another construction of the same key.
pub(crate) struct ScopeManager {
    singletons: Mutex<Map<ComponentKey, Instance>>,
    /// Keys with at least one instance ever created, any scope
    instantiated: Mutex<HashSet<ComponentKey>>,
    /// Set by `clear`; nothing is cached afterwards
    closed: AtomicBool,
}

impl ScopeManager {
    pub(crate) fn new() -> Self {
        Self {
            singletons: Mutex::new(Map::default()),
            instantiated: Mutex::new(HashSet::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Cached singleton or a fresh instance from `factory`.
    ///
    /// No lock is held while `factory` runs; it recursively resolves the
    /// instance's own dependencies through the same manager.
    pub(crate) fn get_or_create<F>(&self, key: &ComponentKey, scope: Scope, factory: F) -> RegistryResult<Instance>
    where
        F: FnOnce() -> RegistryResult<Instance>,
    {
        match scope {
            Scope::Singleton => {
                if let Some(cached) = self.cached(key) {
                    return Ok(cached);
                }

                let created = factory()?;

                // The factory may have shut the context down on this thread
                if self.closed.load(Ordering::SeqCst) {
                    return Err(RegistryError::ContextShutDown);
                }

                // Double-checked insert: the first stored instance wins
                let mut cache = self.singletons.lock();
                let stored = cache.entry(key.clone()).or_insert(created).clone();
                drop(cache);
                self.instantiated.lock().insert(key.clone());
                Ok(stored)
            }
            Scope::Prototype => {
                let created = factory()?;
                self.instantiated.lock().insert(key.clone());
                Ok(created)
            }
        }
    }

    pub(crate) fn cached(&self, key: &ComponentKey) -> Option<Instance> {
        self.singletons.lock().get(key).cloned()
    }

    /// Stores an already-built singleton (used for the context's own handle).
    pub(crate) fn seed(&self, key: ComponentKey, instance: Instance) {
        self.singletons.lock().insert(key.clone(), instance);
        self.instantiated.lock().insert(key);
    }

    /// Whether any instance of `key` was ever created; freezes its scope.
    pub(crate) fn is_instantiated(&self, key: &ComponentKey) -> bool {
        self.instantiated.lock().contains(key)
    }

    /// Drops every cached singleton and stops caching new ones, returning
    /// how many were held.
    pub(crate) fn clear(&self) -> usize {
        self.closed.store(true, Ordering::SeqCst);
        let mut cache = self.singletons.lock();
        let count = cache.len();
        cache.clear();
        count
    }
}
