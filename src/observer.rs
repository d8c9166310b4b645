//! Diagnostic observers for registration and resolution events.
//!
//! Observers are how a host sees what the registry is doing during
//! bootstrap: which components were registered, what got resolved and how
//! long it took, and which request failed with what error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::RegistryError;
use crate::key::ComponentKey;

/// Observer trait for registry events.
///
/// Observer calls are made synchronously on the registering or resolving
/// thread. Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ComponentDefinition, ComponentKey, RegistryError, RegistryObserver, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl RegistryObserver for Recorder {
///     fn resolved(&self, key: &ComponentKey, _duration: Duration) {
///         self.0.lock().unwrap().push(key.to_string());
///     }
/// }
///
/// struct Status;
///
/// let recorder = Arc::new(Recorder::default());
/// let ctx = ApplicationContext::new();
/// ctx.add_observer(recorder.clone());
/// ctx.register(ComponentDefinition::<Status>::new().constructor([], |_| Ok(Status))).unwrap();
/// ctx.get_component("status").unwrap();
///
/// assert_eq!(*recorder.0.lock().unwrap(), vec!["status".to_string()]);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// Called after a key was registered (concrete or abstract).
    fn registered(&self, _key: &ComponentKey) {}

    /// Called when a single or collection resolution starts.
    fn resolving(&self, _key: &ComponentKey) {}

    /// Called when a resolution completed successfully.
    fn resolved(&self, _key: &ComponentKey, _duration: Duration) {}

    /// Called when a resolution failed; the error still propagates.
    fn failed(&self, _key: &ComponentKey, _error: &RegistryError) {}
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn registered(&self, key: &ComponentKey) {
        for observer in &self.observers {
            observer.registered(key);
        }
    }

    pub(crate) fn resolving(&self, key: &ComponentKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &ComponentKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn failed(&self, key: &ComponentKey, error: &RegistryError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Registration and resolution go out at `DEBUG`, failures at `WARN`. The
/// library never installs a subscriber; the host decides where events go.
///
/// ```
/// use component_registry::{ApplicationContext, TracingObserver};
/// use std::sync::Arc;
///
/// let ctx = ApplicationContext::new();
/// ctx.add_observer(Arc::new(TracingObserver::new()));
/// ```
pub struct TracingObserver {
    target: &'static str,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            target: "component_registry",
        }
    }

    /// Tag events with a custom label, e.g. the host application's name.
    pub fn with_label(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for TracingObserver {
    fn registered(&self, key: &ComponentKey) {
        tracing::debug!(label = self.target, component = %key, "component registered");
    }

    fn resolving(&self, key: &ComponentKey) {
        tracing::trace!(label = self.target, component = %key, "resolving");
    }

    fn resolved(&self, key: &ComponentKey, duration: Duration) {
        tracing::debug!(label = self.target, component = %key, ?duration, "resolved");
    }

    fn failed(&self, key: &ComponentKey, error: &RegistryError) {
        tracing::warn!(label = self.target, component = %key, %error, "resolution failed");
    }
}

/// Observer that keeps simple counters.
#[derive(Default)]
pub struct MetricsObserver {
    registrations: AtomicU64,
    resolutions: AtomicU64,
    failures: AtomicU64,
    total_resolution_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration_count(&self) -> u64 {
        self.registrations.load(Ordering::Relaxed)
    }

    pub fn resolution_count(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_resolution_nanos.load(Ordering::Relaxed))
    }
}

impl RegistryObserver for MetricsObserver {
    fn registered(&self, _key: &ComponentKey) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    fn resolved(&self, _key: &ComponentKey, duration: Duration) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        // Saturates instead of wrapping
        let _ = self
            .total_resolution_nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| Some(total.saturating_add(nanos)));
    }

    fn failed(&self, _key: &ComponentKey, _error: &RegistryError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}
