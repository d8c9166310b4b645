//! Cyclic dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{RegistryError, RegistryResult};
use crate::key::ComponentKey;

// Thread-local in-progress path for the resolution chain running on this thread
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    /// (context id, key) of every component currently being built
    stack: Vec<(usize, ComponentKey)>,
}

/// Marks a key as in progress for as long as the guard lives.
///
/// Entries are tagged with the owning context so two contexts resolving on
/// the same thread never see each other's keys.
pub(crate) struct ResolutionGuard {
    context: usize,
}

impl ResolutionGuard {
    pub(crate) fn enter(context: usize, key: &ComponentKey, max_depth: usize) -> RegistryResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Cycle detection BEFORE pushing the new key
            if let Some(start) = tls
                .stack
                .iter()
                .position(|(ctx, k)| *ctx == context && k == key)
            {
                let mut path: Vec<ComponentKey> = tls.stack[start..]
                    .iter()
                    .filter(|(ctx, _)| *ctx == context)
                    .map(|(_, k)| k.clone())
                    .collect();
                path.push(key.clone());
                return Err(RegistryError::CyclicDependency(path));
            }

            let depth = tls.stack.iter().filter(|(ctx, _)| *ctx == context).count();
            if depth >= max_depth {
                return Err(RegistryError::DepthExceeded(depth));
            }

            tls.stack.push((context, key.clone()));
            Ok(())
        })?;

        Ok(Self { context })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(pos) = tls.stack.iter().rposition(|(ctx, _)| *ctx == self.context) {
                tls.stack.remove(pos);
            }
        });
    }
}
