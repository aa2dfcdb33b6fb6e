//! Per-region lock registry
//!
//! The change token is globally scoped per region, so token-consuming
//! exchanges must be serialized per region within the process. The registry
//! owns that state explicitly instead of hiding it in a global.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-scoped registry mapping region identifiers to exchange locks.
///
/// Locks are created lazily with insert-if-absent semantics, so two callers
/// racing on first use of a region always end up sharing the same lock.
/// Cloning the registry shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The exchange lock for `region`, creating it on first use.
    pub fn lock_for(&self, region: &str) -> Arc<tokio::sync::Mutex<()>> {
        // The map stays consistent even if a holder panicked mid-insert, so
        // recover from poisoning instead of propagating the panic.
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(region.to_string()).or_default().clone()
    }
}
