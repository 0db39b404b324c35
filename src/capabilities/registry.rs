//! Capability Registry — key → implementation lookup for optional capabilities.
//!
//! The registry is an explicit object: components that need capability
//! lookup receive a `&CapabilityRegistry` (tests build their own). The host
//! process additionally owns one process-wide instance, reachable through
//! [`CapabilityRegistry::global`].
//!
//! Registration is a startup-time operation; afterwards the registry is
//! read concurrently. The map sits behind a read/write lock, concurrent
//! `register` calls for the same key resolve last-write-wins.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::capability::Capability;

static GLOBAL_REGISTRY: Lazy<CapabilityRegistry> = Lazy::new(CapabilityRegistry::new);

#[derive(Debug, Default)]
struct RegistryState {
    initialized: bool,
    entries: HashMap<String, Capability>,
}

/// Registry of capability implementations, indexed by key.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    state: RwLock<RegistryState>,
}

impl CapabilityRegistry {
    /// Create a new, uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static CapabilityRegistry {
        &GLOBAL_REGISTRY
    }

    /// Establish the registry in the empty state.
    ///
    /// Idempotent: on an already-initialized registry this is a no-op and
    /// existing registrations are kept.
    pub fn initialize(&self) {
        let mut state = self.state.write();
        if state.initialized {
            tracing::debug!(
                entries = state.entries.len(),
                "capability registry already initialized"
            );
            return;
        }
        state.initialized = true;
        tracing::debug!("capability registry initialized");
    }

    /// Whether `initialize` (or `register`) has run.
    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    /// Bind `capability` to `key`, replacing any previous binding.
    ///
    /// The key is not checked against the capability's contract; the
    /// typed accessors in [`shim`](super::shim) treat a mismatch as absent.
    pub fn register(&self, key: impl Into<String>, capability: Capability) {
        let key = key.into();
        let mut state = self.state.write();
        if !state.initialized {
            tracing::warn!(%key, "registering into an uninitialized capability registry");
            state.initialized = true;
        }
        let kind = capability.kind();
        if state.entries.insert(key.clone(), capability).is_some() {
            tracing::debug!(%key, %kind, "capability replaced");
        } else {
            tracing::debug!(%key, %kind, "capability registered");
        }
    }

    /// Bind `capability` under its contract's well-known key.
    pub fn register_capability(&self, capability: Capability) {
        let key = capability.kind().key();
        self.register(key, capability);
    }

    /// The capability bound to `key`, if any. Never fails.
    pub fn get(&self, key: &str) -> Option<Capability> {
        let state = self.state.read();
        if !state.initialized {
            tracing::debug!(%key, "capability lookup before registry initialization");
            return None;
        }
        state.entries.get(key).cloned()
    }

    /// Whether a capability is bound to `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.state.read().entries.contains_key(key)
    }

    /// All bound keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.read().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Get the total number of bound capabilities.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Drop every binding, leaving the registry initialized and empty.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.initialized = true;
        tracing::debug!("capability registry reset");
    }
}
