//! # Capability Registry
//!
//! A service locator that lets optional implementations of the
//! [capability contracts](crate::interfaces) be plugged into the host at
//! startup without the host depending on the concrete types.
//!
//! ## Lifecycle
//!
//! 1. Startup code calls `CapabilityRegistry::initialize()`
//! 2. Optional providers are bound with `register(key, capability)`
//! 3. Consumers look them up on demand through the [`shim`] accessors,
//!    handling absence as a normal outcome
//! 4. Tests call `reset()` to return to the empty state
//!
//! ```rust
//! use flowhost::capabilities::{shim, Capability, CapabilityRegistry};
//! use flowhost::providers::StaticFeatureManager;
//!
//! let registry = CapabilityRegistry::new();
//! registry.initialize();
//! assert!(!shim::is_feature_enabled(&registry, "sso", None));
//!
//! registry.register_capability(Capability::feature_manager(StaticFeatureManager::new(["sso"])));
//! assert!(shim::is_feature_enabled(&registry, "sso", None));
//! ```

pub mod capability;
pub mod registry;
pub mod shim;

pub use capability::{keys, Capability, CapabilityKind};
pub use registry::CapabilityRegistry;
