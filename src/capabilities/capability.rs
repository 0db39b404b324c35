//! Capability — a handle to one implementation of a capability contract.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interfaces::{AuthProvider, FeatureManager, FlowRepository, Logger};

/// Well-known registry keys, one per capability contract.
pub mod keys {
    pub const FLOW_REPOSITORY: &str = "flowRepository";
    pub const AUTH_PROVIDER: &str = "authProvider";
    pub const FEATURE_MANAGER: &str = "featureManager";
    pub const LOGGER: &str = "logger";
}

/// The contract a [`Capability`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityKind {
    FlowRepository,
    AuthProvider,
    FeatureManager,
    Logger,
}

impl CapabilityKind {
    /// All kinds, in registry-key order.
    pub const ALL: [CapabilityKind; 4] = [
        CapabilityKind::AuthProvider,
        CapabilityKind::FeatureManager,
        CapabilityKind::FlowRepository,
        CapabilityKind::Logger,
    ];

    /// The registry key this kind is conventionally bound to.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FlowRepository => keys::FLOW_REPOSITORY,
            Self::AuthProvider => keys::AUTH_PROVIDER,
            Self::FeatureManager => keys::FEATURE_MANAGER,
            Self::Logger => keys::LOGGER,
        }
    }

    /// Parse a well-known registry key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A registered capability implementation.
///
/// Cloning is cheap: every variant holds a shared trait object.
#[derive(Clone)]
pub enum Capability {
    FlowRepository(Arc<dyn FlowRepository>),
    AuthProvider(Arc<dyn AuthProvider>),
    FeatureManager(Arc<dyn FeatureManager>),
    Logger(Arc<dyn Logger>),
}

impl Capability {
    pub fn flow_repository(repository: impl FlowRepository + 'static) -> Self {
        Self::FlowRepository(Arc::new(repository))
    }

    pub fn auth_provider(provider: impl AuthProvider + 'static) -> Self {
        Self::AuthProvider(Arc::new(provider))
    }

    pub fn feature_manager(manager: impl FeatureManager + 'static) -> Self {
        Self::FeatureManager(Arc::new(manager))
    }

    pub fn logger(logger: impl Logger + 'static) -> Self {
        Self::Logger(Arc::new(logger))
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::FlowRepository(_) => CapabilityKind::FlowRepository,
            Self::AuthProvider(_) => CapabilityKind::AuthProvider,
            Self::FeatureManager(_) => CapabilityKind::FeatureManager,
            Self::Logger(_) => CapabilityKind::Logger,
        }
    }

    /// Whether two handles point at the same implementation.
    pub fn ptr_eq(&self, other: &Capability) -> bool {
        match (self, other) {
            (Self::FlowRepository(a), Self::FlowRepository(b)) => Arc::ptr_eq(a, b),
            (Self::AuthProvider(a), Self::AuthProvider(b)) => Arc::ptr_eq(a, b),
            (Self::FeatureManager(a), Self::FeatureManager(b)) => Arc::ptr_eq(a, b),
            (Self::Logger(a), Self::Logger(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_key_round_trip() {
        for kind in CapabilityKind::ALL {
            assert_eq!(CapabilityKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(CapabilityKind::from_key("metrics"), None);
    }

    #[test]
    fn test_kind_serializes_as_registry_key() {
        let json = serde_json::to_value(CapabilityKind::FlowRepository).unwrap();
        assert_eq!(json, "flowRepository");
        assert_eq!(CapabilityKind::FeatureManager.to_string(), "featureManager");
    }
}
