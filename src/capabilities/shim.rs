//! Typed accessors over the [`CapabilityRegistry`].
//!
//! Each accessor looks up its contract's well-known key and returns the
//! implementation, or `None` when nothing usable is registered. Absence is
//! the normal state of a host without optional providers, never an error.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use super::capability::{Capability, CapabilityKind};
use super::registry::CapabilityRegistry;
use crate::interfaces::{AuthProvider, FeatureManager, FlowRepository, Logger};

/// The flow repository, if registered.
pub fn flow_repository(registry: &CapabilityRegistry) -> Option<Arc<dyn FlowRepository>> {
    match lookup(registry, CapabilityKind::FlowRepository)? {
        Capability::FlowRepository(repository) => Some(repository),
        _ => None,
    }
}

/// The authentication provider, if registered.
pub fn auth_provider(registry: &CapabilityRegistry) -> Option<Arc<dyn AuthProvider>> {
    match lookup(registry, CapabilityKind::AuthProvider)? {
        Capability::AuthProvider(provider) => Some(provider),
        _ => None,
    }
}

/// The feature manager, if registered.
pub fn feature_manager(registry: &CapabilityRegistry) -> Option<Arc<dyn FeatureManager>> {
    match lookup(registry, CapabilityKind::FeatureManager)? {
        Capability::FeatureManager(manager) => Some(manager),
        _ => None,
    }
}

/// The logger, if registered.
pub fn logger(registry: &CapabilityRegistry) -> Option<Arc<dyn Logger>> {
    match lookup(registry, CapabilityKind::Logger)? {
        Capability::Logger(logger) => Some(logger),
        _ => None,
    }
}

/// Check if a feature is enabled.
///
/// Features are closed by default: without a registered feature manager
/// every feature is disabled.
pub fn is_feature_enabled(
    registry: &CapabilityRegistry,
    feature_name: &str,
    context: Option<&Value>,
) -> bool {
    feature_manager(registry)
        .map(|manager| manager.is_feature_enabled(feature_name, context))
        .unwrap_or(false)
}

/// All enabled features; empty without a registered feature manager.
pub fn enabled_features(registry: &CapabilityRegistry, context: Option<&Value>) -> BTreeSet<String> {
    feature_manager(registry)
        .map(|manager| manager.enabled_features(context))
        .unwrap_or_default()
}

fn lookup(registry: &CapabilityRegistry, kind: CapabilityKind) -> Option<Capability> {
    let capability = registry.get(kind.key())?;
    if capability.kind() != kind {
        tracing::warn!(
            key = kind.key(),
            registered = %capability.kind(),
            "capability registered under a key of another contract; ignoring it"
        );
        return None;
    }
    Some(capability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::capability::keys;
    use crate::interfaces::{AuthError, AuthOutcome};
    use crate::providers::{InMemoryFlowRepository, StaticFeatureManager, TracingLogger};
    use async_trait::async_trait;
    use serde_json::json;

    struct SingleUserAuth;

    #[async_trait]
    impl AuthProvider for SingleUserAuth {
        async fn initialize(&self) -> Result<(), AuthError> {
            Ok(())
        }

        async fn authenticate(&self, credentials: &Value) -> Result<AuthOutcome, AuthError> {
            if credentials["password"] == "hunter2" {
                Ok(AuthOutcome::new(json!({"id": "admin"})).with_token("tok"))
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }

        async fn verify_token(&self, token: &str) -> Result<Option<Value>, AuthError> {
            Ok((token == "tok").then(|| json!({"id": "admin"})))
        }
    }

    fn empty_registry() -> CapabilityRegistry {
        let registry = CapabilityRegistry::new();
        registry.initialize();
        registry
    }

    #[test]
    fn test_accessors_absent_on_empty_registry() {
        let registry = empty_registry();
        assert!(flow_repository(&registry).is_none());
        assert!(auth_provider(&registry).is_none());
        assert!(feature_manager(&registry).is_none());
        assert!(logger(&registry).is_none());
    }

    #[test]
    fn test_features_closed_by_default() {
        let registry = empty_registry();
        for name in ["sso", "audit-log", ""] {
            assert!(!is_feature_enabled(&registry, name, None));
            assert!(!is_feature_enabled(&registry, name, Some(&json!({"tenant": "t1"}))));
        }
        assert!(enabled_features(&registry, None).is_empty());
    }

    #[test]
    fn test_feature_checks_delegate_to_manager() {
        let registry = empty_registry();
        registry.register_capability(Capability::feature_manager(StaticFeatureManager::new([
            "sso", "audit-log",
        ])));

        assert!(is_feature_enabled(&registry, "sso", None));
        assert!(!is_feature_enabled(&registry, "white-label", None));
        let enabled: Vec<_> = enabled_features(&registry, None).into_iter().collect();
        assert_eq!(enabled, vec!["audit-log", "sso"]);
    }

    #[test]
    fn test_wrong_contract_under_key_is_absent() {
        let registry = empty_registry();
        registry.register(keys::FEATURE_MANAGER, Capability::logger(TracingLogger::new("test")));

        assert!(feature_manager(&registry).is_none());
        assert!(!is_feature_enabled(&registry, "sso", None));
        assert!(logger(&registry).is_none());
    }

    #[test]
    fn test_reset_removes_accessor_results() {
        let registry = empty_registry();
        registry.register_capability(Capability::logger(TracingLogger::new("test")));
        assert!(logger(&registry).is_some());

        registry.reset();
        assert!(logger(&registry).is_none());
    }

    #[tokio::test]
    async fn test_flow_repository_accessor() {
        let registry = empty_registry();
        registry.register_capability(Capability::flow_repository(InMemoryFlowRepository::new()));

        let repo = flow_repository(&registry).unwrap();
        repo.save_flow("f1", json!({"name": "Intake"})).await.unwrap();

        let again = flow_repository(&registry).unwrap();
        assert_eq!(again.get_flow("f1").await.unwrap(), Some(json!({"name": "Intake"})));
    }

    #[tokio::test]
    async fn test_auth_provider_accessor() {
        let registry = empty_registry();
        registry.register_capability(Capability::auth_provider(SingleUserAuth));

        let auth = auth_provider(&registry).unwrap();
        auth.initialize().await.unwrap();

        let outcome = auth.authenticate(&json!({"password": "hunter2"})).await.unwrap();
        assert_eq!(outcome.token.as_deref(), Some("tok"));
        assert!(matches!(
            auth.authenticate(&json!({"password": "nope"})).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(auth.verify_token("tok").await.unwrap().is_some());
        assert!(auth.verify_token("other").await.unwrap().is_none());
    }
}
