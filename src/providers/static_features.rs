//! Feature manager backed by a fixed set of feature names.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::interfaces::FeatureManager;

/// Enables exactly the configured features, for every context.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureManager {
    enabled: BTreeSet<String>,
}

impl StaticFeatureManager {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: features.into_iter().map(Into::into).collect(),
        }
    }
}

impl FeatureManager for StaticFeatureManager {
    fn is_feature_enabled(&self, feature_name: &str, _context: Option<&Value>) -> bool {
        self.enabled.contains(feature_name)
    }

    fn enabled_features(&self, _context: Option<&Value>) -> BTreeSet<String> {
        self.enabled.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_ignored() {
        let manager = StaticFeatureManager::new(["sso"]);
        let ctx = serde_json::json!({"tenant": "acme"});

        assert!(manager.is_feature_enabled("sso", None));
        assert!(manager.is_feature_enabled("sso", Some(&ctx)));
        assert!(!manager.is_feature_enabled("SSO", None));
        assert_eq!(manager.enabled_features(Some(&ctx)).len(), 1);
    }
}
