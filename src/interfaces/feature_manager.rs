//! FeatureManager trait — the contract for feature flagging.

use std::collections::BTreeSet;

use serde_json::Value;

/// Feature gating.
///
/// `context` carries whatever the caller evaluates features against
/// (user, tenant, ...). Implementations are free to ignore it.
pub trait FeatureManager: Send + Sync {
    /// Whether `feature_name` is enabled for the given context.
    fn is_feature_enabled(&self, feature_name: &str, context: Option<&Value>) -> bool;

    /// All features enabled for the given context.
    fn enabled_features(&self, context: Option<&Value>) -> BTreeSet<String>;
}
