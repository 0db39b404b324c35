//! FlowRepository trait — the contract for persisting and retrieving flows.
//!
//! Implementations can use JSON files, SQL databases, or external APIs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Persistence of named flows.
///
/// A flow is an opaque JSON document addressed by a caller-chosen id.
#[async_trait]
pub trait FlowRepository: Send + Sync {
    /// Save a flow, replacing any previous flow stored under `flow_id`.
    async fn save_flow(&self, flow_id: &str, flow_data: Value) -> Result<(), RepositoryError>;

    /// Retrieve a flow by id. `Ok(None)` when no such flow exists.
    async fn get_flow(&self, flow_id: &str) -> Result<Option<Value>, RepositoryError>;

    /// List metadata for all stored flows, in a stable order.
    async fn list_flows(&self) -> Result<Vec<FlowSummary>, RepositoryError>;

    /// Delete a flow. Deleting an unknown id is not an error.
    async fn delete_flow(&self, flow_id: &str) -> Result<(), RepositoryError>;
}

/// Metadata describing one stored flow.
///
/// `id` and `name` are always present; implementations may attach any
/// further fields, which serialize alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlowSummary {
    /// Create a summary without extra fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Flow repository error types
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Invalid flow data for {flow_id}: {message}")]
    InvalidData { flow_id: String, message: String },

    #[error("Flow storage error: {0}")]
    Storage(String),

    #[error("Flow storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_flattens_extra_fields() {
        let summary = FlowSummary::new("f1", "Support bot")
            .with_field("category", Value::String("chat".into()));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], "f1");
        assert_eq!(json["name"], "Support bot");
        assert_eq!(json["category"], "chat");

        let back: FlowSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
