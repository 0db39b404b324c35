//! In-memory flow repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;

use crate::interfaces::{FlowRepository, FlowSummary, RepositoryError};

#[derive(Debug, Clone)]
struct StoredFlow {
    data: Value,
    updated_at: DateTime<Utc>,
}

/// Flows held in process memory, listed in id order.
///
/// Nothing survives a restart; intended for development hosts and tests.
#[derive(Debug, Default)]
pub struct InMemoryFlowRepository {
    flows: RwLock<BTreeMap<String, StoredFlow>>,
}

impl InMemoryFlowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.read().is_empty()
    }
}

#[async_trait]
impl FlowRepository for InMemoryFlowRepository {
    async fn save_flow(&self, flow_id: &str, flow_data: Value) -> Result<(), RepositoryError> {
        if flow_id.trim().is_empty() {
            return Err(RepositoryError::InvalidData {
                flow_id: flow_id.to_string(),
                message: "flow id must not be empty".to_string(),
            });
        }
        let stored = StoredFlow {
            data: flow_data,
            updated_at: Utc::now(),
        };
        self.flows.write().insert(flow_id.to_string(), stored);
        Ok(())
    }

    async fn get_flow(&self, flow_id: &str) -> Result<Option<Value>, RepositoryError> {
        Ok(self.flows.read().get(flow_id).map(|flow| flow.data.clone()))
    }

    async fn list_flows(&self) -> Result<Vec<FlowSummary>, RepositoryError> {
        let flows = self.flows.read();
        Ok(flows
            .iter()
            .map(|(id, flow)| {
                // Flows without a usable name are listed under their id.
                let name = flow
                    .data
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(id);
                FlowSummary::new(id.clone(), name)
                    .with_field("updatedDate", Value::String(flow.updated_at.to_rfc3339()))
            })
            .collect())
    }

    async fn delete_flow(&self, flow_id: &str) -> Result<(), RepositoryError> {
        self.flows.write().remove(flow_id);
        Ok(())
    }
}
