//! # Capability Contracts
//!
//! Framework-agnostic contracts between the host and optional capability
//! providers. Each contract is independently optional: a host runs with
//! zero, one, or all of them plugged into the
//! [`CapabilityRegistry`](crate::capabilities::CapabilityRegistry).
//!
//! ```text
//! CapabilityRegistry
//!   ├── "flowRepository" → FlowRepository   (persistence of flows)
//!   ├── "authProvider"   → AuthProvider     (authentication)
//!   ├── "featureManager" → FeatureManager   (feature gating)
//!   └── "logger"         → Logger           (structured logging)
//! ```
//!
//! Persistence and authentication are asynchronous and fallible; feature
//! gating and logging are synchronous and infallible. Opaque payloads
//! (flow data, credentials, users, contexts, metadata) are carried as
//! [`serde_json::Value`].

pub mod auth_provider;
pub mod feature_manager;
pub mod flow_repository;
pub mod logger;

pub use auth_provider::{AuthError, AuthOutcome, AuthProvider};
pub use feature_manager::FeatureManager;
pub use flow_repository::{FlowRepository, FlowSummary, RepositoryError};
pub use logger::Logger;
