//! Built-in capability providers.
//!
//! None of these are registered by default. The host binds them when its
//! configuration asks for them; tests use them as ready-made providers.

pub mod memory_flows;
pub mod static_features;
pub mod tracing_logger;

pub use memory_flows::InMemoryFlowRepository;
pub use static_features::StaticFeatureManager;
pub use tracing_logger::TracingLogger;
