//! # flowhost
//!
//! Host process for the flow server.
//!
//! The host does two things:
//!
//! - runs the server as a supervised child process with a graceful
//!   shutdown sequence ([`supervisor`]), and
//! - offers a capability registry through which optional implementations
//!   of well-known contracts (flow persistence, authentication, feature
//!   gating, logging) are discovered at runtime ([`capabilities`],
//!   [`interfaces`]).
//!
//! The two are independent: the supervisor never consults the registry,
//! and the registry never calls back into the supervisor.

pub mod capabilities;
pub mod config;
pub mod host;
pub mod interfaces;
pub mod providers;
pub mod supervisor;
pub mod telemetry;

pub use capabilities::{Capability, CapabilityKind, CapabilityRegistry};
pub use config::HostConfig;
pub use supervisor::{HostExit, LaunchSpec, LifecycleState, Supervisor};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
