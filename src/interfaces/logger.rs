//! Logger trait — the contract for logging across environments.
//!
//! Providers may forward records to a custom telemetry system. Every
//! method is side-effect only and must never panic or fail.

use serde_json::Value;

/// Structured logging sink.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str, meta: Option<&Value>);

    fn warn(&self, message: &str, meta: Option<&Value>);

    /// `meta` may describe the error being reported.
    fn error(&self, message: &str, meta: Option<&Value>);

    fn debug(&self, message: &str, meta: Option<&Value>);
}
