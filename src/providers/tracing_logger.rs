//! Logger capability that forwards to `tracing`.

use serde_json::Value;

use crate::interfaces::Logger;

/// Emits each record as a `tracing` event.
///
/// `source` names the component the records come from and is attached to
/// every event, together with the optional metadata.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    source: String,
}

impl TracingLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("flow-server")
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str, meta: Option<&Value>) {
        match meta {
            Some(meta) => tracing::info!(source = %self.source, %meta, "{}", message),
            None => tracing::info!(source = %self.source, "{}", message),
        }
    }

    fn warn(&self, message: &str, meta: Option<&Value>) {
        match meta {
            Some(meta) => tracing::warn!(source = %self.source, %meta, "{}", message),
            None => tracing::warn!(source = %self.source, "{}", message),
        }
    }

    fn error(&self, message: &str, meta: Option<&Value>) {
        match meta {
            Some(meta) => tracing::error!(source = %self.source, %meta, "{}", message),
            None => tracing::error!(source = %self.source, "{}", message),
        }
    }

    fn debug(&self, message: &str, meta: Option<&Value>) {
        match meta {
            Some(meta) => tracing::debug!(source = %self.source, %meta, "{}", message),
            None => tracing::debug!(source = %self.source, "{}", message),
        }
    }
}
