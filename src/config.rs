//! Host configuration.
//!
//! All settings come from environment variables; every one has a default,
//! so an empty environment yields a working configuration.
//!
//! | Variable                | Default                  | Meaning                                   |
//! |-------------------------|--------------------------|-------------------------------------------|
//! | `FLOWHOST_SERVER_DIR`   | `legacy/packages/server` | working directory of the server           |
//! | `FLOWHOST_SERVER_BIN`   | `bin/dev`                | server executable, relative to the dir    |
//! | `FLOWHOST_SERVER_ARGS`  | `start`                  | whitespace-separated server arguments     |
//! | `FLOWHOST_GRACE_SECS`   | `5`                      | grace period between SIGTERM and SIGKILL  |
//! | `FLOWHOST_FEATURES`     | unset                    | comma list; registers a feature manager   |
//! | `FLOWHOST_FORWARD_LOGS` | `false`                  | registers the tracing logger capability   |
//! | `FLOWHOST_MEMORY_FLOWS` | `false`                  | registers the in-memory flow repository   |

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::supervisor::{LaunchSpec, DEFAULT_GRACE_PERIOD};

pub const ENV_SERVER_DIR: &str = "FLOWHOST_SERVER_DIR";
pub const ENV_SERVER_BIN: &str = "FLOWHOST_SERVER_BIN";
pub const ENV_SERVER_ARGS: &str = "FLOWHOST_SERVER_ARGS";
pub const ENV_GRACE_SECS: &str = "FLOWHOST_GRACE_SECS";
pub const ENV_FEATURES: &str = "FLOWHOST_FEATURES";
pub const ENV_FORWARD_LOGS: &str = "FLOWHOST_FORWARD_LOGS";
pub const ENV_MEMORY_FLOWS: &str = "FLOWHOST_MEMORY_FLOWS";

/// Errors in host configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative number of seconds, got {value:?}")]
    InvalidDuration { var: &'static str, value: String },

    #[error("{var} must be a boolean (true/false, 1/0, yes/no, on/off), got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Everything the host needs to bootstrap capabilities and launch the server.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub server_dir: PathBuf,
    pub server_program: PathBuf,
    pub server_args: Vec<String>,
    pub grace_period: Duration,
    /// Variables set on top of the inherited environment.
    pub env: HashMap<String, String>,
    /// Features to enable through a static feature manager.
    pub features: Option<Vec<String>>,
    pub forward_logs: bool,
    pub memory_flows: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            server_dir: PathBuf::from("legacy/packages/server"),
            server_program: PathBuf::from("bin/dev"),
            server_args: vec!["start".to_string()],
            grace_period: DEFAULT_GRACE_PERIOD,
            env: HashMap::new(),
            features: None,
            forward_logs: false,
            memory_flows: false,
        }
    }
}

impl HostConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_SERVER_DIR) {
            config.server_dir = non_empty(ENV_SERVER_DIR, dir)?.into();
        }
        if let Some(bin) = lookup(ENV_SERVER_BIN) {
            config.server_program = non_empty(ENV_SERVER_BIN, bin)?.into();
        }
        if let Some(args) = lookup(ENV_SERVER_ARGS) {
            config.server_args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(grace) = lookup(ENV_GRACE_SECS) {
            config.grace_period = parse_seconds(ENV_GRACE_SECS, &grace)?;
        }
        if let Some(features) = lookup(ENV_FEATURES) {
            config.features = Some(
                features
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        if let Some(value) = lookup(ENV_FORWARD_LOGS) {
            config.forward_logs = parse_bool(ENV_FORWARD_LOGS, &value)?;
        }
        if let Some(value) = lookup(ENV_MEMORY_FLOWS) {
            config.memory_flows = parse_bool(ENV_MEMORY_FLOWS, &value)?;
        }

        Ok(config)
    }

    /// The launch description of the server process.
    pub fn launch_spec(&self) -> LaunchSpec {
        let mut spec = LaunchSpec::new(self.server_program.clone(), self.server_dir.clone())
            .args(self.server_args.iter().cloned());
        for (key, value) in &self.env {
            spec = spec.env(key.clone(), value.clone());
        }
        spec
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_string())
}

fn parse_seconds(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| ConfigError::InvalidDuration {
            var,
            value: value.to_string(),
        })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<HostConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HostConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = load(&[]).unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.grace_period, Duration::from_secs(5));

        let spec = config.launch_spec();
        assert_eq!(spec.working_dir, PathBuf::from("legacy/packages/server"));
        assert_eq!(
            spec.resolved_program().unwrap(),
            std::env::current_dir()
                .unwrap()
                .join("legacy/packages/server/bin/dev")
        );
        assert_eq!(spec.args, vec!["start"]);
        assert!(spec.inherit_env);
        assert!(spec.env.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (ENV_SERVER_DIR, "/srv/flow"),
            (ENV_SERVER_BIN, "/usr/bin/node"),
            (ENV_SERVER_ARGS, "dist/index.js  --port 3000"),
            (ENV_GRACE_SECS, "0.5"),
            (ENV_FEATURES, "sso, audit-log,,"),
            (ENV_FORWARD_LOGS, "yes"),
            (ENV_MEMORY_FLOWS, "0"),
        ])
        .unwrap();

        assert_eq!(config.server_dir, PathBuf::from("/srv/flow"));
        assert_eq!(config.server_args, vec!["dist/index.js", "--port", "3000"]);
        assert_eq!(config.grace_period, Duration::from_millis(500));
        assert_eq!(
            config.features,
            Some(vec!["sso".to_string(), "audit-log".to_string()])
        );
        assert!(config.forward_logs);
        assert!(!config.memory_flows);
        assert_eq!(
            config.launch_spec().resolved_program().unwrap(),
            PathBuf::from("/usr/bin/node")
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            load(&[(ENV_GRACE_SECS, "-1")]),
            Err(ConfigError::InvalidDuration { .. })
        ));
        assert!(matches!(
            load(&[(ENV_GRACE_SECS, "soon")]),
            Err(ConfigError::InvalidDuration { .. })
        ));
        assert!(matches!(
            load(&[(ENV_FORWARD_LOGS, "maybe")]),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            load(&[(ENV_SERVER_DIR, "  ")]),
            Err(ConfigError::Empty { .. })
        ));
    }
}
