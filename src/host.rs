//! Host entry point: capability bootstrap plus server supervision.

use anyhow::Context;
use tokio::task::JoinHandle;

use crate::capabilities::{Capability, CapabilityRegistry};
use crate::config::HostConfig;
use crate::providers::{InMemoryFlowRepository, StaticFeatureManager, TracingLogger};
use crate::supervisor::{
    install_panic_hook, listen_for_signals, shutdown_channel, HostExit, ShutdownHandle,
    ShutdownTriggers, Supervisor, SupervisorError,
};

/// Initialize `registry` and bind the built-in providers `config` asks for.
///
/// With the default configuration the registry stays empty and every
/// capability lookup reports absence.
pub fn bootstrap_registry(registry: &CapabilityRegistry, config: &HostConfig) {
    registry.initialize();

    if let Some(features) = &config.features {
        registry.register_capability(Capability::feature_manager(StaticFeatureManager::new(
            features.iter().cloned(),
        )));
    }
    if config.forward_logs {
        registry.register_capability(Capability::logger(TracingLogger::default()));
    }
    if config.memory_flows {
        registry.register_capability(Capability::flow_repository(InMemoryFlowRepository::new()));
    }

    tracing::info!(capabilities = ?registry.keys(), "capability registry ready");
}

/// Bootstrap `registry`, start the server and supervise it until it exits
/// or `triggers` requests a shutdown.
pub async fn serve(
    config: &HostConfig,
    registry: &CapabilityRegistry,
    triggers: &mut ShutdownTriggers,
) -> Result<HostExit, SupervisorError> {
    bootstrap_registry(registry, config);

    let mut supervisor = Supervisor::new(config.grace_period);
    supervisor.start(config.launch_spec())?;
    Ok(supervisor.run(triggers).await)
}

/// Forward OS termination signals to `handle`. A panic in the listener
/// task itself becomes a fault shutdown.
pub fn watch_signals(handle: &ShutdownHandle) -> std::io::Result<JoinHandle<()>> {
    let signals = listen_for_signals(handle.clone())?;
    Ok(handle.watch(signals))
}

/// Run the host process: process-wide registry, OS signal and panic
/// triggers, then [`serve`].
pub async fn run(config: HostConfig) -> anyhow::Result<HostExit> {
    let (handle, mut triggers) = shutdown_channel();
    watch_signals(&handle).context("failed to install signal handlers")?;
    install_panic_hook(handle);

    let exit = serve(&config, CapabilityRegistry::global(), &mut triggers)
        .await
        .context("failed to start the flow server")?;
    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{keys, shim};
    use crate::supervisor::ShutdownReason;
    use std::time::Duration;

    fn sh_config(script: &str) -> HostConfig {
        HostConfig {
            server_dir: std::env::temp_dir(),
            server_program: "/bin/sh".into(),
            server_args: vec!["-c".to_string(), script.to_string()],
            grace_period: Duration::from_secs(2),
            ..HostConfig::default()
        }
    }

    #[test]
    fn test_default_bootstrap_registers_nothing() {
        let registry = CapabilityRegistry::new();
        bootstrap_registry(&registry, &HostConfig::default());

        assert!(registry.is_initialized());
        assert!(registry.is_empty());
        assert!(!shim::is_feature_enabled(&registry, "sso", None));
    }

    #[test]
    fn test_bootstrap_registers_configured_providers() {
        let registry = CapabilityRegistry::new();
        let config = HostConfig {
            features: Some(vec!["sso".to_string()]),
            forward_logs: true,
            memory_flows: true,
            ..HostConfig::default()
        };
        bootstrap_registry(&registry, &config);

        assert_eq!(
            registry.keys(),
            vec![keys::FEATURE_MANAGER, keys::FLOW_REPOSITORY, keys::LOGGER]
        );
        assert!(shim::is_feature_enabled(&registry, "sso", None));
        assert!(shim::logger(&registry).is_some());
        assert!(shim::flow_repository(&registry).is_some());
    }

    #[test]
    fn test_bootstrap_keeps_earlier_registrations() {
        let registry = CapabilityRegistry::new();
        registry.initialize();
        registry.register_capability(Capability::logger(TracingLogger::new("enterprise")));

        bootstrap_registry(&registry, &HostConfig::default());
        assert!(shim::logger(&registry).is_some());
    }

    #[tokio::test]
    async fn test_serve_mirrors_server_exit_status() {
        let registry = CapabilityRegistry::new();
        let (_handle, mut triggers) = shutdown_channel();

        let exit = serve(&sh_config("exit 7"), &registry, &mut triggers)
            .await
            .unwrap();
        assert_eq!(exit.exit_code(), 7);
    }

    #[tokio::test]
    async fn test_serve_shuts_down_on_request() {
        let registry = CapabilityRegistry::new();
        let (handle, mut triggers) = shutdown_channel();
        handle.request(ShutdownReason::Signal("SIGINT"));

        let exit = serve(&sh_config("sleep 30"), &registry, &mut triggers)
            .await
            .unwrap();
        assert_eq!(exit.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_serve_reports_launch_failure() {
        let registry = CapabilityRegistry::new();
        let (_handle, mut triggers) = shutdown_channel();
        let config = HostConfig {
            server_dir: std::env::temp_dir(),
            server_program: "/nonexistent/bin/dev".into(),
            ..HostConfig::default()
        };

        let err = serve(&config, &registry, &mut triggers).await.unwrap_err();
        assert!(matches!(err, SupervisorError::Spawn { .. }));
        assert!(registry.is_initialized());
    }

    #[tokio::test]
    async fn test_serve_launches_from_relative_server_dir() {
        let cwd = std::env::current_dir().unwrap();
        let root = tempfile::Builder::new()
            .prefix("flowhost-serve")
            .tempdir_in(&cwd)
            .unwrap();
        let server_dir = root.path().join("legacy/packages/server");
        std::fs::create_dir_all(server_dir.join("bin")).unwrap();
        std::os::unix::fs::symlink("/bin/sh", server_dir.join("bin/dev")).unwrap();

        let registry = CapabilityRegistry::new();
        let (_handle, mut triggers) = shutdown_channel();
        let config = HostConfig {
            server_dir: server_dir.strip_prefix(&cwd).unwrap().to_path_buf(),
            server_args: vec!["-c".to_string(), "exit 0".to_string()],
            ..HostConfig::default()
        };
        assert!(config.server_dir.is_relative());
        assert_eq!(config.server_program, HostConfig::default().server_program);

        let exit = serve(&config, &registry, &mut triggers).await.unwrap();
        assert_eq!(exit, HostExit::ChildExited { code: 0 });
    }

    #[tokio::test]
    async fn test_termination_signal_reaches_triggers() {
        let (handle, mut triggers) = shutdown_channel();
        watch_signals(&handle).unwrap();

        nix::sys::signal::raise(nix::sys::signal::Signal::SIGTERM).unwrap();

        let reason = tokio::time::timeout(Duration::from_secs(5), triggers.recv())
            .await
            .unwrap();
        assert_eq!(reason, Some(ShutdownReason::Signal("SIGTERM")));
    }
}
