//! flowhost binary.
//!
//! Initializes the capability registry and runs the flow server as a
//! supervised child process. The host exits with the server's exit status,
//! `0` after a clean shutdown, or `1` on a startup or shutdown failure.
//!
//! # Environment Variables
//!
//! - `FLOWHOST_SERVER_DIR` — server working directory (default: `legacy/packages/server`)
//! - `FLOWHOST_SERVER_BIN` — server executable (default: `bin/dev`)
//! - `FLOWHOST_SERVER_ARGS` — server arguments (default: `start`)
//! - `FLOWHOST_GRACE_SECS` — shutdown grace period (default: 5)
//! - `FLOWHOST_FEATURES` — comma list of enabled features (default: unset, all disabled)
//! - `FLOWHOST_FORWARD_LOGS` — register the tracing logger capability (default: false)
//! - `FLOWHOST_MEMORY_FLOWS` — register the in-memory flow repository (default: false)
//! - `RUST_LOG` — Tracing filter (default: "info,flowhost=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin flowhost
//! ```

use flowhost::config::HostConfig;
use flowhost::supervisor::EXIT_FAILURE;

#[tokio::main]
async fn main() {
    flowhost::telemetry::init_tracing();

    tracing::info!("flowhost {} starting", flowhost::VERSION);

    let config = match HostConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let code = match flowhost::host::run(config).await {
        Ok(exit) => {
            tracing::info!("{}", exit);
            exit.exit_code()
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}
