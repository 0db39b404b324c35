//! Error types for the process supervisor.

use std::path::PathBuf;

use thiserror::Error;

use super::state::LifecycleState;

/// Errors raised while launching, signalling or reaping the child.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The child process could not be created.
    #[error("Failed to start server process '{program}' in {cwd}: {source}")]
    Spawn {
        program: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `start` was called on a supervisor that already owns a child.
    #[error("Supervisor cannot start a child while {state}")]
    AlreadyStarted { state: LifecycleState },

    /// A termination signal could not be delivered.
    #[error("Failed to send {signal} to pid {pid}: {source}")]
    Signal {
        pid: u32,
        signal: &'static str,
        #[source]
        source: nix::Error,
    },

    /// Waiting on the child failed.
    #[error("Failed to wait on pid {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}
