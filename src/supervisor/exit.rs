//! Terminal outcomes of a supervision run and their host exit codes.

use std::fmt;
use std::process::ExitStatus;

use super::shutdown::ShutdownReason;

/// Exit code for startup failures, failed shutdowns and fault shutdowns.
pub const EXIT_FAILURE: i32 = 1;

/// How a supervision run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostExit {
    /// The child could not be spawned.
    LaunchFailed { error: String },
    /// The child exited on its own with a status code.
    ChildExited { code: i32 },
    /// The child was killed by a signal the supervisor did not send.
    ChildKilled { signal: Option<i32> },
    /// Shutdown completed; `forced` when SIGKILL had to be sent.
    Shutdown { reason: ShutdownReason, forced: bool },
    /// Shutdown was attempted but could not be carried out cleanly.
    ShutdownFailed { reason: ShutdownReason, error: String },
    /// The child could no longer be monitored.
    MonitorFailed { error: String },
}

impl HostExit {
    /// Map an unexpected child exit to an outcome.
    pub fn from_child_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match status.code() {
            Some(code) => HostExit::ChildExited { code },
            None => HostExit::ChildKilled {
                signal: status.signal(),
            },
        }
    }

    /// The code the host process exits with.
    ///
    /// The child's status is mirrored; a child killed by an external signal
    /// is a benign stop; a shutdown is clean unless a fault caused it or it
    /// failed.
    pub fn exit_code(&self) -> i32 {
        match self {
            HostExit::ChildExited { code } => *code,
            HostExit::ChildKilled { .. } => 0,
            HostExit::Shutdown { reason, .. } if reason.is_fault() => EXIT_FAILURE,
            HostExit::Shutdown { .. } => 0,
            HostExit::LaunchFailed { .. }
            | HostExit::ShutdownFailed { .. }
            | HostExit::MonitorFailed { .. } => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for HostExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostExit::LaunchFailed { error } => write!(f, "server failed to start: {}", error),
            HostExit::ChildExited { code } => write!(f, "server exited with code {}", code),
            HostExit::ChildKilled { signal: Some(signal) } => {
                write!(f, "server killed with signal {}", signal)
            }
            HostExit::ChildKilled { signal: None } => write!(f, "server killed"),
            HostExit::Shutdown { reason, forced: false } => {
                write!(f, "shutdown complete ({})", reason)
            }
            HostExit::Shutdown { reason, forced: true } => {
                write!(f, "shutdown complete after force kill ({})", reason)
            }
            HostExit::ShutdownFailed { reason, error } => {
                write!(f, "shutdown failed ({}): {}", reason, error)
            }
            HostExit::MonitorFailed { error } => write!(f, "lost track of server: {}", error),
        }
    }
}
