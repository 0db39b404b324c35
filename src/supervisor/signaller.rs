//! Delivery of termination signals to the child.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use super::error::SupervisorError;

/// Sends termination requests to a child process.
///
/// The supervisor only ever sends a graceful request first and, if the
/// grace period runs out, a forceful one.
pub trait ChildSignaller: Send + Sync {
    /// Ask the child to terminate (SIGTERM).
    fn terminate(&self, pid: u32) -> Result<(), SupervisorError>;

    /// Kill the child; cannot be caught (SIGKILL).
    fn kill(&self, pid: u32) -> Result<(), SupervisorError>;
}

/// Signals the child through `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NixSignaller;

impl NixSignaller {
    fn send(pid: u32, signal: Signal) -> Result<(), SupervisorError> {
        let raw = i32::try_from(pid).map_err(|_| SupervisorError::Signal {
            pid,
            signal: signal.as_str(),
            source: nix::Error::EINVAL,
        })?;
        match kill(Pid::from_raw(raw), signal) {
            // Already gone: nothing left to terminate.
            Ok(()) | Err(nix::Error::ESRCH) => Ok(()),
            Err(source) => Err(SupervisorError::Signal {
                pid,
                signal: signal.as_str(),
                source,
            }),
        }
    }
}

impl ChildSignaller for NixSignaller {
    fn terminate(&self, pid: u32) -> Result<(), SupervisorError> {
        Self::send(pid, Signal::SIGTERM)
    }

    fn kill(&self, pid: u32) -> Result<(), SupervisorError> {
        Self::send(pid, Signal::SIGKILL)
    }
}
