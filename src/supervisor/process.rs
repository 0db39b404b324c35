//! The single-child supervisor.

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::process::Child;

use super::error::SupervisorError;
use super::exit::HostExit;
use super::launch::LaunchSpec;
use super::shutdown::{ShutdownReason, ShutdownTriggers};
use super::signaller::{ChildSignaller, NixSignaller};
use super::state::LifecycleState;

/// Time the child gets to exit after SIGTERM before it is killed.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// The running child, exclusively owned by its [`Supervisor`].
#[derive(Debug)]
pub struct SupervisedProcess {
    pid: u32,
    child: Child,
    started_at: Instant,
}

impl SupervisedProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

enum RunEvent {
    Exited(std::io::Result<ExitStatus>),
    Shutdown(ShutdownReason),
}

/// Starts one child process, watches it, and shuts it down.
///
/// The lifecycle is: `start()` → `run()` (or `shutdown()`) → terminated.
/// A supervisor never restarts its child: an unexpected exit ends the run
/// and its status becomes the host's exit status.
pub struct Supervisor {
    grace_period: Duration,
    signaller: Arc<dyn ChildSignaller>,
    state: LifecycleState,
    process: Option<SupervisedProcess>,
    outcome: Option<HostExit>,
}

impl Supervisor {
    /// Create a supervisor that signals its child with `kill(2)`.
    pub fn new(grace_period: Duration) -> Self {
        Self {
            grace_period,
            signaller: Arc::new(NixSignaller),
            state: LifecycleState::NotStarted,
            process: None,
            outcome: None,
        }
    }

    /// Replace the signal delivery mechanism.
    pub fn with_signaller(mut self, signaller: Arc<dyn ChildSignaller>) -> Self {
        self.signaller = signaller;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn process(&self) -> Option<&SupervisedProcess> {
        self.process.as_ref()
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(SupervisedProcess::pid)
    }

    /// The recorded outcome once the supervisor has terminated.
    pub fn outcome(&self) -> Option<&HostExit> {
        self.outcome.as_ref()
    }

    /// Spawn the child. A single attempt: spawn failures are returned, not
    /// retried, and leave the supervisor terminated with a
    /// [`HostExit::LaunchFailed`] outcome.
    pub fn start(&mut self, spec: LaunchSpec) -> Result<u32, SupervisorError> {
        if self.state != LifecycleState::NotStarted {
            return Err(SupervisorError::AlreadyStarted { state: self.state });
        }

        let spawned = spec
            .to_command()
            .and_then(|mut cmd| cmd.spawn())
            .and_then(|child| match child.id() {
            Some(pid) => Ok((pid, child)),
            None => Err(std::io::Error::other("child exited before its pid was read")),
        });
        let (pid, child) = match spawned {
            Ok(spawned) => spawned,
            Err(source) => {
                let err = SupervisorError::Spawn {
                    program: spec.display_command(),
                    cwd: spec.working_dir.clone(),
                    source,
                };
                tracing::error!(error = %err, "failed to start server process");
                self.finish(HostExit::LaunchFailed {
                    error: err.to_string(),
                });
                return Err(err);
            }
        };

        tracing::info!(
            pid,
            command = %spec.display_command(),
            cwd = %spec.working_dir.display(),
            "server process started"
        );
        self.process = Some(SupervisedProcess {
            pid,
            child,
            started_at: Instant::now(),
        });
        self.transition(LifecycleState::Running);
        Ok(pid)
    }

    /// Supervise until the child exits or a shutdown is requested.
    ///
    /// Child exit and shutdown triggers are raced; whichever comes first
    /// decides the outcome. Once every [`ShutdownHandle`](super::ShutdownHandle)
    /// is dropped only the child's exit is awaited.
    pub async fn run(&mut self, triggers: &mut ShutdownTriggers) -> HostExit {
        if self.state != LifecycleState::Running {
            if let Some(outcome) = &self.outcome {
                return outcome.clone();
            }
            return self.shutdown(ShutdownReason::Requested).await;
        }

        let event = match self.process.as_mut() {
            Some(process) => tokio::select! {
                status = process.child.wait() => RunEvent::Exited(status),
                Some(reason) = triggers.recv() => RunEvent::Shutdown(reason),
            },
            None => RunEvent::Shutdown(ShutdownReason::Requested),
        };

        match event {
            RunEvent::Exited(Ok(status)) => self.child_exited(status),
            RunEvent::Exited(Err(source)) => {
                let err = SupervisorError::Wait {
                    pid: self.pid().unwrap_or_default(),
                    source,
                };
                tracing::error!(error = %err, "lost track of server process");
                self.finish(HostExit::MonitorFailed {
                    error: err.to_string(),
                })
            }
            RunEvent::Shutdown(reason) => self.shutdown(reason).await,
        }
    }

    /// Stop the child: SIGTERM, wait up to the grace period, then SIGKILL.
    ///
    /// Idempotent. Once shutting down or terminated, further calls send
    /// nothing, start no timer, and return the recorded outcome.
    pub async fn shutdown(&mut self, reason: ShutdownReason) -> HostExit {
        if self.state.is_stopping() {
            tracing::debug!(%reason, state = %self.state, "shutdown already in progress");
            return self
                .outcome
                .clone()
                .unwrap_or(HostExit::Shutdown { reason, forced: false });
        }
        if self.state == LifecycleState::NotStarted {
            return self.finish(HostExit::Shutdown {
                reason,
                forced: false,
            });
        }

        tracing::info!(%reason, "shutting down server process");
        self.transition(LifecycleState::ShuttingDown);

        let outcome = match self.process.as_mut() {
            Some(process) => {
                stop_process(process, self.signaller.as_ref(), self.grace_period, reason).await
            }
            None => HostExit::Shutdown {
                reason,
                forced: false,
            },
        };
        self.finish(outcome)
    }

    fn child_exited(&mut self, status: ExitStatus) -> HostExit {
        let outcome = HostExit::from_child_status(status);
        match &outcome {
            HostExit::ChildExited { code } if *code != 0 => {
                tracing::error!(code, "server process exited with error status");
            }
            HostExit::ChildKilled { signal } => {
                tracing::warn!(signal = ?signal, "server process killed by signal");
            }
            _ => tracing::info!(%status, "server process exited"),
        }
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: HostExit) -> HostExit {
        self.transition(LifecycleState::Terminated);
        tracing::info!(%outcome, exit_code = outcome.exit_code(), "supervision finished");
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn transition(&mut self, next: LifecycleState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal supervisor transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "supervisor state change");
        self.state = next;
    }
}

/// Graceful-then-forced termination of a running child.
async fn stop_process(
    process: &mut SupervisedProcess,
    signaller: &dyn ChildSignaller,
    grace_period: Duration,
    reason: ShutdownReason,
) -> HostExit {
    let pid = process.pid;

    match process.child.try_wait() {
        Ok(Some(status)) => {
            tracing::debug!(pid, %status, "server process already exited");
            return HostExit::Shutdown {
                reason,
                forced: false,
            };
        }
        Ok(None) => {}
        Err(source) => {
            let err = SupervisorError::Wait { pid, source };
            tracing::error!(error = %err, "cannot query server process");
            return HostExit::ShutdownFailed {
                reason,
                error: err.to_string(),
            };
        }
    }

    if let Err(err) = signaller.terminate(pid) {
        tracing::error!(error = %err, "graceful termination failed; force killing");
        if let Err(kill_err) = signaller.kill(pid) {
            tracing::error!(error = %kill_err, "force kill failed");
        }
        return HostExit::ShutdownFailed {
            reason,
            error: err.to_string(),
        };
    }

    let stopping = Instant::now();
    // Dropping the wait on expiry cancels the race; the timer is dropped
    // as soon as the child exits.
    match tokio::time::timeout(grace_period, process.child.wait()).await {
        Ok(Ok(status)) => {
            tracing::info!(
                pid,
                %status,
                elapsed_ms = stopping.elapsed().as_millis() as u64,
                uptime_s = process.uptime().as_secs(),
                "server process stopped"
            );
            HostExit::Shutdown {
                reason,
                forced: false,
            }
        }
        Ok(Err(source)) => {
            let err = SupervisorError::Wait { pid, source };
            tracing::error!(error = %err, "failed waiting for server process");
            HostExit::ShutdownFailed {
                reason,
                error: err.to_string(),
            }
        }
        Err(_) => {
            tracing::warn!(
                pid,
                grace_ms = grace_period.as_millis() as u64,
                "server process ignored termination request; force killing"
            );
            match signaller.kill(pid) {
                Ok(()) => HostExit::Shutdown {
                    reason,
                    forced: true,
                },
                Err(err) => {
                    tracing::error!(error = %err, "force kill failed");
                    HostExit::ShutdownFailed {
                        reason,
                        error: err.to_string(),
                    }
                }
            }
        }
    }
}
