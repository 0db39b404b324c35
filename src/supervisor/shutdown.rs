//! Shutdown triggers.
//!
//! OS termination signals, uncaught panics and panicked background tasks
//! are all normalized into one "shutdown requested" event, delivered to
//! the supervisor through a channel. Only the first request is forwarded;
//! later ones are logged and dropped.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Why the host is shutting down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// A termination signal was received (`SIGINT`, `SIGTERM`).
    Signal(&'static str),
    /// An uncaught panic or a panicked background task.
    Fault(String),
    /// Programmatic request.
    Requested,
}

impl ShutdownReason {
    /// Whether the shutdown stems from an error condition.
    pub fn is_fault(&self) -> bool {
        matches!(self, ShutdownReason::Fault(_))
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(name) => write!(f, "signal {}", name),
            ShutdownReason::Fault(message) => write!(f, "fault: {}", message),
            ShutdownReason::Requested => write!(f, "requested"),
        }
    }
}

/// Create a connected handle/receiver pair.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownTriggers) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ShutdownHandle {
        tx,
        requested: Arc::new(AtomicBool::new(false)),
    };
    (handle, ShutdownTriggers { rx })
}

/// Cloneable sender side; every trigger source holds one.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: mpsc::UnboundedSender<ShutdownReason>,
    requested: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Request a shutdown. Returns `true` only for the first request.
    pub fn request(&self, reason: ShutdownReason) -> bool {
        if self.requested.swap(true, Ordering::SeqCst) {
            tracing::debug!(%reason, "shutdown already requested; ignoring");
            return false;
        }
        tracing::info!(%reason, "shutdown requested");
        // A closed channel means the supervisor has already finished.
        let _ = self.tx.send(reason);
        true
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Turn a panic in `task` into a fault shutdown.
    pub fn watch<T: Send + 'static>(&self, task: JoinHandle<T>) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            match task.await {
                Err(err) if err.is_panic() => {
                    tracing::error!(error = %err, "background task panicked");
                    handle.request(ShutdownReason::Fault(format!(
                        "background task panicked: {}",
                        err
                    )));
                }
                Err(err) => tracing::debug!(error = %err, "background task cancelled"),
                Ok(_) => {}
            }
        })
    }
}

/// Receiver side, consumed by [`Supervisor::run`](super::Supervisor::run).
#[derive(Debug)]
pub struct ShutdownTriggers {
    rx: mpsc::UnboundedReceiver<ShutdownReason>,
}

impl ShutdownTriggers {
    /// Next shutdown request; `None` once every handle is dropped.
    pub async fn recv(&mut self) -> Option<ShutdownReason> {
        self.rx.recv().await
    }
}

/// Forward `SIGINT` and `SIGTERM` to `handle` until the process exits.
///
/// Must be called from within a tokio runtime.
pub fn listen_for_signals(handle: ShutdownHandle) -> std::io::Result<JoinHandle<()>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                Some(()) = sigint.recv() => "SIGINT",
                Some(()) = sigterm.recv() => "SIGTERM",
                else => break,
            };
            tracing::info!(signal = name, "received termination signal");
            handle.request(ShutdownReason::Signal(name));
        }
    }))
}

/// Log uncaught panics and turn them into a fault shutdown.
///
/// The previously installed hook still runs afterwards.
pub fn install_panic_hook(handle: ShutdownHandle) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = info.to_string();
        tracing::error!(panic = %message, "uncaught panic");
        handle.request(ShutdownReason::Fault(message));
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_first_request_is_forwarded() {
        let (handle, mut triggers) = shutdown_channel();
        let other = handle.clone();

        assert!(handle.request(ShutdownReason::Signal("SIGTERM")));
        assert!(!other.request(ShutdownReason::Signal("SIGINT")));
        assert!(!handle.request(ShutdownReason::Requested));
        assert!(other.is_requested());

        assert_eq!(triggers.recv().await, Some(ShutdownReason::Signal("SIGTERM")));
        assert!(triggers.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_panicked_task_requests_fault_shutdown() {
        let (handle, mut triggers) = shutdown_channel();

        let task = tokio::spawn(async {
            panic!("boom");
        });
        handle.watch(task).await.unwrap();

        let reason = triggers.recv().await.unwrap();
        assert!(reason.is_fault());
        assert!(reason.to_string().contains("background task panicked"));
    }

    #[tokio::test]
    async fn test_finished_task_requests_nothing() {
        let (handle, _triggers) = shutdown_channel();

        let task = tokio::spawn(async { 42 });
        handle.watch(task).await.unwrap();

        assert!(!handle.is_requested());
    }

    #[test]
    fn test_reason_classification() {
        assert!(!ShutdownReason::Signal("SIGINT").is_fault());
        assert!(!ShutdownReason::Requested.is_fault());
        assert!(ShutdownReason::Fault("oops".into()).is_fault());
        assert_eq!(ShutdownReason::Signal("SIGTERM").to_string(), "signal SIGTERM");
    }
}
