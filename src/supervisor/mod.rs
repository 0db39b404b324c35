//! # Process Supervisor
//!
//! Runs the flow server as a separate child process and owns its whole
//! lifecycle. The child is coupled to the host only through its launch
//! arguments, environment, termination signals and exit status.
//!
//! ## Shutdown Sequence
//!
//! ```text
//! SIGINT / SIGTERM / panic / panicked task
//!   │ ShutdownHandle::request()  (first request wins)
//!   ▼
//! Supervisor::shutdown()
//!   │ Running → ShuttingDown
//!   │ SIGTERM to child
//!   │ race: child exit  vs  grace timer (5s)
//!   │                        └─ expired → SIGKILL (once)
//!   ▼
//! Terminated → HostExit::exit_code()
//! ```
//!
//! ## Exit Codes
//!
//! | Outcome                              | Host exit code |
//! |--------------------------------------|----------------|
//! | child exited with status `n`         | `n`            |
//! | child killed by an external signal   | `0`            |
//! | shutdown after signal / request      | `0`            |
//! | shutdown after a fault               | `1`            |
//! | launch or shutdown failure           | `1`            |

pub mod error;
pub mod exit;
pub mod launch;
pub mod process;
pub mod shutdown;
pub mod signaller;
pub mod state;

pub use error::SupervisorError;
pub use exit::{HostExit, EXIT_FAILURE};
pub use launch::LaunchSpec;
pub use process::{SupervisedProcess, Supervisor, DEFAULT_GRACE_PERIOD};
pub use shutdown::{
    install_panic_hook, listen_for_signals, shutdown_channel, ShutdownHandle, ShutdownReason,
    ShutdownTriggers,
};
pub use signaller::{ChildSignaller, NixSignaller};
pub use state::LifecycleState;
