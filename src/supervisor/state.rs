//! Lifecycle states of a supervised child process.

use std::fmt;

/// Where the supervisor is in its single-child lifecycle.
///
/// ```text
/// NotStarted ──start──▶ Running ──shutdown──▶ ShuttingDown ──▶ Terminated
///      │                   │                                      ▲
///      └── spawn failed ───┴──────── child exited on its own ─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    NotStarted,
    Running,
    ShuttingDown,
    Terminated,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (NotStarted, Running)
                | (NotStarted, Terminated)
                | (Running, ShuttingDown)
                | (Running, Terminated)
                | (ShuttingDown, Terminated)
        )
    }

    /// `ShuttingDown` or `Terminated`.
    pub fn is_stopping(self) -> bool {
        matches!(self, LifecycleState::ShuttingDown | LifecycleState::Terminated)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::NotStarted => write!(f, "not_started"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::ShuttingDown => write!(f, "shutting_down"),
            LifecycleState::Terminated => write!(f, "terminated"),
        }
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        LifecycleState::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    #[test]
    fn test_graceful_path_passes_through_shutting_down() {
        assert!(Running.can_transition_to(ShuttingDown));
        assert!(ShuttingDown.can_transition_to(Terminated));
        assert!(!NotStarted.can_transition_to(ShuttingDown));
    }

    #[test]
    fn test_no_way_back() {
        for state in [Running, ShuttingDown, Terminated] {
            assert!(!state.can_transition_to(NotStarted));
        }
        assert!(!Terminated.can_transition_to(Running));
        assert!(!ShuttingDown.can_transition_to(Running));
    }

    #[test]
    fn test_stopping_states() {
        assert!(!NotStarted.is_stopping());
        assert!(!Running.is_stopping());
        assert!(ShuttingDown.is_stopping());
        assert!(Terminated.is_stopping());
    }
}
