use std::fmt;

/// Lifecycle of a render session.
///
/// `Uninitialized -> Configured -> Running <-> Paused -> Cancelled | Completed`.
/// `reset` brings any state back to `Configured`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Configured,
    Running,
    Paused,
    Cancelled,
    Completed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        return matches!(self, SessionState::Cancelled | SessionState::Completed);
    }

    /// A run is in progress, paused or not.
    pub fn is_active(&self) -> bool {
        return matches!(self, SessionState::Running | SessionState::Paused);
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Configured => "configured",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Cancelled => "cancelled",
            SessionState::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
