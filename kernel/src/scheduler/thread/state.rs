//! State - Thread state machine
//!
//! Manages thread lifecycle and state transitions

use core::fmt;

/// Thread state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    /// Created, never admitted
    New = 0,

    /// Waiting in a ready queue
    Ready = 1,

    /// Currently running
    Running = 2,

    /// Waiting for I/O, a lock, etc.
    Blocked = 3,

    /// Finished; waiting for its stack to be released
    Finished = 4,
}

impl ThreadState {
    /// Check if state is schedulable
    pub fn is_schedulable(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Ready => write!(f, "Ready"),
            Self::Running => write!(f, "Running"),
            Self::Blocked => write!(f, "Blocked"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Validate state transition
pub fn validate_transition(from: ThreadState, to: ThreadState) -> bool {
    use ThreadState::*;

    match (from, to) {
        // New -> Ready (first admission)
        (New, Ready) => true,

        // Ready -> Running (dispatch)
        (Ready, Running) => true,

        // Running -> Ready (yield)
        (Running, Ready) => true,

        // Running -> Blocked
        (Running, Blocked) => true,

        // Running -> Finished
        (Running, Finished) => true,

        // Blocked -> Ready (wake-up)
        (Blocked, Ready) => true,

        _ => false,
    }
}
