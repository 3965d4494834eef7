//! Scheduler Error Handling
//!
//! Two classes of failure:
//! - API misuse that can be refused before anything is mutated
//!   (`SchedulerError`, returned through `SchedulerResult`);
//! - broken kernel invariants, where continuing would corrupt queue state
//!   (`sched_assert!`, which halts).

use crate::scheduler::core::policy::Band;
use crate::scheduler::thread::{ThreadId, ThreadState};
use core::fmt;

/// Scheduler error types with detailed context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Thread not in the thread table
    ThreadNotFound { thread_id: ThreadId },

    /// Invalid thread state transition
    InvalidStateTransition {
        thread_id: ThreadId,
        from: ThreadState,
        to: ThreadState,
    },

    /// Thread is still sitting in a ready queue
    AlreadyQueued { thread_id: ThreadId, band: Band },

    /// Rejected tunables
    InvalidConfig { reason: &'static str },

    /// A global logger was installed before us
    LoggerAlreadySet,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreadNotFound { thread_id } => {
                write!(f, "Thread {} not found", thread_id)
            }
            Self::InvalidStateTransition { thread_id, from, to } => {
                write!(f, "Thread {}: invalid transition {} -> {}", thread_id, from, to)
            }
            Self::AlreadyQueued { thread_id, band } => {
                write!(f, "Thread {} already in {} queue", thread_id, band)
            }
            Self::InvalidConfig { reason } => {
                write!(f, "Invalid scheduler config: {}", reason)
            }
            Self::LoggerAlreadySet => write!(f, "Logger already set"),
        }
    }
}

impl SchedulerError {
    /// Get recovery hint for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::ThreadNotFound { .. } => "Thread may have already been destroyed",
            Self::InvalidStateTransition { .. } => "Check thread lifecycle management",
            Self::AlreadyQueued { .. } => "Dispatch only threads returned by find_next_to_run",
            Self::InvalidConfig { .. } => "Check scheduler configuration",
            Self::LoggerAlreadySet => "Install the kernel logger once, early in boot",
        }
    }

    /// Is this a recoverable error?
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidConfig { .. })
    }
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Log a scheduler error with its hint and yield it
#[macro_export]
macro_rules! sched_error {
    ($err:expr) => {{
        let err = $err;
        log::warn!("[SCHED] Error: {} (hint: {})", err, err.recovery_hint());
        err
    }};
}

/// Macro for critical scheduler assertions
#[macro_export]
macro_rules! sched_assert {
    ($cond:expr, $reason:expr) => {
        if !$cond {
            panic!("[SCHED CRITICAL] Invariant violated: {}", $reason);
        }
    };
    ($cond:expr, $fmt:literal, $($arg:tt)+) => {
        if !$cond {
            panic!(concat!("[SCHED CRITICAL] Invariant violated: ", $fmt), $($arg)+);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display() {
        let err = SchedulerError::InvalidStateTransition {
            thread_id: 4,
            from: ThreadState::Finished,
            to: ThreadState::Ready,
        };
        assert_eq!(err.to_string(), "Thread 4: invalid transition Finished -> Ready");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = SchedulerError::InvalidConfig { reason: "x" };
        assert!(!err.is_recoverable());
    }

    #[test]
    #[should_panic(expected = "[SCHED CRITICAL] Invariant violated: double finish")]
    fn test_sched_assert_panics() {
        sched_assert!(1 + 1 == 3, "double finish");
    }
}
