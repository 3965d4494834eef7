//! Thread module

pub mod thread;
pub mod state;

pub use thread::{Priority, Thread, ThreadId, ThreadTable};
pub use state::{validate_transition, ThreadState};
