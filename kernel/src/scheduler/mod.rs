//! Scheduler subsystem
//!
//! 3-Queue dispatch core: SJF (EMA burst prediction), Round-Robin and aged
//! Priority bands. Platform details live behind `switch::Machine`.

pub mod core;
pub mod prediction;
pub mod switch;
pub mod thread;
pub mod trace;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use self::core::{
    AgingCap, Band, BandThresholds, ReadyDump, SchedConfig, Scheduler, SchedulerError,
    SchedulerResult, SchedulerStats,
};
pub use self::switch::{Machine, StackOverflow};
pub use self::thread::{Priority, Thread, ThreadId, ThreadState, ThreadTable};
pub use self::trace::{TraceEvent, TraceFlags, TraceKind, TraceRing};
