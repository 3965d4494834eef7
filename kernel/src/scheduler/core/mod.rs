//! Scheduler core module
//!
//! - `policy`: bands, thresholds and tunables
//! - `queues`: the three ready lists
//! - `scheduler`: selection, aging, requalification and dispatch

pub mod error;
pub mod policy;
pub mod queues;
pub mod scheduler;
pub mod statistics;

#[cfg(test)]
mod tests_prop;

pub use error::{SchedulerError, SchedulerResult};
pub use policy::{
    AgingCap, Band, BandThresholds, SchedConfig, AGING_INTERVAL, PRIORITY_BOOST, PRIORITY_MAX,
    PRIORITY_THRESHOLD, SJF_THRESHOLD, TRACE_CAPACITY,
};
pub use queues::{Discipline, ReadyList, ReadyQueues};
pub use scheduler::{ReadyDump, Scheduler, MAIN_THREAD_NAME, MAIN_THREAD_PRIORITY};
pub use statistics::SchedulerStats;
