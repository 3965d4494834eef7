// src/lib.rs
// Cœur de dispatch CPU du noyau (uniprocesseur)
#![cfg_attr(not(test), no_std)] // Pas de bibliothèque standard (hors tests)

// Import de alloc pour les allocations dynamiques
extern crate alloc;

// Modules du noyau
pub mod logger;
pub mod scheduler;
pub mod sync;
pub mod time;

pub use scheduler::{
    AgingCap, Band, BandThresholds, Machine, Priority, SchedConfig, Scheduler, SchedulerError,
    SchedulerResult, SchedulerStats, StackOverflow, Thread, ThreadId, ThreadState, TraceEvent,
    TraceFlags, TraceKind,
};
pub use sync::{IntLevel, InterruptController, InterruptGuard};
pub use time::{Tick, TickClock};
