//! Statistics - Scheduler counters
//!
//! Plain counters: the scheduler is single-owner and only touched with
//! interrupts off, so no atomics are needed.

/// Scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Admissions into a ready queue (including requeues)
    pub admissions: u64,

    /// Threads handed out by `find_next_to_run`
    pub picks: u64,

    /// Selections that found every queue empty
    pub idle_picks: u64,

    /// Context switches performed
    pub switches: u64,

    /// Aging boosts applied
    pub aging_boosts: u64,

    /// Threads moved to another band after a priority change
    pub requeues: u64,

    /// Threads destroyed after finishing
    pub destroyed: u64,
}

impl SchedulerStats {
    pub const fn new() -> Self {
        Self {
            admissions: 0,
            picks: 0,
            idle_picks: 0,
            switches: 0,
            aging_boosts: 0,
            requeues: 0,
            destroyed: 0,
        }
    }

    /// Fraction of selections that found nothing to run
    pub fn idle_ratio(&self) -> f64 {
        let total = self.picks + self.idle_picks;
        if total == 0 {
            0.0
        } else {
            self.idle_picks as f64 / total as f64
        }
    }
}
