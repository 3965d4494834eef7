//! Scheduling Policy - priority bands and tunables
//!
//! Three bands partition the whole priority range:
//! - SJF:         priority >= sjf threshold (shortest predicted burst first)
//! - Round-Robin: priority threshold <= priority < sjf threshold (FIFO)
//! - Priority:    priority < priority threshold (highest priority first)
//!
//! A thread's band is always recomputed from its current priority, never
//! stored on the thread.

use super::error::{SchedulerError, SchedulerResult};
use crate::scheduler::thread::Priority;
use crate::scheduler::trace::TraceFlags;
use crate::time::Tick;
use core::fmt;

/// Priority >= this goes to the SJF queue
pub const SJF_THRESHOLD: Priority = 100;

/// Priority >= this (and below `SJF_THRESHOLD`) goes to the Round-Robin queue
pub const PRIORITY_THRESHOLD: Priority = 50;

/// Ticks a thread may wait in the Priority queue before it is boosted
pub const AGING_INTERVAL: Tick = 1500;

/// Priority added per aging boost
pub const PRIORITY_BOOST: Priority = 10;

/// Highest priority the kernel hands out (used by `AgingCap::Clamp` callers)
pub const PRIORITY_MAX: Priority = 149;

/// Default trace ring size
pub const TRACE_CAPACITY: usize = 128;

/// Ready queue band, in selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    /// Shortest-Job-First
    Sjf,
    /// FIFO time-sharing
    RoundRobin,
    /// Static priority, aged
    Priority,
}

impl Band {
    /// All bands, highest first
    pub const ALL: [Band; 3] = [Band::Sjf, Band::RoundRobin, Band::Priority];

    /// Band a priority belongs to under `thresholds`
    pub fn classify(priority: Priority, thresholds: &BandThresholds) -> Self {
        if priority >= thresholds.sjf {
            Band::Sjf
        } else if priority >= thresholds.priority {
            Band::RoundRobin
        } else {
            Band::Priority
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Band::Sjf => "SJF",
            Band::RoundRobin => "RR",
            Band::Priority => "Priority",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Band boundaries (`sjf` must be strictly above `priority`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandThresholds {
    pub sjf: Priority,
    pub priority: Priority,
}

impl BandThresholds {
    pub const fn new(sjf: Priority, priority: Priority) -> Self {
        Self { sjf, priority }
    }
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self::new(SJF_THRESHOLD, PRIORITY_THRESHOLD)
    }
}

/// Upper bound applied to aging boosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgingCap {
    /// Boost without limit (saturates at `Priority::MAX`)
    Unbounded,
    /// Never boost above this priority
    Clamp(Priority),
}

impl AgingCap {
    /// Priority after one boost of `boost`
    pub fn boosted(self, priority: Priority, boost: Priority) -> Priority {
        let raised = priority.saturating_add(boost);
        match self {
            AgingCap::Unbounded => raised,
            // A thread already above the cap keeps its priority.
            AgingCap::Clamp(max) => raised.min(max.max(priority)),
        }
    }
}

/// Scheduler tunables
#[derive(Debug, Clone, Copy)]
pub struct SchedConfig {
    pub thresholds: BandThresholds,
    pub aging_interval: Tick,
    pub priority_boost: Priority,
    pub aging_cap: AgingCap,
    /// Which trace events are emitted
    pub trace_flags: TraceFlags,
    /// Trace ring size (0 = do not record)
    pub trace_capacity: usize,
}

impl SchedConfig {
    /// Default tunables (unbounded aging)
    pub const fn default_config() -> Self {
        Self {
            thresholds: BandThresholds::new(SJF_THRESHOLD, PRIORITY_THRESHOLD),
            aging_interval: AGING_INTERVAL,
            priority_boost: PRIORITY_BOOST,
            aging_cap: AgingCap::Unbounded,
            trace_flags: TraceFlags::all(),
            trace_capacity: TRACE_CAPACITY,
        }
    }

    pub const fn with_thresholds(mut self, sjf: Priority, priority: Priority) -> Self {
        self.thresholds = BandThresholds::new(sjf, priority);
        self
    }

    pub const fn with_aging(mut self, interval: Tick, boost: Priority) -> Self {
        self.aging_interval = interval;
        self.priority_boost = boost;
        self
    }

    pub const fn with_aging_cap(mut self, cap: AgingCap) -> Self {
        self.aging_cap = cap;
        self
    }

    pub const fn with_trace(mut self, flags: TraceFlags, capacity: usize) -> Self {
        self.trace_flags = flags;
        self.trace_capacity = capacity;
        self
    }

    /// Validate parameters
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.thresholds.sjf <= self.thresholds.priority {
            return Err(SchedulerError::InvalidConfig {
                reason: "SJF threshold must be above the priority threshold",
            });
        }
        if self.aging_interval == 0 {
            return Err(SchedulerError::InvalidConfig {
                reason: "aging interval must be at least one tick",
            });
        }
        if self.priority_boost <= 0 {
            return Err(SchedulerError::InvalidConfig {
                reason: "aging boost must be positive",
            });
        }
        if let AgingCap::Clamp(max) = self.aging_cap {
            if max < self.thresholds.priority {
                return Err(SchedulerError::InvalidConfig {
                    reason: "aging clamp below the priority threshold",
                });
            }
        }
        Ok(())
    }

    /// Band for `priority` under these thresholds
    pub fn band_of(&self, priority: Priority) -> Band {
        Band::classify(priority, &self.thresholds)
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_boundaries() {
        let t = BandThresholds::default();
        assert_eq!(Band::classify(SJF_THRESHOLD, &t), Band::Sjf);
        assert_eq!(Band::classify(SJF_THRESHOLD - 1, &t), Band::RoundRobin);
        assert_eq!(Band::classify(PRIORITY_THRESHOLD, &t), Band::RoundRobin);
        assert_eq!(Band::classify(PRIORITY_THRESHOLD - 1, &t), Band::Priority);
        assert_eq!(Band::classify(Priority::MIN, &t), Band::Priority);
        assert_eq!(Band::classify(Priority::MAX, &t), Band::Sjf);
    }

    #[test]
    fn test_aging_cap() {
        assert_eq!(AgingCap::Unbounded.boosted(45, 10), 55);
        assert_eq!(AgingCap::Unbounded.boosted(Priority::MAX - 1, 10), Priority::MAX);
        assert_eq!(AgingCap::Clamp(149).boosted(145, 10), 149);
        assert_eq!(AgingCap::Clamp(149).boosted(160, 10), 160);
    }

    #[test]
    fn test_validate() {
        assert!(SchedConfig::default().validate().is_ok());
        assert!(SchedConfig::default().with_thresholds(50, 50).validate().is_err());
        assert!(SchedConfig::default().with_aging(0, 10).validate().is_err());
        assert!(SchedConfig::default().with_aging(100, 0).validate().is_err());
        assert!(SchedConfig::default()
            .with_aging_cap(AgingCap::Clamp(10))
            .validate()
            .is_err());
        assert!(SchedConfig::default()
            .with_aging_cap(AgingCap::Clamp(PRIORITY_MAX))
            .validate()
            .is_ok());
    }

    proptest! {
        #[test]
        fn bands_partition_priority_range(
            priority in any::<i32>(),
            low in -1_000i32..1_000,
            gap in 1i32..1_000,
        ) {
            let t = BandThresholds::new(low + gap, low);
            let band = Band::classify(priority, &t);
            let in_sjf = priority >= t.sjf;
            let in_rr = priority >= t.priority && priority < t.sjf;
            let in_pri = priority < t.priority;
            prop_assert_eq!(in_sjf as u8 + in_rr as u8 + in_pri as u8, 1);
            prop_assert_eq!(band == Band::Sjf, in_sjf);
            prop_assert_eq!(band == Band::RoundRobin, in_rr);
            prop_assert_eq!(band == Band::Priority, in_pri);
        }

        #[test]
        fn boost_never_lowers_priority(
            priority in any::<i32>(),
            boost in 1i32..100,
            max in 0i32..1_000,
        ) {
            prop_assert!(AgingCap::Unbounded.boosted(priority, boost) >= priority);
            prop_assert!(AgingCap::Clamp(max).boosted(priority, boost) >= priority);
        }
    }
}
