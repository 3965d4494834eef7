//! Scheduling trace
//!
//! Every admission, dispatch, boost, requeue and destruction produces a
//! `TraceEvent`. Events are advisory: they go to the `sched::trace` log
//! target and into a bounded ring that diagnostics can drain. Nothing in the
//! scheduler reads them back.

use super::core::policy::Band;
use super::thread::{Priority, ThreadId};
use crate::time::Tick;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Trace event classes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TraceFlags: u8 {
        const READY     = 1 << 0;
        const RUNNING   = 1 << 1;
        const AGING     = 1 << 2;
        const REQUEUE   = 1 << 3;
        const DESTROY   = 1 << 4;
    }
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    /// Entered a ready queue
    Ready { band: Band },
    /// Dispatched onto the CPU
    Running,
    /// Priority raised by aging
    Aged { from: Priority, to: Priority },
    /// Moved to another queue after a priority change
    Requeued { from: Band, to: Band },
    /// Descriptor released
    Destroyed,
}

impl TraceKind {
    pub fn flag(&self) -> TraceFlags {
        match self {
            TraceKind::Ready { .. } => TraceFlags::READY,
            TraceKind::Running => TraceFlags::RUNNING,
            TraceKind::Aged { .. } => TraceFlags::AGING,
            TraceKind::Requeued { .. } => TraceFlags::REQUEUE,
            TraceKind::Destroyed => TraceFlags::DESTROY,
        }
    }
}

/// One scheduling event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub tick: Tick,
    pub thread: ThreadId,
    pub kind: TraceKind,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick {} Thread {}\t", self.tick, self.thread)?;
        match self.kind {
            TraceKind::Ready { band } => write!(f, "ProcessReady\t{}", band),
            TraceKind::Running => write!(f, "ProcessRunning"),
            TraceKind::Aged { from, to } => write!(f, "ProcessAged\t{} -> {}", from, to),
            TraceKind::Requeued { from, to } => write!(f, "ProcessMoved\t{} -> {}", from, to),
            TraceKind::Destroyed => write!(f, "ProcessDestroyed"),
        }
    }
}

/// Bounded event ring (oldest events are dropped)
#[derive(Debug)]
pub struct TraceRing {
    events: VecDeque<TraceEvent>,
    capacity: usize,
    flags: TraceFlags,
    dropped: u64,
}

impl TraceRing {
    pub fn new(flags: TraceFlags, capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            flags,
            dropped: 0,
        }
    }

    /// Log and record `event` if its class is enabled
    pub fn emit(&mut self, event: TraceEvent) {
        if !self.flags.contains(event.kind.flag()) {
            return;
        }
        log::info!(target: "sched::trace", "{}", event);

        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted because the ring was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    /// Take every recorded event, oldest first
    pub fn drain(&mut self) -> Vec<TraceEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn ready(tick: Tick, thread: ThreadId) -> TraceEvent {
        TraceEvent {
            tick,
            thread,
            kind: TraceKind::Ready {
                band: Band::RoundRobin,
            },
        }
    }

    #[test]
    fn test_ring_drops_oldest() {
        let mut ring = TraceRing::new(TraceFlags::all(), 2);
        ring.emit(ready(1, 1));
        ring.emit(ready(2, 2));
        ring.emit(ready(3, 3));
        assert_eq!(ring.dropped(), 1);
        let ticks: Vec<Tick> = ring.drain().iter().map(|e| e.tick).collect();
        assert_eq!(ticks, [2, 3]);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_flags_filter_events() {
        let mut ring = TraceRing::new(TraceFlags::RUNNING, 8);
        ring.emit(ready(1, 1));
        ring.emit(TraceEvent {
            tick: 2,
            thread: 1,
            kind: TraceKind::Running,
        });
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.iter().next().unwrap().kind, TraceKind::Running);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut ring = TraceRing::new(TraceFlags::all(), 0);
        ring.emit(ready(1, 1));
        assert!(ring.is_empty());
        assert_eq!(ring.dropped(), 0);
    }

    #[test]
    fn test_display_format() {
        let line = format!("{}", ready(7, 3));
        assert_eq!(line, "Tick 7 Thread 3\tProcessReady\tRR");
    }
}
