//! Ready queues (3-band system)
//!
//! Queues hold thread ids only. Sorted queues look up the descriptors in the
//! thread table when inserting; ties keep insertion order.

use super::policy::Band;
use crate::scheduler::thread::{Thread, ThreadId, ThreadTable};
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// Ordering discipline of a ready list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Insertion order
    Fifo,
    /// Ascending burst estimate
    ShortestBurst,
    /// Descending priority
    HighestPriority,
}

impl Discipline {
    pub fn for_band(band: Band) -> Self {
        match band {
            Band::Sjf => Discipline::ShortestBurst,
            Band::RoundRobin => Discipline::Fifo,
            Band::Priority => Discipline::HighestPriority,
        }
    }
}

/// One ready list
#[derive(Debug)]
pub struct ReadyList {
    discipline: Discipline,
    entries: VecDeque<ThreadId>,
}

impl ReadyList {
    pub fn new(band: Band) -> Self {
        Self {
            discipline: Discipline::for_band(band),
            entries: VecDeque::new(),
        }
    }

    /// Insert `id` at its position under this list's discipline
    pub fn insert(&mut self, id: ThreadId, threads: &ThreadTable) {
        match self.discipline {
            Discipline::Fifo => self.entries.push_back(id),
            Discipline::ShortestBurst => self.sorted_insert(id, threads, Thread::compare_by_burst),
            Discipline::HighestPriority => {
                self.sorted_insert(id, threads, Thread::compare_by_priority)
            }
        }
    }

    fn sorted_insert(
        &mut self,
        id: ThreadId,
        threads: &ThreadTable,
        compare: fn(&Thread, &Thread) -> Ordering,
    ) {
        let Some(new) = threads.get(id) else {
            self.entries.push_back(id);
            return;
        };
        // After every entry that compares equal, so ties stay FIFO.
        let pos = self
            .entries
            .iter()
            .position(|&other| {
                threads
                    .get(other)
                    .is_some_and(|queued| compare(new, queued) == Ordering::Less)
            })
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, id);
    }

    /// Remove `id`; returns whether it was queued
    pub fn remove(&mut self, id: ThreadId) -> bool {
        match self.entries.iter().position(|&queued| queued == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn pop_front(&mut self) -> Option<ThreadId> {
        self.entries.pop_front()
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.entries.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.entries.iter().copied()
    }

    /// Copy of the membership, safe to iterate while the list is edited
    pub fn snapshot(&self) -> Vec<ThreadId> {
        self.entries.iter().copied().collect()
    }
}

/// The three ready lists
#[derive(Debug)]
pub struct ReadyQueues {
    sjf: ReadyList,
    round_robin: ReadyList,
    priority: ReadyList,
}

impl ReadyQueues {
    pub fn new() -> Self {
        Self {
            sjf: ReadyList::new(Band::Sjf),
            round_robin: ReadyList::new(Band::RoundRobin),
            priority: ReadyList::new(Band::Priority),
        }
    }

    pub fn list(&self, band: Band) -> &ReadyList {
        match band {
            Band::Sjf => &self.sjf,
            Band::RoundRobin => &self.round_robin,
            Band::Priority => &self.priority,
        }
    }

    pub fn list_mut(&mut self, band: Band) -> &mut ReadyList {
        match band {
            Band::Sjf => &mut self.sjf,
            Band::RoundRobin => &mut self.round_robin,
            Band::Priority => &mut self.priority,
        }
    }

    /// Queue currently holding `id`
    pub fn band_of(&self, id: ThreadId) -> Option<Band> {
        Band::ALL.into_iter().find(|&band| self.list(band).contains(id))
    }

    /// Pop from the highest non-empty band (SJF > RR > Priority)
    pub fn pop_next(&mut self) -> Option<(Band, ThreadId)> {
        Band::ALL
            .into_iter()
            .find_map(|band| self.list_mut(band).pop_front().map(|id| (band, id)))
    }

    pub fn len(&self) -> usize {
        self.sjf.len() + self.round_robin.len() + self.priority.len()
    }

    /// Check if all queues are empty
    pub fn is_empty(&self) -> bool {
        self.sjf.is_empty() && self.round_robin.is_empty() && self.priority.is_empty()
    }
}

impl Default for ReadyQueues {
    fn default() -> Self {
        Self::new()
    }
}
