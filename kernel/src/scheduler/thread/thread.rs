//! Thread descriptor and thread table
//!
//! The descriptor only carries the scheduling-relevant part of a thread.
//! Stacks, saved registers and address spaces belong to the platform layer,
//! which finds them by `ThreadId`.

use super::state::ThreadState;
use crate::time::Tick;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::cmp::Ordering;

/// Thread ID type
pub type ThreadId = u64;

/// Dynamic thread priority. Higher runs first across bands.
pub type Priority = i32;

/// Thread descriptor
#[derive(Debug, Clone)]
pub struct Thread {
    id: ThreadId,
    name: String,
    state: ThreadState,
    priority: Priority,
    /// Predicted length of the next CPU burst, in ticks
    burst_estimate: f64,
    /// Last time the thread entered a ready queue
    ready_since: Tick,
    /// Time the current (or last) burst started
    burst_start: Tick,
    /// Owns a user-mode address space
    user_space: bool,
}

impl Thread {
    pub fn new(id: ThreadId, name: &str, priority: Priority) -> Self {
        Self {
            id,
            name: String::from(name),
            state: ThreadState::New,
            priority,
            burst_estimate: 0.0,
            ready_since: 0,
            burst_start: 0,
            user_space: false,
        }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn set_state(&mut self, state: ThreadState) {
        self.state = state;
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn burst_estimate(&self) -> f64 {
        self.burst_estimate
    }

    pub fn set_burst_estimate(&mut self, estimate: f64) {
        self.burst_estimate = estimate;
    }

    pub fn ready_since(&self) -> Tick {
        self.ready_since
    }

    pub fn set_ready_since(&mut self, tick: Tick) {
        self.ready_since = tick;
    }

    pub fn burst_start(&self) -> Tick {
        self.burst_start
    }

    pub fn set_burst_start(&mut self, tick: Tick) {
        self.burst_start = tick;
    }

    pub fn has_user_space(&self) -> bool {
        self.user_space
    }

    pub fn set_user_space(&mut self, user_space: bool) {
        self.user_space = user_space;
    }

    /// SJF order: shorter predicted burst first
    pub fn compare_by_burst(a: &Thread, b: &Thread) -> Ordering {
        a.burst_estimate.total_cmp(&b.burst_estimate)
    }

    /// Priority order: higher priority first
    pub fn compare_by_priority(a: &Thread, b: &Thread) -> Ordering {
        b.priority.cmp(&a.priority)
    }
}

/// Kernel thread table
///
/// Owns every descriptor. Ready queues refer to threads by id only.
#[derive(Debug, Default)]
pub struct ThreadTable {
    threads: BTreeMap<ThreadId, Thread>,
    next_id: ThreadId,
}

impl ThreadTable {
    pub fn new() -> Self {
        Self {
            threads: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Allocate an id and register a `New` thread
    pub fn create(&mut self, name: &str, priority: Priority) -> ThreadId {
        let id = self.next_id;
        self.next_id += 1;
        self.threads.insert(id, Thread::new(id, name, priority));
        id
    }

    pub fn get(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.get(&id)
    }

    pub fn get_mut(&mut self, id: ThreadId) -> Option<&mut Thread> {
        self.threads.get_mut(&id)
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.threads.contains_key(&id)
    }

    /// Unregister a thread and hand back its descriptor
    pub fn remove(&mut self, id: ThreadId) -> Option<Thread> {
        self.threads.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values()
    }
}
