//! Scheduler Core - tri-band dispatch (SJF / Round-Robin / Priority)
//!
//! Chooses the next thread to run and hands the CPU over to it.
//!
//! # Mutual exclusion
//! Every entry point runs with interrupts disabled: that is the whole
//! locking story on a uniprocessor. A real lock cannot be used here, since
//! waiting on it would call back into `find_next_to_run`. Entry points take
//! an `&InterruptGuard` and assert the live interrupt level.
//!
//! # Destruction
//! A finishing thread cannot free its own stack while running on it. `run`
//! parks it in `to_be_destroyed` and the slot is drained only after the
//! context switch has returned, i.e. on some other thread's stack.

use super::error::{SchedulerError, SchedulerResult};
use super::policy::{Band, SchedConfig};
use super::queues::ReadyQueues;
use super::statistics::SchedulerStats;
use crate::scheduler::prediction::next_estimate;
use crate::scheduler::switch::Machine;
use crate::scheduler::thread::{
    validate_transition, Priority, ThreadId, ThreadState, ThreadTable,
};
use crate::scheduler::trace::{TraceEvent, TraceKind, TraceRing};
use crate::sync::{InterruptController, InterruptGuard};
use crate::time::Tick;
use core::fmt;

/// Name of the boot thread created with the scheduler
pub const MAIN_THREAD_NAME: &str = "main";

/// Priority of the boot thread
pub const MAIN_THREAD_PRIORITY: Priority = 0;

/// Dispatch state for one CPU
pub struct Scheduler<M: Machine> {
    machine: M,
    config: SchedConfig,
    threads: ThreadTable,
    queues: ReadyQueues,
    /// Thread owning the CPU
    current: ThreadId,
    /// Finished thread whose stack we may still be running on
    to_be_destroyed: Option<ThreadId>,
    stats: SchedulerStats,
    trace: TraceRing,
}

impl<M: Machine> Scheduler<M> {
    /// Create a scheduler whose boot thread is already running
    pub fn new(machine: M, config: SchedConfig) -> SchedulerResult<Self> {
        config.validate().map_err(|err| crate::sched_error!(err))?;

        let mut threads = ThreadTable::new();
        let main = threads.create(MAIN_THREAD_NAME, MAIN_THREAD_PRIORITY);
        if let Some(thread) = threads.get_mut(main) {
            thread.set_state(ThreadState::Running);
            thread.set_burst_start(machine.now());
        }

        log::debug!(
            "[SCHED] Initialized (SJF >= {}, RR >= {}, aging {} ticks / +{})",
            config.thresholds.sjf,
            config.thresholds.priority,
            config.aging_interval,
            config.priority_boost
        );

        Ok(Self {
            machine,
            config,
            threads,
            queues: ReadyQueues::new(),
            current: main,
            to_be_destroyed: None,
            stats: SchedulerStats::new(),
            trace: TraceRing::new(config.trace_flags, config.trace_capacity),
        })
    }

    /// Disable interrupts until the returned guard is dropped
    pub fn disable_interrupts(&self) -> InterruptGuard<M::Irq> {
        InterruptGuard::new(self.machine.interrupts().clone())
    }

    fn assert_interrupts_off(&self, entry: &str) {
        crate::sched_assert!(
            self.machine.interrupts().is_disabled(),
            "{} entered with interrupts enabled",
            entry
        );
    }

    /// Register a new thread (state `New`, not yet ready)
    pub fn create_thread(&mut self, name: &str, priority: Priority) -> ThreadId {
        self.threads.create(name, priority)
    }

    /// Mark a thread ready and queue it in the band of its priority.
    pub fn ready_to_run(
        &mut self,
        _guard: &InterruptGuard<M::Irq>,
        id: ThreadId,
    ) -> SchedulerResult<()> {
        self.assert_interrupts_off("ready_to_run");

        let thread = self
            .threads
            .get(id)
            .ok_or_else(|| crate::sched_error!(SchedulerError::ThreadNotFound { thread_id: id }))?;
        let from = thread.state();
        if !validate_transition(from, ThreadState::Ready) {
            return Err(crate::sched_error!(SchedulerError::InvalidStateTransition {
                thread_id: id,
                from,
                to: ThreadState::Ready,
            }));
        }

        log::debug!("Putting thread on ready list: {}", thread.name());
        self.admit(id);
        Ok(())
    }

    /// Queue `id` without checking its state. Returns the band used.
    fn admit(&mut self, id: ThreadId) -> Option<Band> {
        let now = self.machine.now();
        let thread = self.threads.get_mut(id)?;
        thread.set_state(ThreadState::Ready);
        thread.set_ready_since(now);
        let band = self.config.band_of(thread.priority());

        self.queues.list_mut(band).insert(id, &self.threads);
        self.stats.admissions += 1;
        self.trace.emit(TraceEvent {
            tick: now,
            thread: id,
            kind: TraceKind::Ready { band },
        });
        Some(band)
    }

    /// Boost threads that waited too long in the Priority queue, then
    /// requalify every queue. Returns the number of boosted threads.
    pub fn aging(&mut self, _guard: &InterruptGuard<M::Irq>) -> usize {
        self.assert_interrupts_off("aging");
        self.age_priority_queue()
    }

    fn age_priority_queue(&mut self) -> usize {
        let now = self.machine.now();
        let interval = self.config.aging_interval;
        let boost = self.config.priority_boost;
        let cap = self.config.aging_cap;
        let mut boosted = 0;

        for id in self.queues.list(Band::Priority).snapshot() {
            let Some(thread) = self.threads.get_mut(id) else {
                continue;
            };
            if now.saturating_sub(thread.ready_since()) < interval {
                continue;
            }

            let from = thread.priority();
            let to = cap.boosted(from, boost);
            thread.set_priority(to);
            thread.set_ready_since(now);

            // Reposition under the new priority.
            let list = self.queues.list_mut(Band::Priority);
            list.remove(id);
            list.insert(id, &self.threads);

            if to != from {
                boosted += 1;
                self.stats.aging_boosts += 1;
                self.trace.emit(TraceEvent {
                    tick: now,
                    thread: id,
                    kind: TraceKind::Aged { from, to },
                });
            }
        }

        self.requalify();
        boosted
    }

    /// Move every queued thread whose band changed into the right queue.
    /// Returns the number of moved threads.
    pub fn process_moving(&mut self, _guard: &InterruptGuard<M::Irq>) -> usize {
        self.assert_interrupts_off("process_moving");
        self.requalify()
    }

    fn requalify(&mut self) -> usize {
        let mut moved = 0;

        for band in Band::ALL {
            // Iterate a copy: threads leave this list while we walk it.
            for id in self.queues.list(band).snapshot() {
                let Some(thread) = self.threads.get(id) else {
                    continue;
                };
                let target = self.config.band_of(thread.priority());
                if target == band {
                    continue;
                }

                self.queues.list_mut(band).remove(id);
                self.admit(id);
                moved += 1;
                self.stats.requeues += 1;
                self.trace.emit(TraceEvent {
                    tick: self.machine.now(),
                    thread: id,
                    kind: TraceKind::Requeued { from: band, to: target },
                });
            }
        }
        moved
    }

    /// Pop the next thread to dispatch, or `None` if nothing is ready.
    ///
    /// Runs aging first. SJF beats Round-Robin beats Priority, whatever the
    /// wait times inside the lower bands.
    pub fn find_next_to_run(&mut self, _guard: &InterruptGuard<M::Irq>) -> Option<ThreadId> {
        self.assert_interrupts_off("find_next_to_run");

        self.age_priority_queue();

        match self.queues.pop_next() {
            Some((band, id)) => {
                self.stats.picks += 1;
                log::debug!("[SCHED] Picked thread {} from {} queue", id, band);
                Some(id)
            }
            None => {
                self.stats.idle_picks += 1;
                None
            }
        }
    }

    /// Dispatch the CPU to `next`.
    ///
    /// The caller has already moved the outgoing thread to Ready or Blocked.
    /// With `finishing`, the outgoing thread is destroyed once we are off its
    /// stack. Dispatching the current thread to itself does nothing.
    pub fn run(
        &mut self,
        _guard: &InterruptGuard<M::Irq>,
        next: ThreadId,
        finishing: bool,
    ) -> SchedulerResult<()> {
        let old = self.current;
        if old == next {
            return Ok(());
        }

        self.assert_interrupts_off("run");

        if !self.threads.contains(next) {
            return Err(crate::sched_error!(SchedulerError::ThreadNotFound { thread_id: next }));
        }
        if let Some(band) = self.queues.band_of(next) {
            return Err(crate::sched_error!(SchedulerError::AlreadyQueued {
                thread_id: next,
                band,
            }));
        }

        if finishing {
            crate::sched_assert!(
                self.to_be_destroyed.is_none(),
                "thread {} finishing while thread {:?} awaits destruction",
                old,
                self.to_be_destroyed
            );
            self.to_be_destroyed = Some(old);
        }

        let now = self.machine.now();
        let Some(outgoing) = self.threads.get_mut(old) else {
            panic!("[SCHED CRITICAL] Invariant violated: current thread {} not in thread table", old);
        };
        if finishing {
            outgoing.set_state(ThreadState::Finished);
        }

        if outgoing.has_user_space() {
            self.machine.save_user_registers(outgoing);
            self.machine.save_address_space(outgoing);
        }

        if let Err(overflow) = self.machine.check_stack(outgoing) {
            panic!("[SCHED CRITICAL] Invariant violated: {}", overflow);
        }

        let consumed: Tick = self.machine.elapsed_since(outgoing.burst_start());
        outgoing.set_burst_estimate(next_estimate(consumed, outgoing.burst_estimate()));

        if let Some(incoming) = self.threads.get_mut(next) {
            incoming.set_burst_start(now);
            incoming.set_state(ThreadState::Running);
        }
        self.current = next;
        self.stats.switches += 1;
        self.trace.emit(TraceEvent {
            tick: now,
            thread: next,
            kind: TraceKind::Running,
        });
        log::debug!("Switching from: {} to: {}", old, next);

        self.machine.switch(old, next);

        // Back on `old`'s stack, possibly much later.
        self.assert_interrupts_off("run (resumed)");
        log::debug!("Now in thread: {}", old);

        self.drain_destroyed();

        if let Some(resumed) = self.threads.get(old) {
            if resumed.has_user_space() {
                self.machine.restore_user_registers(resumed);
                self.machine.restore_address_space(resumed);
            }
        }
        Ok(())
    }

    /// Give the CPU to the next ready thread, if any, and requeue the
    /// current one. Returns the thread that was dispatched.
    pub fn yield_current(
        &mut self,
        guard: &InterruptGuard<M::Irq>,
    ) -> SchedulerResult<Option<ThreadId>> {
        let Some(next) = self.find_next_to_run(guard) else {
            return Ok(None);
        };
        self.ready_to_run(guard, self.current)?;
        self.run(guard, next, false)?;
        Ok(Some(next))
    }

    /// Free the thread parked by a finishing `run`, if any. Idempotent.
    pub fn check_to_be_destroyed(&mut self, _guard: &InterruptGuard<M::Irq>) {
        self.assert_interrupts_off("check_to_be_destroyed");
        self.drain_destroyed();
    }

    fn drain_destroyed(&mut self) {
        let Some(id) = self.to_be_destroyed.take() else {
            return;
        };
        if let Some(thread) = self.threads.remove(id) {
            log::debug!("Destroying thread: {}", thread.name());
            self.stats.destroyed += 1;
            self.trace.emit(TraceEvent {
                tick: self.machine.now(),
                thread: id,
                kind: TraceKind::Destroyed,
            });
            self.machine.finalize(thread);
        }
    }

    /// Snapshot of the ready queues for printing
    pub fn dump(&self) -> ReadyDump<'_> {
        ReadyDump {
            queues: &self.queues,
            threads: &self.threads,
        }
    }

    /// Print the ready queue contents. For debugging.
    pub fn print(&self) {
        log::info!("{}", self.dump());
    }

    pub fn current(&self) -> ThreadId {
        self.current
    }

    /// Thread waiting for destruction
    pub fn pending_destruction(&self) -> Option<ThreadId> {
        self.to_be_destroyed
    }

    pub fn threads(&self) -> &ThreadTable {
        &self.threads
    }

    /// Mutable thread table.
    ///
    /// Changing the priority of a queued thread leaves it in the wrong band
    /// until `process_moving` runs (the next `find_next_to_run` does).
    pub fn threads_mut(&mut self) -> &mut ThreadTable {
        &mut self.threads
    }

    /// Queue currently holding `id`
    pub fn band_of(&self, id: ThreadId) -> Option<Band> {
        self.queues.band_of(id)
    }

    pub fn queue_len(&self, band: Band) -> usize {
        self.queues.list(band).len()
    }

    /// Thread ids of one queue, in selection order
    pub fn queued(&self, band: Band) -> impl Iterator<Item = ThreadId> + '_ {
        self.queues.list(band).iter()
    }

    pub fn ready_count(&self) -> usize {
        self.queues.len()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn trace(&self) -> &TraceRing {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut TraceRing {
        &mut self.trace
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }
}

/// Printable view of the ready queues
pub struct ReadyDump<'a> {
    queues: &'a ReadyQueues,
    threads: &'a ThreadTable,
}

impl fmt::Display for ReadyDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ready list contents:")?;
        for band in Band::ALL {
            write!(f, "  {:<8} [", band.name())?;
            for (i, id) in self.queues.list(band).iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match self.threads.get(id) {
                    Some(t) => write!(
                        f,
                        "{}(p={}, b={:.1})",
                        id,
                        t.priority(),
                        t.burst_estimate()
                    )?,
                    None => write!(f, "{}(?)", id)?,
                }
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
