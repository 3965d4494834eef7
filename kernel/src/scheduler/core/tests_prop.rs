//! Randomized checks of queue membership

use super::policy::{Band, SchedConfig};
use super::scheduler::Scheduler;
use crate::scheduler::testing::SimMachine;
use crate::scheduler::thread::{Priority, ThreadId, ThreadState};
use crate::time::Tick;
use alloc::vec::Vec;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Spawn { priority: Priority, burst: u8 },
    Advance(Tick),
    Pick,
    Reprioritize { slot: usize, priority: Priority },
    Yield,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-20i32..160, any::<u8>()).prop_map(|(priority, burst)| Op::Spawn { priority, burst }),
        (0u64..2_000).prop_map(Op::Advance),
        Just(Op::Pick),
        (any::<usize>(), -20i32..160).prop_map(|(slot, priority)| Op::Reprioritize { slot, priority }),
        Just(Op::Yield),
    ]
}

/// Every Ready thread sits in exactly the queue of its band; nobody else is queued.
fn check_partition(s: &Scheduler<SimMachine>) -> Result<(), TestCaseError> {
    for thread in s.threads().iter() {
        let hits = Band::ALL
            .into_iter()
            .map(|b| s.queued(b).filter(|&id| id == thread.id()).count())
            .sum::<usize>();
        if thread.state().is_schedulable() {
            prop_assert_eq!(hits, 1);
            prop_assert_eq!(s.band_of(thread.id()), Some(s.config().band_of(thread.priority())));
        } else {
            prop_assert_eq!(hits, 0);
        }
    }
    prop_assert_eq!(s.ready_count(), s.threads().iter().filter(|t| t.state() == ThreadState::Ready).count());
    Ok(())
}

proptest! {
    #[test]
    fn queues_partition_ready_threads(ops in proptest::collection::vec(op(), 1..64)) {
        let mut s = Scheduler::new(SimMachine::new(), SchedConfig::default()).unwrap();
        let mut ticks: Tick = 0;
        let mut spawned: Vec<ThreadId> = Vec::new();

        for op in ops {
            let guard = s.disable_interrupts();
            match op {
                Op::Spawn { priority, burst } => {
                    let id = s.create_thread("prop", priority);
                    s.threads_mut().get_mut(id).unwrap().set_burst_estimate(burst as f64);
                    s.ready_to_run(&guard, id).unwrap();
                    spawned.push(id);
                }
                Op::Advance(delta) => {
                    ticks += delta;
                    s.machine_mut().set_ticks(ticks);
                }
                Op::Pick => {
                    if let Some(next) = s.find_next_to_run(&guard) {
                        // Park the picked thread as blocked so it leaves the queues for good.
                        s.threads_mut().get_mut(next).unwrap().set_state(ThreadState::Blocked);
                    }
                }
                Op::Reprioritize { slot, priority } => {
                    if !spawned.is_empty() {
                        let id = spawned[slot % spawned.len()];
                        if let Some(t) = s.threads_mut().get_mut(id) {
                            t.set_priority(priority);
                        }
                        s.process_moving(&guard);
                    }
                }
                Op::Yield => {
                    s.yield_current(&guard).unwrap();
                }
            }
            check_partition(&s)?;
        }
    }

    #[test]
    fn aging_only_raises_priority(wait in 0u64..10_000, start in -20i32..50) {
        let mut s = Scheduler::new(SimMachine::new(), SchedConfig::default()).unwrap();
        let id = s.create_thread("waiter", start);
        let guard = s.disable_interrupts();
        s.ready_to_run(&guard, id).unwrap();
        s.machine_mut().set_ticks(wait);
        s.aging(&guard);
        let after = s.threads().get(id).unwrap().priority();
        prop_assert!(after >= start);
        if wait >= s.config().aging_interval {
            prop_assert_eq!(after, start + s.config().priority_boost);
        } else {
            prop_assert_eq!(after, start);
        }
    }
}
