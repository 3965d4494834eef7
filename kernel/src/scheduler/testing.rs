//! Simulated machine for scheduler unit tests

use super::switch::{Machine, StackOverflow};
use super::thread::{Thread, ThreadId};
use crate::sync::{IntLevel, InterruptController};
use crate::time::{Tick, TickClock};
use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

/// Interrupt level shared between the machine and its guards
#[derive(Debug, Clone)]
pub struct SimIrq(Rc<Cell<IntLevel>>);

impl InterruptController for SimIrq {
    fn level(&self) -> IntLevel {
        self.0.get()
    }

    fn set_level(&self, level: IntLevel) -> IntLevel {
        self.0.replace(level)
    }
}

/// Calls the scheduler made into the machine, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineEvent {
    SaveRegisters(ThreadId),
    SaveAddressSpace(ThreadId),
    Switch { from: ThreadId, to: ThreadId },
    RestoreRegisters(ThreadId),
    RestoreAddressSpace(ThreadId),
    Finalize(ThreadId),
}

#[derive(Debug)]
pub struct SimMachine {
    ticks: Tick,
    irq: SimIrq,
    events: Vec<MachineEvent>,
    overflowed: BTreeSet<ThreadId>,
    enable_on_switch: bool,
}

impl SimMachine {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            irq: SimIrq(Rc::new(Cell::new(IntLevel::On))),
            events: Vec::new(),
            overflowed: BTreeSet::new(),
            enable_on_switch: false,
        }
    }

    pub fn set_ticks(&mut self, ticks: Tick) {
        self.ticks = ticks;
    }

    pub fn events(&self) -> &[MachineEvent] {
        &self.events
    }

    /// Make the stack check fail for `id`
    pub fn overflow_stack(&mut self, id: ThreadId) {
        self.overflowed.insert(id);
    }

    /// Simulate a broken switch that returns with interrupts on
    pub fn enable_interrupts_on_switch(&mut self) {
        self.enable_on_switch = true;
    }
}

impl TickClock for SimMachine {
    fn now(&self) -> Tick {
        self.ticks
    }
}

impl Machine for SimMachine {
    type Irq = SimIrq;

    fn interrupts(&self) -> &SimIrq {
        &self.irq
    }

    fn switch(&mut self, from: ThreadId, to: ThreadId) {
        self.events.push(MachineEvent::Switch { from, to });
        if self.enable_on_switch {
            self.irq.set_level(IntLevel::On);
        }
    }

    fn check_stack(&self, thread: &Thread) -> Result<(), StackOverflow> {
        if self.overflowed.contains(&thread.id()) {
            return Err(StackOverflow {
                thread_id: thread.id(),
                overrun: 64,
            });
        }
        Ok(())
    }

    fn save_user_registers(&mut self, thread: &Thread) {
        self.events.push(MachineEvent::SaveRegisters(thread.id()));
    }

    fn save_address_space(&mut self, thread: &Thread) {
        self.events.push(MachineEvent::SaveAddressSpace(thread.id()));
    }

    fn restore_user_registers(&mut self, thread: &Thread) {
        self.events.push(MachineEvent::RestoreRegisters(thread.id()));
    }

    fn restore_address_space(&mut self, thread: &Thread) {
        self.events.push(MachineEvent::RestoreAddressSpace(thread.id()));
    }

    fn finalize(&mut self, thread: Thread) {
        self.events.push(MachineEvent::Finalize(thread.id()));
    }
}
