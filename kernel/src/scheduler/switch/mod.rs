//! Context switch interface
//!
//! The dispatch core never touches registers, stacks or page tables itself.
//! Everything machine-dependent is behind `Machine`, implemented by the
//! platform layer (or a simulator in tests).

use crate::scheduler::thread::{Thread, ThreadId};
use crate::sync::InterruptController;
use crate::time::TickClock;
use core::fmt;

/// Stack overflow detected on a thread's kernel stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOverflow {
    pub thread_id: ThreadId,
    /// Bytes written past the guard
    pub overrun: usize,
}

impl fmt::Display for StackOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stack overflow on thread {} ({} bytes past guard)",
            self.thread_id, self.overrun
        )
    }
}

/// Machine-dependent collaborators of the dispatcher
pub trait Machine: TickClock {
    type Irq: InterruptController;

    /// Interrupt controller handle
    fn interrupts(&self) -> &Self::Irq;

    /// Swap execution contexts.
    ///
    /// Returns only when `from` is dispatched again, on `from`'s stack,
    /// with interrupts still disabled.
    fn switch(&mut self, from: ThreadId, to: ThreadId);

    /// Check the outgoing thread's stack guard
    fn check_stack(&self, thread: &Thread) -> Result<(), StackOverflow>;

    /// Save user-mode CPU registers of a thread that owns a user space
    fn save_user_registers(&mut self, thread: &Thread);

    /// Save address-space state (page table root, TLB tag, ...)
    fn save_address_space(&mut self, thread: &Thread);

    fn restore_user_registers(&mut self, thread: &Thread);

    fn restore_address_space(&mut self, thread: &Thread);

    /// Release everything the platform holds for a finished thread
    /// (stack, saved context). The descriptor is dropped afterwards.
    fn finalize(&mut self, thread: Thread);
}
