//! Interrupt level model
//!
//! On a uniprocessor, "interrupts disabled" is the only mutual exclusion the
//! dispatch core relies on. A lock is not an option here: waiting on one would
//! call back into the scheduler.
//!
//! Every scheduler entry point takes an `&InterruptGuard`, so it can only be
//! reached while a guard is alive, and it also asks the controller for the
//! live level (the guard may belong to a different controller).

use core::fmt;
use core::marker::PhantomData;

/// Interrupt enable level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntLevel {
    /// Interrupts masked
    Off,
    /// Interrupts delivered
    On,
}

impl fmt::Display for IntLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "IntOff"),
            Self::On => write!(f, "IntOn"),
        }
    }
}

/// Handle on the interrupt controller.
///
/// Handles are cheap to clone: on real hardware this is a zero-sized type
/// wrapping `cli`/`sti`/`pushfq`.
pub trait InterruptController: Clone {
    /// Current level
    fn level(&self) -> IntLevel;

    /// Set the level and return the previous one
    fn set_level(&self, level: IntLevel) -> IntLevel;

    fn is_disabled(&self) -> bool {
        self.level() == IntLevel::Off
    }
}

/// RAII guard for disabling/restoring interrupts
///
/// Restores the level that was in effect when the guard was created, so
/// guards nest.
pub struct InterruptGuard<C: InterruptController> {
    ctl: C,
    previous: IntLevel,
    // The saved level belongs to this CPU.
    _not_send: PhantomData<*const ()>,
}

impl<C: InterruptController> InterruptGuard<C> {
    pub fn new(ctl: C) -> Self {
        let previous = ctl.set_level(IntLevel::Off);
        Self {
            ctl,
            previous,
            _not_send: PhantomData,
        }
    }

    /// Level that will be restored on drop
    pub fn previous(&self) -> IntLevel {
        self.previous
    }
}

impl<C: InterruptController> Drop for InterruptGuard<C> {
    fn drop(&mut self) {
        if self.previous == IntLevel::On {
            self.ctl.set_level(IntLevel::On);
        }
    }
}

impl<C: InterruptController> fmt::Debug for InterruptGuard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptGuard")
            .field("previous", &self.previous)
            .finish()
    }
}
