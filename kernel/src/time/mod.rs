//! Time management subsystem
//!
//! The dispatch core only needs a monotonic tick counter. Ticks are whatever
//! unit the platform's timer interrupt advances.

/// Monotonic tick count
pub type Tick = u64;

/// Read-only monotonic tick source
pub trait TickClock {
    /// Current tick count. Never decreases.
    fn now(&self) -> Tick;

    /// Ticks elapsed since `since` (0 if `since` is in the future)
    fn elapsed_since(&self, since: Tick) -> Tick {
        self.now().saturating_sub(since)
    }
}
