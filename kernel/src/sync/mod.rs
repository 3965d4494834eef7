pub mod interrupt;

pub use interrupt::{IntLevel, InterruptController, InterruptGuard};
