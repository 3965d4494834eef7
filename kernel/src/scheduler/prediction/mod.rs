//! Prediction algorithms for scheduler

pub mod ema;

pub use ema::{next_estimate, EMA_ALPHA};
