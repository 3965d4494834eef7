//! EMA (Exponential Moving Average) burst prediction
//!
//! `next = alpha * actual + (1 - alpha) * previous`. With alpha = 0.5 this is
//! `0.5 * (actual + previous)`, the estimate the SJF queue sorts on.

use crate::time::Tick;

/// EMA alpha parameter (0.5 = equal weight to the last burst and history)
pub const EMA_ALPHA: f64 = 0.5;

/// Predict the next burst from the burst just consumed
pub fn next_estimate(actual_ticks: Tick, previous: f64) -> f64 {
    EMA_ALPHA * (actual_ticks as f64) + (1.0 - EMA_ALPHA) * previous
}
