//! Background tasks module
//!
//! This module contains the periodic ticker that drives running timers.

pub mod ticker;

// Re-export main items
pub use ticker::{ticker_task, TickTarget, TICK_PERIOD};
