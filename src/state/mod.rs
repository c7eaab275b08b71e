//! State management module
//!
//! This module contains the countdown state machine, its persisted snapshot
//! format and the display data rendered from it.

pub mod timer_state;
pub mod widget_data;

// Re-export main types
pub use timer_state::{
    TickOutcome, TimerState, TimerStatus, DEFAULT_REMAINING_SECONDS, MAX_REMAINING_SECONDS,
    STOP_RESET_SECONDS,
};
pub use widget_data::{format_remaining, WidgetData, FALLBACK_DATA};
