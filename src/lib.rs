//! Mini Timer - a countdown widget for a widget-board host
//!
//! This library provides the timer state machine, its snapshot format, the
//! widget that drives it from host actions and the ticker that counts down.

pub mod config;
pub mod host;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod widget;

// Re-export commonly used types
pub use config::Config;
pub use host::{ChannelHost, WidgetHost, WidgetUpdateRequest};
pub use state::{TimerState, TimerStatus};
pub use utils::signals::shutdown_signal;
pub use widget::{TimerWidget, WidgetProvider};
