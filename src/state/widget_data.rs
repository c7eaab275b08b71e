//! Display data handed to the host for rendering

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{TimerState, TimerStatus};

/// Payload returned when rendering fails
pub const FALLBACK_DATA: &str = r#"{"time":"5:00","state":"stopped"}"#;

/// Rendered data structure bound by the widget template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetData {
    pub time: String,
    pub state: TimerStatus,
}

impl WidgetData {
    pub fn from_state(timer: &TimerState) -> Self {
        Self {
            time: format_remaining(timer.remaining_seconds),
            state: timer.state,
        }
    }

    /// Serialize for the host, falling back to [`FALLBACK_DATA`] on failure
    pub fn render(timer: &TimerState) -> String {
        match serde_json::to_string(&Self::from_state(timer)) {
            Ok(data) => {
                debug!("Rendered widget data: {}", data);
                data
            }
            Err(e) => {
                warn!("Failed to render widget data: {}", e);
                FALLBACK_DATA.to_string()
            }
        }
    }
}

/// Format seconds as `HH:mm:ss` from one hour up, `mm:ss` below
pub fn format_remaining(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if total_seconds >= 3600 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
