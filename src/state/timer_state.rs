//! Timer state structure and lifecycle transitions

use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Countdown length used when no snapshot is restored (5 minutes)
pub const DEFAULT_REMAINING_SECONDS: u64 = 5 * 60;

/// Countdown length the stop action resets to (15 minutes).
///
/// This intentionally differs from [`DEFAULT_REMAINING_SECONDS`].
pub const STOP_RESET_SECONDS: u64 = 15 * 60;

/// Largest countdown a snapshot may carry (the host stores a 32-bit int)
pub const MAX_REMAINING_SECONDS: u64 = i32::MAX as u64;

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Stopped => "stopped",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running, nothing changed
    Ignored,
    /// One second was consumed and the countdown continues
    Counting,
    /// The countdown reached zero and the timer stopped
    Expired,
}

/// Timer state for the countdown widget.
///
/// Serialized as the `{RemainingSeconds, State}` snapshot the host persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimerState {
    pub remaining_seconds: u64,
    #[serde(deserialize_with = "status_or_stopped")]
    pub state: TimerStatus,
}

fn status_or_stopped<'de, D>(deserializer: D) -> Result<TimerStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<TimerStatus>::deserialize(deserializer)?.unwrap_or_default())
}

impl TimerState {
    /// Create a stopped timer with the default countdown
    pub fn new() -> Self {
        Self {
            remaining_seconds: DEFAULT_REMAINING_SECONDS,
            state: TimerStatus::Stopped,
        }
    }

    /// Restore a timer from a host-supplied snapshot string.
    ///
    /// Never fails: empty, non-JSON, incomplete or malformed input all
    /// degrade to [`TimerState::new`].
    pub fn restore(initial_state: &str) -> Self {
        if initial_state.is_empty() {
            return Self::new();
        }

        if !initial_state.trim_start().starts_with('{') {
            warn!("initial state is not valid JSON: '{}'", initial_state);
            return Self::new();
        }

        match Self::parse_snapshot(initial_state) {
            Ok(Some(state)) => state,
            Ok(None) => {
                warn!(
                    "initial state JSON does not contain required properties: {}",
                    initial_state
                );
                Self::new()
            }
            Err(e) => {
                warn!(
                    "failed to deserialize initial state '{}': {}",
                    initial_state, e
                );
                Self::new()
            }
        }
    }

    /// Parse a snapshot, returning `None` when either field is absent
    pub fn parse_snapshot(raw: &str) -> Result<Option<Self>, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let has_fields = value
            .as_object()
            .map(|obj| obj.contains_key("RemainingSeconds") && obj.contains_key("State"))
            .unwrap_or(false);

        if !has_fields {
            return Ok(None);
        }

        let state: Self = serde_json::from_value(value)?;
        if state.remaining_seconds > MAX_REMAINING_SECONDS {
            return Err(serde_json::Error::custom(format!(
                "RemainingSeconds {} exceeds {}",
                state.remaining_seconds, MAX_REMAINING_SECONDS
            )));
        }

        Ok(Some(state))
    }

    /// Serialize to the persisted snapshot form
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerStatus::Running
    }

    /// Move to running. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = TimerStatus::Running;
        true
    }

    /// Move from running to paused. Returns false from any other state.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = TimerStatus::Paused;
        true
    }

    /// Stop and reset the countdown. Always applies.
    pub fn stop(&mut self) {
        self.state = TimerStatus::Stopped;
        self.remaining_seconds = STOP_RESET_SECONDS;
    }

    /// Consume one second while running
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = TimerStatus::Stopped;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn state(remaining_seconds: u64, state: TimerStatus) -> TimerState {
        TimerState {
            remaining_seconds,
            state,
        }
    }

    #[test]
    fn test_restore_empty_uses_defaults() {
        assert_eq!(TimerState::restore(""), TimerState::new());
        assert_eq!(TimerState::new(), state(300, TimerStatus::Stopped));
    }

    #[test]
    fn test_restore_full_snapshot() {
        let restored = TimerState::restore(r#"{"RemainingSeconds":120,"State":"paused"}"#);
        assert_eq!(restored, state(120, TimerStatus::Paused));
    }

    #[test]
    fn test_restore_with_leading_whitespace() {
        let restored = TimerState::restore("  \n{\"RemainingSeconds\":42,\"State\":\"running\"}");
        assert_eq!(restored, state(42, TimerStatus::Running));
    }

    #[test]
    fn test_restore_missing_state_keeps_defaults() {
        let restored = TimerState::restore(r#"{"RemainingSeconds":120}"#);
        assert_eq!(restored, TimerState::new());
    }

    #[test]
    fn test_restore_missing_remaining_keeps_defaults() {
        let restored = TimerState::restore(r#"{"State":"paused"}"#);
        assert_eq!(restored, TimerState::new());
    }

    #[test]
    fn test_restore_null_state_means_stopped() {
        let restored = TimerState::restore(r#"{"RemainingSeconds":75,"State":null}"#);
        assert_eq!(restored, state(75, TimerStatus::Stopped));
    }

    #[test]
    fn test_restore_garbage_keeps_defaults() {
        assert_eq!(TimerState::restore("definitely not json"), TimerState::new());
        assert_eq!(TimerState::restore("{not json either"), TimerState::new());
        assert_eq!(TimerState::restore("[1,2,3]"), TimerState::new());
    }

    #[test]
    fn test_restore_invalid_values_keep_defaults() {
        assert_eq!(
            TimerState::restore(r#"{"RemainingSeconds":-5,"State":"paused"}"#),
            TimerState::new()
        );
        assert_eq!(
            TimerState::restore(r#"{"RemainingSeconds":10,"State":"exploded"}"#),
            TimerState::new()
        );
    }

    #[test]
    fn test_restore_rejects_out_of_range_seconds() {
        assert_eq!(
            TimerState::restore(r#"{"RemainingSeconds":99999999999,"State":"paused"}"#),
            TimerState::new()
        );
        assert_eq!(
            TimerState::restore(r#"{"RemainingSeconds":2147483648,"State":"paused"}"#),
            TimerState::new()
        );
        assert_eq!(
            TimerState::restore(r#"{"RemainingSeconds":2147483647,"State":"paused"}"#),
            state(MAX_REMAINING_SECONDS, TimerStatus::Paused)
        );
    }

    #[test]
    fn test_snapshot_format() {
        let snapshot = state(120, TimerStatus::Paused).to_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"RemainingSeconds":120,"State":"paused"}"#);
        assert_eq!(TimerState::restore(&snapshot), state(120, TimerStatus::Paused));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut timer = TimerState::new();
        assert!(timer.start());
        assert!(!timer.start());
        assert_eq!(timer, state(300, TimerStatus::Running));
    }

    #[test]
    fn test_start_resumes_paused() {
        let mut timer = state(90, TimerStatus::Paused);
        assert!(timer.start());
        assert_eq!(timer, state(90, TimerStatus::Running));
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut timer = TimerState::new();
        assert!(!timer.pause());
        assert_eq!(timer.state, TimerStatus::Stopped);

        timer.start();
        assert!(timer.pause());
        assert_eq!(timer.state, TimerStatus::Paused);
        assert!(!timer.pause());
    }

    #[test]
    fn test_stop_resets_to_fifteen_minutes() {
        // Stop resets to 900 while a fresh timer starts at 300.
        for status in [TimerStatus::Stopped, TimerStatus::Running, TimerStatus::Paused] {
            let mut timer = state(17, status);
            timer.stop();
            assert_eq!(timer, state(900, TimerStatus::Stopped));
        }
    }

    #[test]
    fn test_tick_sequence_to_expiry() {
        let mut timer = state(2, TimerStatus::Running);

        assert_eq!(timer.tick(), TickOutcome::Counting);
        assert_eq!(timer, state(1, TimerStatus::Running));

        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert_eq!(timer, state(0, TimerStatus::Stopped));

        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer, state(0, TimerStatus::Stopped));
    }

    #[test]
    fn test_tick_from_zero_clamps() {
        let mut timer = state(0, TimerStatus::Running);
        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert_eq!(timer, state(0, TimerStatus::Stopped));
    }

    #[test]
    fn test_tick_ignored_when_paused() {
        let mut timer = state(30, TimerStatus::Paused);
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer.remaining_seconds, 30);
    }
}
