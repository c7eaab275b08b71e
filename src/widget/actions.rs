//! Inbound action payloads

use serde::Deserialize;

/// User action the widget understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    Start,
    Pause,
    Stop,
}

impl WidgetAction {
    /// Map an action id to an action; unknown ids yield `None`
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "startTimer" => Some(WidgetAction::Start),
            "pauseTimer" => Some(WidgetAction::Pause),
            "stopTimer" => Some(WidgetAction::Stop),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            WidgetAction::Start => "startTimer",
            WidgetAction::Pause => "pauseTimer",
            WidgetAction::Stop => "stopTimer",
        }
    }
}

/// Action data posted by the template's buttons.
///
/// `time` echoes the displayed countdown; it is logged but never acted on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionPayload {
    pub id: Option<String>,
    pub time: Option<String>,
}

impl ActionPayload {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn action(&self) -> Option<WidgetAction> {
        self.id.as_deref().and_then(WidgetAction::from_id)
    }
}
