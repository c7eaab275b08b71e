//! Widget module
//!
//! This module contains the timer widget, the action payloads it accepts and
//! the packaged template it renders with.

pub mod actions;
pub mod template;
pub mod timer_widget;

// Re-export main types
pub use actions::{ActionPayload, WidgetAction};
pub use template::{read_package_file, widget_template, TEMPLATE_URI};
pub use timer_widget::{TimerWidget, DEFINITION_ID};

/// Operations the widget board host invokes on a widget instance
pub trait WidgetProvider {
    /// Host-assigned instance id
    fn id(&self) -> &str;

    /// Id of the widget kind this instance belongs to
    fn definition_id(&self) -> &str;

    /// Last snapshot handed to the host for persistence
    fn custom_state(&self) -> String;

    fn template_for_widget(&self) -> String;

    fn data_for_widget(&self) -> String;

    /// Handle an action payload. Malformed or unknown payloads are ignored.
    fn on_action_invoked(&self, data: Option<&str>);
}
