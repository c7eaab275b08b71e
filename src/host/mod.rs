//! Host runtime collaborator
//!
//! The widget board owns display and persistence. Widgets only push update
//! requests to it through [`WidgetHost`].

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Everything the host needs to redraw and persist one widget.
///
/// `sequence` increases with every state change of a widget, so a host can
/// drop a request that arrives after a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetUpdateRequest {
    pub widget_id: String,
    pub sequence: u64,
    pub template: String,
    pub data: String,
    pub custom_state: String,
}

/// Receiver side of widget updates
pub trait WidgetHost: Send + Sync {
    fn update_widget(&self, request: WidgetUpdateRequest) -> Result<()>;
}

/// Host that forwards update requests over a channel
#[derive(Debug, Clone)]
pub struct ChannelHost {
    update_tx: mpsc::UnboundedSender<WidgetUpdateRequest>,
}

impl ChannelHost {
    /// Create a host together with the receiver that observes its updates
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WidgetUpdateRequest>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self { update_tx }, update_rx)
    }
}

impl WidgetHost for ChannelHost {
    fn update_widget(&self, request: WidgetUpdateRequest) -> Result<()> {
        self.update_tx
            .send(request)
            .map_err(|e| anyhow!("widget host is gone, update for {} dropped", e.0.widget_id))
    }
}
