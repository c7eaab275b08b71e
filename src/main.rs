//! Mini Timer - console host for the countdown widget
//!
//! Reads action payloads from stdin, one JSON object per line, and prints
//! every update request the widget sends as a JSON line on stdout. Logs go
//! to stderr.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use mini_timer_widget::{
    config::Config,
    host::ChannelHost,
    utils::shutdown_signal,
    widget::{TimerWidget, WidgetProvider, DEFINITION_ID},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("mini_timer_widget={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting {} host v{}", DEFINITION_ID, env!("CARGO_PKG_VERSION"));

    let (host, mut update_rx) = ChannelHost::new();
    let widget = TimerWidget::new(config.widget_id.clone(), &config.initial_state, Arc::new(host));

    info!("Initial data: {}", widget.data_for_widget());

    let printer = tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            match serde_json::to_string(&update) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to print update: {}", e),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(payload) => widget.on_action_invoked(Some(payload.trim())),
                    None => {
                        info!("Input closed");
                        break;
                    }
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("{:#}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Final state: {}", widget.custom_state());
    drop(widget);
    printer.await?;

    Ok(())
}
