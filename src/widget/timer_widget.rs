//! Countdown timer widget

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, error, info, warn};

use super::{
    actions::{ActionPayload, WidgetAction},
    template::widget_template,
    WidgetProvider,
};
use crate::{
    host::{WidgetHost, WidgetUpdateRequest},
    state::{TickOutcome, TimerState, WidgetData},
    tasks::{ticker_task, TickTarget},
};

/// Definition id the host registers this widget kind under
pub const DEFINITION_ID: &str = "MiniTimer_Widget";

/// Mutable widget state. The timer and its ticker only change together.
#[derive(Debug)]
struct Inner {
    timer: TimerState,
    custom_state: String,
    ticker: Option<JoinHandle<()>>,
    ticker_generation: u64,
    update_sequence: u64,
    last_action: Option<String>,
    last_action_time: Option<DateTime<Utc>>,
}

impl Inner {
    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

struct WidgetCore {
    widget_id: String,
    host: Arc<dyn WidgetHost>,
    inner: Mutex<Inner>,
}

impl WidgetCore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e: PoisonError<_>| {
            warn!(widget_id = %self.widget_id, "Widget state lock was poisoned, recovering");
            e.into_inner()
        })
    }

    /// Persist a fresh snapshot and build the matching host update.
    ///
    /// Runs under the state lock; the request is sent with [`Self::send_update`]
    /// after the lock is released.
    fn prepare_update(&self, inner: &mut Inner) -> Option<WidgetUpdateRequest> {
        let snapshot = match inner.timer.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(widget_id = %self.widget_id, "Failed to serialize timer state: {}", e);
                return None;
            }
        };
        inner.custom_state = snapshot.clone();
        inner.update_sequence += 1;

        Some(WidgetUpdateRequest {
            widget_id: self.widget_id.clone(),
            sequence: inner.update_sequence,
            template: widget_template().to_string(),
            data: WidgetData::render(&inner.timer),
            custom_state: snapshot,
        })
    }

    /// Push an update to the host. Must not be called with the state lock held.
    fn send_update(&self, request: Option<WidgetUpdateRequest>) {
        let Some(request) = request else {
            return;
        };

        let sequence = request.sequence;
        match self.host.update_widget(request) {
            Ok(()) => debug!(widget_id = %self.widget_id, "Widget update {} delivered", sequence),
            Err(e) => error!(widget_id = %self.widget_id, "Failed to update widget: {:#}", e),
        }
    }
}

impl TickTarget for WidgetCore {
    fn on_tick(&self, generation: u64) -> bool {
        let (keep_ticking, update) = {
            let mut inner = self.lock();

            if inner.ticker_generation != generation {
                debug!(widget_id = %self.widget_id, "Ignoring tick from stale ticker {}", generation);
                return false;
            }

            match inner.timer.tick() {
                TickOutcome::Ignored => return false,
                TickOutcome::Counting => (true, self.prepare_update(&mut inner)),
                TickOutcome::Expired => {
                    info!(widget_id = %self.widget_id, "Countdown finished");
                    // The running task is this ticker; returning false ends it.
                    inner.ticker = None;
                    (false, self.prepare_update(&mut inner))
                }
            }
        };

        self.send_update(update);
        keep_ticking
    }
}

/// A countdown widget with start, pause and stop actions.
///
/// Each state change is pushed to the [`WidgetHost`]. While running, a
/// ticker task on the ambient Tokio runtime counts down once per second.
pub struct TimerWidget {
    core: Arc<WidgetCore>,
    runtime: Option<Handle>,
}

impl TimerWidget {
    /// Create a widget, restoring `initial_state` when it holds a valid snapshot.
    ///
    /// Never fails. Malformed state falls back to a stopped 5 minute timer.
    /// A restored running timer resumes ticking right away.
    pub fn new(
        widget_id: impl Into<String>,
        initial_state: &str,
        host: Arc<dyn WidgetHost>,
    ) -> Self {
        let widget_id = widget_id.into();
        info!(widget_id = %widget_id, "Creating timer widget, initial state: '{}'", initial_state);

        let mut timer = TimerState::restore(initial_state);
        let runtime = Handle::try_current().ok();

        if timer.is_running() && runtime.is_none() {
            warn!(widget_id = %widget_id, "No runtime to resume ticking, restoring as paused");
            timer.pause();
        }

        let widget = Self {
            core: Arc::new(WidgetCore {
                widget_id,
                host,
                inner: Mutex::new(Inner {
                    timer,
                    custom_state: initial_state.to_string(),
                    ticker: None,
                    ticker_generation: 0,
                    update_sequence: 0,
                    last_action: None,
                    last_action_time: None,
                }),
            }),
            runtime,
        };

        {
            let mut inner = widget.core.lock();
            if inner.timer.is_running() {
                info!(widget_id = %widget.core.widget_id, "Resuming restored countdown");
                widget.schedule_ticker(&mut inner);
            }
        }

        widget
    }

    /// Current timer state
    pub fn timer_state(&self) -> TimerState {
        self.core.lock().timer.clone()
    }

    /// Whether a ticker task is currently scheduled
    pub fn is_ticking(&self) -> bool {
        self.core
            .lock()
            .ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    /// Last handled action id and when it was handled
    pub fn last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let inner = self.core.lock();
        (inner.last_action.clone(), inner.last_action_time)
    }

    /// Handle one action
    pub fn apply(&self, action: WidgetAction) {
        {
            let mut inner = self.core.lock();
            inner.last_action = Some(action.id().to_string());
            inner.last_action_time = Some(Utc::now());
        }

        match action {
            WidgetAction::Start => self.start(),
            WidgetAction::Pause => self.pause(),
            WidgetAction::Stop => self.stop(),
        }
    }

    fn start(&self) {
        let core = &self.core;
        info!(widget_id = %core.widget_id, "Start requested");

        let update = {
            let mut inner = core.lock();
            if inner.timer.is_running() {
                debug!(widget_id = %core.widget_id, "Timer already running");
                return;
            }
            if self.runtime.is_none() {
                error!(widget_id = %core.widget_id, "Cannot start timer without a Tokio runtime");
                return;
            }

            inner.timer.start();
            self.schedule_ticker(&mut inner);
            core.prepare_update(&mut inner)
        };
        core.send_update(update);
    }

    fn pause(&self) {
        let core = &self.core;
        info!(widget_id = %core.widget_id, "Pause requested");

        let update = {
            let mut inner = core.lock();
            if !inner.timer.pause() {
                debug!(widget_id = %core.widget_id, "Timer not running, nothing to pause");
                return;
            }

            inner.cancel_ticker();
            core.prepare_update(&mut inner)
        };
        core.send_update(update);
    }

    fn stop(&self) {
        let core = &self.core;
        info!(widget_id = %core.widget_id, "Stop requested");

        let update = {
            let mut inner = core.lock();
            inner.timer.stop();
            inner.cancel_ticker();
            core.prepare_update(&mut inner)
        };
        core.send_update(update);
    }

    /// Replace any existing ticker with a fresh one
    fn schedule_ticker(&self, inner: &mut Inner) {
        let Some(runtime) = &self.runtime else {
            return;
        };

        inner.cancel_ticker();
        inner.ticker_generation += 1;
        let ticker = ticker_task(Arc::downgrade(&self.core), inner.ticker_generation);
        inner.ticker = Some(runtime.spawn(ticker));
    }
}

impl WidgetProvider for TimerWidget {
    fn id(&self) -> &str {
        &self.core.widget_id
    }

    fn definition_id(&self) -> &str {
        DEFINITION_ID
    }

    fn custom_state(&self) -> String {
        self.core.lock().custom_state.clone()
    }

    fn template_for_widget(&self) -> String {
        widget_template().to_string()
    }

    fn data_for_widget(&self) -> String {
        WidgetData::render(&self.core.lock().timer)
    }

    fn on_action_invoked(&self, data: Option<&str>) {
        let widget_id = &self.core.widget_id;
        debug!(widget_id = %widget_id, "Action invoked with data: {:?}", data);

        let raw = match data {
            Some(raw) if !raw.is_empty() => raw,
            _ => return,
        };

        let payload = match ActionPayload::parse(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(widget_id = %widget_id, "Ignoring malformed action payload '{}': {}", raw, e);
                return;
            }
        };

        if let Some(time) = &payload.time {
            debug!(widget_id = %widget_id, "Action carried time={}", time);
        }

        match payload.action() {
            Some(action) => {
                info!(widget_id = %widget_id, "Action invoked: {}", action.id());
                self.apply(action);
            }
            None => debug!(widget_id = %widget_id, "Ignoring action {:?}", payload.id),
        }
    }
}

impl Drop for TimerWidget {
    fn drop(&mut self) {
        self.core.lock().cancel_ticker();
    }
}
