//! Bridges batch updates from the worker thread to the window.
//!
//! The worker never touches `ViewState`; it posts [`BatchEvent`]s through
//! `slint::invoke_from_event_loop` and [`apply_event`] consumes them on the UI thread.

use crate::StatusTone;
use crate::file_utils::PathExt;
use crate::job::{BatchEvent, ConversionOutcome, Progress};
use crate::services::ProgressSink;
use crate::ui::{dialogs, state_helpers};
use log::warn;
use std::path::Path;

/// Progress sink that queues every update onto the Slint event loop.
pub struct EventLoopSink {
    ui: slint::Weak<crate::AppWindow>,
}

impl EventLoopSink {
    pub fn new(ui: slint::Weak<crate::AppWindow>) -> Self {
        Self { ui }
    }

    fn post(&self, event: BatchEvent) {
        let ui = self.ui.clone();
        let result = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui.upgrade() {
                apply_event(&ui, event);
            }
        });
        if let Err(e) = result {
            warn!("Failed to post batch event to the UI: {}", e);
        }
    }
}

impl ProgressSink for EventLoopSink {
    fn on_started(&self, total: usize) {
        self.post(BatchEvent::Started { total });
    }

    fn on_item_started(&self, index: usize, total: usize, path: &Path) {
        self.post(BatchEvent::ItemStarted {
            index,
            total,
            path: path.to_path_buf(),
        });
    }

    fn on_progress(&self, progress: Progress) {
        self.post(BatchEvent::Progress(progress));
    }

    fn on_complete(&self, outcome: ConversionOutcome) {
        self.post(BatchEvent::Completed(outcome));
    }
}

/// Applies one batch event to the window. UI thread only.
pub fn apply_event(ui: &crate::AppWindow, event: BatchEvent) {
    match event {
        BatchEvent::Started { total } => {
            state_helpers::set_controls_enabled(ui, false);
            state_helpers::set_progress_info(ui, 0.0, true);
            state_helpers::set_status(
                ui,
                &format!("Converting {} file(s)...", total),
                StatusTone::Busy,
            );
        }
        BatchEvent::ItemStarted { index, total, path } => {
            state_helpers::set_status(
                ui,
                &format!(
                    "Converting: {}/{} - {}",
                    index + 1,
                    total,
                    path.format_for_log()
                ),
                StatusTone::Busy,
            );
        }
        BatchEvent::Progress(progress) => {
            state_helpers::set_progress_info(ui, progress.fraction(), true);
        }
        BatchEvent::Completed(outcome) => finish(ui, outcome),
    }
}

fn finish(ui: &crate::AppWindow, outcome: ConversionOutcome) {
    state_helpers::set_progress_info(ui, 0.0, false);
    state_helpers::set_controls_enabled(ui, true);

    if let Some(message) = outcome.systemic_failure.clone() {
        state_helpers::set_error_with_prefix(ui, "Conversion stopped", message.clone());
        spawn_dialog(async move { dialogs::show_systemic_failure(&message).await });
        return;
    }

    let tone = if outcome.succeeded == 0 && outcome.total > 0 {
        StatusTone::Error
    } else {
        StatusTone::Success
    };
    state_helpers::set_status(
        ui,
        &format!("Process complete: {}", outcome.summary()),
        tone,
    );
    spawn_dialog(async move { dialogs::show_completion(&outcome).await });
}

fn spawn_dialog(dialog: impl std::future::Future<Output = ()> + 'static) {
    if let Err(e) = slint::spawn_local(dialog) {
        warn!("Failed to show dialog: {}", e);
    }
}
