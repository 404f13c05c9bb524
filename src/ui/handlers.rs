//! Event handlers for UI callbacks.
//!
//! Sets up the Logic callback behind every conversion card, using the
//! appropriate threading model for each step of a batch.

use crate::StatusTone;
use crate::config::{IDLE_STATUS, OUTPUT_FOLDER_DIALOG_TITLE};
use crate::job::ConversionJob;
use crate::presets::{self, ConversionPreset};
use crate::state::AppState;
use crate::ui::progress::EventLoopSink;
use crate::ui::{dialogs, state_helpers};
use log::{info, warn};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::path::PathBuf;

/// Sets up all UI event handlers for the application.
///
/// Fills the card grid, then registers the callback that turns a card click
/// into dialogs and a background batch.
pub fn setup_handlers(ui: &crate::AppWindow, state: AppState) {
    state_helpers::populate_cards(ui, &state.capabilities);
    state_helpers::set_status(ui, IDLE_STATUS, StatusTone::Neutral);

    ui.global::<crate::Logic>().on_start_conversion({
        let ui_handle = ui.as_weak();
        move |index| {
            let Some(preset) = presets::by_index(index) else {
                warn!("No conversion card at index {}", index);
                return;
            };

            let ui_handle = ui_handle.clone();
            let state = state.clone();
            // AsyncFileDialog must run on the main thread, so no rayon here.
            if let Err(e) = slint::spawn_local(async move {
                start_batch(ui_handle, state, preset).await;
            }) {
                warn!("Failed to start '{}': {}", preset.title, e);
            }
        }
    });
}

/// Collects input files and the destination folder, then runs the batch on rayon.
async fn start_batch(
    ui_handle: slint::Weak<crate::AppWindow>,
    state: AppState,
    preset: &'static ConversionPreset,
) {
    // Missing dependencies are reported before any dialog touches the filesystem.
    if let Err(notice) = preset.check_available(&state.capabilities) {
        warn!("'{}' is unavailable: {}", preset.title, notice.title);
        dialogs::show_missing_capability(&notice).await;
        return;
    }

    let Some(files) = AsyncFileDialog::new()
        .set_title(preset.open_dialog_title())
        .add_filter(preset.filter_name, preset.input_extensions)
        .pick_files()
        .await
        .filter(|files| !files.is_empty())
    else {
        set_status(&ui_handle, "No files selected", StatusTone::Neutral);
        return;
    };

    let Some(folder) = AsyncFileDialog::new()
        .set_title(OUTPUT_FOLDER_DIALOG_TITLE)
        .pick_folder()
        .await
    else {
        set_status(&ui_handle, "No output folder selected", StatusTone::Neutral);
        return;
    };

    let inputs: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();
    let job = ConversionJob::new(inputs, folder.path().to_path_buf(), preset.kind);

    let ticket = match state.run_guard.try_acquire(preset.title) {
        Ok(ticket) => ticket,
        Err(e) => {
            if let Some(ui) = ui_handle.upgrade() {
                state_helpers::set_error_with_prefix(&ui, preset.title, e.to_string());
            }
            return;
        }
    };

    info!(
        "Starting '{}' for {} file(s)",
        preset.title,
        job.inputs().len()
    );
    if let Some(ui) = ui_handle.upgrade() {
        state_helpers::set_controls_enabled(&ui, false);
        state_helpers::set_progress_info(&ui, 0.0, true);
    }

    let service = state.batch_service.clone();
    let sink = EventLoopSink::new(ui_handle);
    rayon::spawn(move || {
        let _ticket = ticket;
        service.run(job, &sink);
    });
}

fn set_status(ui_handle: &slint::Weak<crate::AppWindow>, message: &str, tone: StatusTone) {
    if let Some(ui) = ui_handle.upgrade() {
        state_helpers::set_status(&ui, message, tone);
    }
}
