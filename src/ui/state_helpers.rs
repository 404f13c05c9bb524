//! Helper functions to set multiple ViewState properties in a grouped manner.
//!
//! Instead of calling individual setters like set_status_message, set_status_tone, etc.,
//! these functions group related properties together for better code organization and maintainability.

use crate::capabilities::Capabilities;
use crate::presets::PRESETS;
use crate::{ConversionCard, StatusTone};
use log::error;
use slint::ComponentHandle;

/// Number of card columns in the window grid.
const CARD_COLUMNS: usize = 2;

/// Sets the status line text and colour.
///
/// Groups: status-message, status-tone
pub fn set_status(ui: &crate::AppWindow, message: &str, tone: StatusTone) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_status_message(message.into());
    view_state.set_status_tone(tone);
}

/// Sets an error message in the status line with a prefix.
///
/// Logs the error as well.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    set_status(ui, &error_message, StatusTone::Error);
}

/// Sets all progress-related properties at once.
///
/// Groups: progress, progress-visible
pub fn set_progress_info(ui: &crate::AppWindow, fraction: f32, visible: bool) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_progress(fraction.clamp(0.0, 1.0));
    view_state.set_progress_visible(visible);
}

/// Enables or disables every conversion button.
pub fn set_controls_enabled(ui: &crate::AppWindow, enabled: bool) {
    ui.global::<crate::ViewState>().set_controls_enabled(enabled);
}

/// Fills the card grid from the preset catalogue.
///
/// Cards whose optional dependency is missing stay clickable so the user
/// can read the setup notice.
pub fn populate_cards(ui: &crate::AppWindow, capabilities: &Capabilities) {
    let cards: Vec<ConversionCard> = PRESETS
        .iter()
        .enumerate()
        .map(|(index, preset)| ConversionCard {
            icon: preset.icon.into(),
            title: preset.title.into(),
            description: preset.description().into(),
            available: preset.check_available(capabilities).is_ok(),
            row: (index / CARD_COLUMNS) as i32,
            column: (index % CARD_COLUMNS) as i32,
        })
        .collect();

    ui.global::<crate::ViewState>()
        .set_cards(slint::ModelRc::new(slint::VecModel::from(cards)));
}
