//! Modal message boxes.
//!
//! All functions must be awaited on the UI thread (`slint::spawn_local`).

use crate::file_utils::PathExt;
use crate::job::ConversionOutcome;
use crate::presets::MissingCapability;
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};

/// Failed files listed in the completion dialog before eliding the rest.
const MAX_LISTED_FAILURES: usize = 5;

async fn show(level: MessageLevel, title: &str, description: String) {
    let _ = AsyncMessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}

/// Explains which optional dependency is missing and how to install it.
pub async fn show_missing_capability(notice: &MissingCapability) {
    show(MessageLevel::Error, notice.title, notice.message.clone()).await;
}

/// Reports a batch that stopped because a capability vanished.
pub async fn show_systemic_failure(message: &str) {
    show(MessageLevel::Error, "Error", message.to_string()).await;
}

/// Reports `succeeded/total` plus the first few failures.
pub async fn show_completion(outcome: &ConversionOutcome) {
    show(MessageLevel::Info, "Process Complete", completion_text(outcome)).await;
}

fn completion_text(outcome: &ConversionOutcome) -> String {
    let mut text = outcome.summary();
    if outcome.failures.is_empty() {
        return text;
    }

    text.push_str("\n\nFailed:");
    for failure in outcome.failures.iter().take(MAX_LISTED_FAILURES) {
        text.push_str(&format!(
            "\n• {}: {}",
            failure.path.format_for_log(),
            failure.reason
        ));
    }
    if outcome.failures.len() > MAX_LISTED_FAILURES {
        text.push_str(&format!(
            "\n…and {} more",
            outcome.failures.len() - MAX_LISTED_FAILURES
        ));
    }
    text
}
