//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: file pickers and message boxes, which must run on the main thread
//! - `rayon::spawn`: the conversion batch itself
//! - `slint::invoke_from_event_loop`: returns batch events from rayon to the UI thread

pub mod dialogs;
pub mod handlers;
pub mod progress;
mod state_helpers;

pub use handlers::setup_handlers;
