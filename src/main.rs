// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod capabilities;
mod config;
mod converters;
mod error;
mod file_utils;
mod job;
mod presets;
mod services;
mod state;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let capabilities = capabilities::Capabilities::probe();

    let app = AppWindow::new()?;
    let app_state = state::AppState::new(capabilities);

    // Setup all UI event handlers
    ui::setup_handlers(&app, app_state);

    app.run()?;

    Ok(())
}
