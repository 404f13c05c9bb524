//! State management for the converter application.

use crate::capabilities::Capabilities;
use crate::converters::Converters;
use crate::services::{BatchService, RunGuard};
use std::sync::Arc;

/// Application-wide state container.
#[derive(Clone)]
pub struct AppState {
    /// Probed once at startup, read-only afterwards.
    pub capabilities: Arc<Capabilities>,
    pub batch_service: BatchService,
    /// Held by the running batch so a second one cannot start.
    pub run_guard: RunGuard,
}

impl AppState {
    pub fn new(capabilities: Capabilities) -> Self {
        let converters = Arc::new(Converters::from_capabilities(&capabilities));
        Self {
            capabilities: Arc::new(capabilities),
            batch_service: BatchService::new(converters),
            run_guard: RunGuard::new(),
        }
    }
}
