//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod batch_service;
pub mod run_guard;

pub use batch_service::{BatchService, ProgressSink};
pub use run_guard::RunGuard;
