//! Guard allowing only one conversion batch at a time.

use crate::error::ConvertError;
use log::{debug, warn};
use std::sync::{Arc, Mutex, PoisonError};

/// Tracks the label of the batch currently running, if any.
#[derive(Clone, Default)]
pub struct RunGuard {
    current: Arc<Mutex<Option<String>>>,
}

/// Proof that the caller owns the running slot; frees it on drop.
pub struct RunTicket {
    current: Arc<Mutex<Option<String>>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the running slot for `label`.
    ///
    /// Fails with [`ConvertError::Busy`] naming the batch already in flight.
    pub fn try_acquire(&self, label: &str) -> Result<RunTicket, ConvertError> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(ref running) = *current {
            warn!("Rejected '{}' while '{}' is running", label, running);
            return Err(ConvertError::Busy(running.clone()));
        }

        debug!("Run slot taken by '{}'", label);
        *current = Some(label.to_string());
        Ok(RunTicket {
            current: self.current.clone(),
        })
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(label) = current.take() {
            debug!("Run slot released by '{}'", label);
        }
    }
}
