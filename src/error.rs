//! Unified error types for the converter application.

use std::fmt;
use std::path::PathBuf;

/// Application-specific errors.
#[derive(Debug)]
pub enum ConvertError {
    /// Filesystem error while reading inputs or writing outputs
    Io(String),
    /// The image codec could not decode or encode a file
    Image(String),
    /// HEIC/HEIF input without a usable decoder
    HeicUnsupported,
    /// An input path has no usable file name
    InvalidInput(PathBuf),
    /// An external executable could not be started because it does not exist
    ToolNotFound(String),
    /// An external executable ran and reported failure
    ToolFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },
    /// The HTML renderer executable is absent; aborts the whole batch
    RendererMissing(String),
    /// The office application behind PDF export is missing or unresponsive
    HostUnavailable(String),
    /// Another batch already holds the run guard
    Busy(String),
}

impl ConvertError {
    /// Returns `true` for failures that make the rest of a batch pointless.
    pub fn is_systemic(&self) -> bool {
        matches!(self, ConvertError::RendererMissing(_))
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io(msg) => write!(f, "File error: {}", msg),
            ConvertError::Image(msg) => write!(f, "Image error: {}", msg),
            ConvertError::HeicUnsupported => {
                write!(f, "HEIC/HEIF decoding is not available in this build")
            }
            ConvertError::InvalidInput(path) => {
                write!(f, "Invalid input path: {}", path.display())
            }
            ConvertError::ToolNotFound(tool) => write!(f, "Executable not found: {}", tool),
            ConvertError::ToolFailed {
                tool,
                status,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "{} exited with status {}", tool, code)?,
                    None => write!(f, "{} was terminated by a signal", tool)?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            ConvertError::RendererMissing(tool) => write!(
                f,
                "{} tool not found. Please ensure it is installed and in your system's PATH.",
                tool
            ),
            ConvertError::HostUnavailable(msg) => write!(
                f,
                "The office application must be installed and responding to export PDFs ({})",
                msg
            ),
            ConvertError::Busy(label) => {
                write!(f, "Another conversion is already running: {}", label)
            }
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<image::ImageError> for ConvertError {
    fn from(err: image::ImageError) -> Self {
        ConvertError::Image(err.to_string())
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err.to_string())
    }
}

#[cfg(feature = "heic")]
impl From<libheif_rs::HeifError> for ConvertError {
    fn from(err: libheif_rs::HeifError) -> Self {
        ConvertError::Image(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, ConvertError>;
