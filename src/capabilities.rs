//! Optional external capabilities detected once at startup.

use crate::config::HTML_RENDERER_EXECUTABLE;
use crate::converters::external::background_command;
use crate::converters::heic;
use log::info;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Which optional converters this process can use.
///
/// Built once by [`Capabilities::probe`] and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    heic: bool,
    html_renderer: Option<PathBuf>,
}

impl Capabilities {
    pub fn new(heic: bool, html_renderer: Option<PathBuf>) -> Self {
        Self {
            heic,
            html_renderer,
        }
    }

    /// Looks for the HEIC decoder and the HTML renderer executable.
    ///
    /// Absence of either is a normal state and never an error.
    pub fn probe() -> Self {
        let heic = heic::register();
        let html_renderer = responds_to_version(HTML_RENDERER_EXECUTABLE)
            .then(|| PathBuf::from(HTML_RENDERER_EXECUTABLE));

        info!("HEIC decoder available: {}", heic);
        match &html_renderer {
            Some(path) => info!("HTML renderer {} responds", path.display()),
            None => info!("HTML renderer {} not found on PATH", HTML_RENDERER_EXECUTABLE),
        }

        Self::new(heic, html_renderer)
    }

    pub fn heic_available(&self) -> bool {
        self.heic
    }

    pub fn html_renderer_available(&self) -> bool {
        self.html_renderer.is_some()
    }

    /// Resolved renderer path, if the probe found one.
    pub fn html_renderer(&self) -> Option<&Path> {
        self.html_renderer.as_deref()
    }
}

/// True when `program` can be launched from PATH.
fn responds_to_version(program: &str) -> bool {
    background_command(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
