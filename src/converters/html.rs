//! HTML to PNG rendering through `wkhtmltoimage`.

use crate::config::HTML_RENDERER_EXECUTABLE;
use crate::converters::HtmlRenderer;
use crate::converters::external::{background_command, run_tool};
use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct Wkhtmltoimage {
    program: PathBuf,
}

impl Wkhtmltoimage {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, source: &Path, destination: &Path) -> Command {
        let mut command = background_command(&self.program);
        command
            .args(["--quiet", "--enable-local-file-access", "--format", "png"])
            .arg(source)
            .arg(destination);
        command
    }
}

impl Default for Wkhtmltoimage {
    fn default() -> Self {
        Self::new(HTML_RENDERER_EXECUTABLE)
    }
}

impl HtmlRenderer for Wkhtmltoimage {
    /// A missing executable is reported as [`ConvertError::RendererMissing`].
    fn render(&self, source: &Path, destination: &Path) -> Result<()> {
        run_tool(&mut self.command(source, destination)).map_err(|e| match e {
            ConvertError::ToolNotFound(tool) => ConvertError::RendererMissing(tool),
            other => other,
        })
    }
}
