//! PDF to Word conversion through the `pdf2docx` command line tool.

use crate::config::PDF_CONVERTER_EXECUTABLE;
use crate::converters::PdfToDocument;
use crate::converters::external::{background_command, run_tool};
use crate::error::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Drives `pdf2docx convert <source> <destination>` over the whole document.
#[derive(Debug, Clone)]
pub struct Pdf2Docx {
    program: PathBuf,
}

impl Pdf2Docx {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn arguments(source: &Path, destination: &Path) -> Vec<OsString> {
        vec![
            "convert".into(),
            source.as_os_str().to_owned(),
            destination.as_os_str().to_owned(),
        ]
    }
}

impl Default for Pdf2Docx {
    fn default() -> Self {
        Self::new(PDF_CONVERTER_EXECUTABLE)
    }
}

impl PdfToDocument for Pdf2Docx {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        run_tool(background_command(&self.program).args(Self::arguments(source, destination)))
    }
}
