//! Word to PDF export through an installed office application.
//!
//! On Windows Microsoft Word is automated over COM from the calling thread
//! (see the `word` module). Elsewhere LibreOffice runs headless.
//!
//! Word can fail without reporting an error, so callers decide success by
//! probing the produced file rather than trusting the return value alone.

use crate::config::LIBREOFFICE_EXECUTABLE;
use crate::converters::DocumentToPdf;
use crate::converters::external::{background_command, run_tool};
use crate::error::{ConvertError, Result};
use crate::file_utils::output_path_for;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Office application used for PDF export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficeExporter {
    /// Microsoft Word over COM, Windows only
    Word,
    /// LibreOffice in headless mode
    LibreOffice { program: PathBuf },
}

impl OfficeExporter {
    /// Chooses Word on Windows and LibreOffice everywhere else.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            OfficeExporter::Word
        } else {
            OfficeExporter::LibreOffice {
                program: PathBuf::from(LIBREOFFICE_EXECUTABLE),
            }
        }
    }

    #[cfg(target_os = "windows")]
    fn export_with_word(source: &Path, destination: &Path) -> Result<()> {
        crate::converters::word::export_pdf(source, destination)
    }

    #[cfg(not(target_os = "windows"))]
    fn export_with_word(_source: &Path, _destination: &Path) -> Result<()> {
        Err(ConvertError::HostUnavailable(
            "Microsoft Word automation needs Windows".to_string(),
        ))
    }

    fn libreoffice_command(program: &Path, source: &Path, out_dir: &Path) -> Command {
        let mut command = background_command(program);
        command
            .args(["--headless", "--convert-to", "pdf", "--outdir"])
            .arg(out_dir)
            .arg(source);
        command
    }

    fn export_with_libreoffice(program: &Path, source: &Path, destination: &Path) -> Result<()> {
        let out_dir = destination
            .parent()
            .ok_or_else(|| ConvertError::InvalidInput(destination.to_path_buf()))?;
        run_tool(&mut Self::libreoffice_command(program, source, out_dir))?;

        // LibreOffice always names the result after the source stem.
        let produced = output_path_for(source, out_dir, "pdf")?;
        if produced != destination && produced.exists() {
            fs::rename(&produced, destination)?;
        }
        Ok(())
    }
}

impl DocumentToPdf for OfficeExporter {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        let result = match self {
            OfficeExporter::Word => Self::export_with_word(source, destination),
            OfficeExporter::LibreOffice { program } => {
                Self::export_with_libreoffice(program, source, destination)
            }
        };

        result.map_err(|e| match e {
            ConvertError::ToolNotFound(tool) => {
                ConvertError::HostUnavailable(format!("{} is not installed", tool))
            }
            other => other,
        })
    }
}
