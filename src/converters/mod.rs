//! Adapters over the external libraries and executables that do the actual
//! conversions. The batch service only talks to the traits below.

pub mod external;
pub mod heic;
pub mod html;
pub mod image_codec;
pub mod office;
pub mod pdf;
#[cfg(target_os = "windows")]
mod word;

pub use html::Wkhtmltoimage;
pub use image_codec::ImageCodec;
pub use office::OfficeExporter;
pub use pdf::Pdf2Docx;

use crate::capabilities::Capabilities;
use crate::error::Result;
use std::path::Path;

/// Turns a PDF into an editable Word document.
pub trait PdfToDocument: Send + Sync {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Exports a Word document to PDF through an office application.
///
/// May return `Ok(())` without writing anything; see [`office`].
pub trait DocumentToPdf: Send + Sync {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Rasterises an HTML file to PNG.
pub trait HtmlRenderer: Send + Sync {
    fn render(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Every converter a batch may call.
pub struct Converters {
    pub pdf: Box<dyn PdfToDocument>,
    pub office: Box<dyn DocumentToPdf>,
    pub html: Box<dyn HtmlRenderer>,
    pub images: ImageCodec,
}

impl Converters {
    /// Builds the default backends, reusing the renderer path the probe resolved.
    pub fn from_capabilities(capabilities: &Capabilities) -> Self {
        let html = match capabilities.html_renderer() {
            Some(path) => Wkhtmltoimage::new(path),
            None => Wkhtmltoimage::default(),
        };

        Self {
            pdf: Box::new(Pdf2Docx::default()),
            office: Box::new(OfficeExporter::detect()),
            html: Box::new(html),
            images: ImageCodec::new(capabilities.heic_available()),
        }
    }
}
