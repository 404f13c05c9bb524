//! The conversions offered in the window, one card each.

use crate::capabilities::Capabilities;
use crate::config::{HTML_RENDERER_EXECUTABLE, ICON_SIZES, JPEG_QUALITY, WEBP_QUALITY};
use crate::job::{ConversionKind, ImageParams, ImageTarget, PixelMode};

/// Optional capability a card depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Heic,
    HtmlRenderer,
}

/// Notice shown instead of running a conversion whose dependency is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapability {
    pub title: &'static str,
    pub message: String,
}

impl Requirement {
    fn is_met(self, capabilities: &Capabilities) -> bool {
        match self {
            Requirement::Heic => capabilities.heic_available(),
            Requirement::HtmlRenderer => capabilities.html_renderer_available(),
        }
    }

    fn notice(self) -> MissingCapability {
        match self {
            Requirement::Heic => MissingCapability {
                title: "Missing Library",
                message: "HEIC support was not found.\n\n\
                          This feature needs libheif. Install it (for example \
                          `apt install libheif-dev` or `brew install libheif`) and \
                          rebuild with:\n\n    cargo build --release --features heic"
                    .to_string(),
            },
            Requirement::HtmlRenderer => MissingCapability {
                title: "Missing Dependency",
                message: format!(
                    "Additional setup is required for HTML conversion:\n\n\
                     Download and install the {} tool and add it to your system's PATH.\n\
                     (You can download it from https://wkhtmltopdf.org/downloads.html)",
                    HTML_RENDERER_EXECUTABLE
                ),
            },
        }
    }
}

/// A card in the window and the batch it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPreset {
    pub icon: &'static str,
    pub title: &'static str,
    /// Name of the file type filter in the open dialog.
    pub filter_name: &'static str,
    pub input_extensions: &'static [&'static str],
    pub kind: ConversionKind,
    pub requirement: Option<Requirement>,
}

impl ConversionPreset {
    const fn new(
        icon: &'static str,
        title: &'static str,
        filter_name: &'static str,
        input_extensions: &'static [&'static str],
        kind: ConversionKind,
    ) -> Self {
        Self {
            icon,
            title,
            filter_name,
            input_extensions,
            kind,
            requirement: None,
        }
    }

    const fn requires(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// Card text, e.g. "Convert multiple .png files to .jpg format."
    pub fn description(&self) -> String {
        let inputs = self
            .input_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "Convert multiple {} files to .{} format.",
            inputs,
            self.kind.target_extension()
        )
    }

    /// Title of the open-files dialog.
    pub fn open_dialog_title(&self) -> String {
        format!("Select {} to Convert", self.filter_name)
    }

    /// Checks the card's optional dependency before any dialog is shown.
    pub fn check_available(&self, capabilities: &Capabilities) -> Result<(), MissingCapability> {
        match self.requirement {
            Some(requirement) if !requirement.is_met(capabilities) => Err(requirement.notice()),
            _ => Ok(()),
        }
    }
}

const PNG: &[&str] = &["png"];
const JPG: &[&str] = &["jpg", "jpeg"];
const PNG_OR_JPG: &[&str] = &["png", "jpg", "jpeg"];

/// Every card, in display order.
pub const PRESETS: [ConversionPreset; 11] = [
    ConversionPreset::new(
        "📄 → 📝",
        "PDF to Word",
        "PDF Files",
        &["pdf"],
        ConversionKind::PdfToDocument,
    ),
    ConversionPreset::new(
        "📝 → 📄",
        "Word to PDF",
        "Word Documents",
        &["docx", "doc"],
        ConversionKind::DocumentToPdf,
    ),
    ConversionPreset::new(
        "🖼️ → JPG",
        "PNG to JPG",
        "PNG Images",
        PNG,
        ConversionKind::Image(
            ImageParams::new(ImageTarget::Jpeg)
                .with_mode(PixelMode::Rgb)
                .with_quality(JPEG_QUALITY),
        ),
    ),
    ConversionPreset::new(
        "JPG → 🖼️",
        "JPG to PNG",
        "JPEG Images",
        JPG,
        ConversionKind::Image(ImageParams::new(ImageTarget::Png)),
    ),
    ConversionPreset::new(
        "🖼️ → WEBP",
        "Image to WEBP",
        "Image Files",
        PNG_OR_JPG,
        ConversionKind::Image(ImageParams::new(ImageTarget::Webp).with_quality(WEBP_QUALITY)),
    ),
    ConversionPreset::new(
        "WEBP → 🖼️",
        "WEBP to PNG",
        "WEBP Images",
        &["webp"],
        ConversionKind::Image(ImageParams::new(ImageTarget::Png)),
    ),
    ConversionPreset::new(
        "🖼️ → ICO",
        "Image to ICO",
        "Image Files",
        PNG_OR_JPG,
        ConversionKind::Image(ImageParams::new(ImageTarget::Ico).with_icon_sizes(&ICON_SIZES)),
    ),
    ConversionPreset::new(
        "🎨 → 🔳",
        "Image to Grayscale",
        "Image Files",
        &["png", "jpg", "jpeg", "bmp"],
        ConversionKind::Image(ImageParams::new(ImageTarget::Png).with_mode(PixelMode::Luma)),
    ),
    ConversionPreset::new(
        "🍏 → 🖼️",
        "HEIC to JPG",
        "HEIC Images",
        &["heic", "heif"],
        ConversionKind::Image(
            ImageParams::new(ImageTarget::Jpeg)
                .with_mode(PixelMode::Rgb)
                .with_quality(JPEG_QUALITY),
        ),
    )
    .requires(Requirement::Heic),
    ConversionPreset::new(
        "🖼️ → BMP",
        "Image to BMP",
        "Image Files",
        PNG_OR_JPG,
        ConversionKind::Image(ImageParams::new(ImageTarget::Bmp)),
    ),
    ConversionPreset::new(
        "🌐 → 🖼️",
        "HTML to PNG",
        "HTML Files",
        &["html", "htm"],
        ConversionKind::HtmlToRaster,
    )
    .requires(Requirement::HtmlRenderer),
];

/// Looks up a card by the index the UI reports.
pub fn by_index(index: i32) -> Option<&'static ConversionPreset> {
    usize::try_from(index).ok().and_then(|i| PRESETS.get(i))
}
