//! Conversion jobs, their outcomes, and the events a batch emits.

use image::{ColorType, DynamicImage};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Pixel layout an image is converted to before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    /// Single-channel grayscale ("L")
    Luma,
    /// Grayscale with alpha ("LA")
    LumaAlpha,
    /// Three-channel colour ("RGB")
    Rgb,
    /// Colour with alpha ("RGBA")
    Rgba,
}

impl PixelMode {
    /// Reports the mode of a decoded image, `None` for layouts without a mode.
    pub fn of(image: &DynamicImage) -> Option<Self> {
        match image.color() {
            ColorType::L8 | ColorType::L16 => Some(PixelMode::Luma),
            ColorType::La8 | ColorType::La16 => Some(PixelMode::LumaAlpha),
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Some(PixelMode::Rgb),
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Some(PixelMode::Rgba),
            _ => None,
        }
    }

    /// Converts `image` into this mode with 8-bit channels.
    pub fn convert(self, image: DynamicImage) -> DynamicImage {
        match self {
            PixelMode::Luma => DynamicImage::ImageLuma8(image.to_luma8()),
            PixelMode::LumaAlpha => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
            PixelMode::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
            PixelMode::Rgba => DynamicImage::ImageRgba8(image.to_rgba8()),
        }
    }
}

/// Image container written by an image re-encode job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Jpeg,
    Png,
    Webp,
    Ico,
    Bmp,
}

impl ImageTarget {
    pub fn extension(self) -> &'static str {
        match self {
            ImageTarget::Jpeg => "jpg",
            ImageTarget::Png => "png",
            ImageTarget::Webp => "webp",
            ImageTarget::Ico => "ico",
            ImageTarget::Bmp => "bmp",
        }
    }
}

/// Encoder settings for an image re-encode job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParams {
    pub target: ImageTarget,
    /// Convert to this mode first when the decoded image differs.
    pub mode: Option<PixelMode>,
    /// 0-100, used by lossy targets.
    pub quality: Option<u8>,
    /// Frame sizes for `.ico` output.
    pub icon_sizes: &'static [(u32, u32)],
}

impl ImageParams {
    pub const fn new(target: ImageTarget) -> Self {
        Self {
            target,
            mode: None,
            quality: None,
            icon_sizes: &[],
        }
    }

    pub const fn with_mode(mut self, mode: PixelMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub const fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub const fn with_icon_sizes(mut self, sizes: &'static [(u32, u32)]) -> Self {
        self.icon_sizes = sizes;
        self
    }
}

/// What a batch does to each of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    PdfToDocument,
    DocumentToPdf,
    Image(ImageParams),
    HtmlToRaster,
}

impl ConversionKind {
    /// Extension (without dot) of every output this kind produces.
    pub fn target_extension(&self) -> &'static str {
        match self {
            ConversionKind::PdfToDocument => "docx",
            ConversionKind::DocumentToPdf => "pdf",
            ConversionKind::Image(params) => params.target.extension(),
            ConversionKind::HtmlToRaster => "png",
        }
    }
}

/// A single user-initiated batch: inputs, destination, and conversion kind.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    kind: ConversionKind,
}

impl ConversionJob {
    /// Creates a job; repeated inputs are dropped so each path runs once, in order.
    pub fn new(inputs: Vec<PathBuf>, output_dir: PathBuf, kind: ConversionKind) -> Self {
        let mut seen = HashSet::new();
        let inputs = inputs
            .into_iter()
            .filter(|path| seen.insert(path.clone()))
            .collect();

        Self {
            inputs,
            output_dir,
            kind,
        }
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn kind(&self) -> ConversionKind {
        self.kind
    }
}

/// An input that could not be converted and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub path: PathBuf,
    pub reason: String,
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<FailedItem>,
    /// Set when the batch stopped early because a capability vanished.
    pub systemic_failure: Option<String>,
}

impl ConversionOutcome {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.systemic_failure.is_some()
    }

    /// `"<succeeded>/<total> files were converted successfully."`
    pub fn summary(&self) -> String {
        format!(
            "{}/{} files were converted successfully.",
            self.succeeded, self.total
        )
    }
}

/// Position of a running batch after an item has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub current: PathBuf,
}

impl Progress {
    /// Completed share in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Messages a batch posts to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started { total: usize },
    ItemStarted { index: usize, total: usize, path: PathBuf },
    Progress(Progress),
    Completed(ConversionOutcome),
}
