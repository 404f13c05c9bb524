//! Image decoding, pixel-mode conversion and re-encoding.

use crate::config::{DEFAULT_JPEG_QUALITY, HEIC_EXTENSIONS, MAX_ICON_DIMENSION};
use crate::converters::heic;
use crate::error::{ConvertError, Result};
use crate::file_utils::PathExt;
use crate::job::{ImageParams, ImageTarget, PixelMode};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Opens images through the `image` crate, with HEIC routed to libheif.
#[derive(Debug, Clone, Copy)]
pub struct ImageCodec {
    heic: bool,
}

impl ImageCodec {
    pub fn new(heic: bool) -> Self {
        Self { heic }
    }

    /// Decodes `path`, sniffing the format from content rather than extension.
    pub fn open(&self, path: &Path) -> Result<DynamicImage> {
        if path.has_extension_in(&HEIC_EXTENSIONS) {
            if !self.heic {
                return Err(ConvertError::HeicUnsupported);
            }
            return heic::decode(path);
        }

        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(img)
    }

    /// Decodes `input`, converts its pixel mode if asked, and writes `output`.
    pub fn reencode(&self, input: &Path, output: &Path, params: &ImageParams) -> Result<()> {
        let mut img = self.open(input)?;

        if let Some(mode) = params.mode {
            if PixelMode::of(&img) != Some(mode) {
                debug!(
                    "Converting {} from {:?} to {:?}",
                    input.format_for_log(),
                    img.color(),
                    mode
                );
                img = mode.convert(img);
            }
        }

        match params.target {
            ImageTarget::Jpeg => {
                let quality = params.quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
                let writer = BufWriter::new(File::create(output)?);
                img.write_with_encoder(JpegEncoder::new_with_quality(writer, quality))?;
            }
            ImageTarget::Webp => write_webp(&img, output, params.quality)?,
            ImageTarget::Png => img.save_with_format(output, ImageFormat::Png)?,
            ImageTarget::Bmp => img.save_with_format(output, ImageFormat::Bmp)?,
            ImageTarget::Ico => write_icon(&img, output, params.icon_sizes)?,
        }

        Ok(())
    }
}

/// Writes lossy VP8 when a quality is given, lossless VP8L otherwise.
fn write_webp(img: &DynamicImage, output: &Path, quality: Option<u8>) -> Result<()> {
    let Some(quality) = quality else {
        let writer = BufWriter::new(File::create(output)?);
        img.write_with_encoder(WebPEncoder::new_lossless(writer))?;
        return Ok(());
    };

    // libwebp only takes 8-bit RGB or RGBA buffers.
    let pixels = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&pixels)
        .map_err(|e| ConvertError::Image(format!("WEBP encoder rejected the image: {}", e)))?;
    let encoded = encoder.encode(f32::from(quality.min(100)));
    fs::write(output, &*encoded)?;
    Ok(())
}

/// Picks the frame sizes an icon is written with.
///
/// Sizes larger than the source are skipped. When nothing is left the source
/// size itself is used, clamped to what the container allows.
fn icon_frame_sizes(width: u32, height: u32, requested: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut sizes: Vec<(u32, u32)> = requested
        .iter()
        .copied()
        .filter(|&(w, h)| w > 0 && h > 0 && w <= width && h <= height)
        .filter(|&(w, h)| w <= MAX_ICON_DIMENSION && h <= MAX_ICON_DIMENSION)
        .collect();

    sizes.sort_unstable();
    sizes.dedup();

    if sizes.is_empty() {
        sizes.push((
            width.clamp(1, MAX_ICON_DIMENSION),
            height.clamp(1, MAX_ICON_DIMENSION),
        ));
    }
    sizes
}

/// Writes a multi-resolution `.ico` with one RGBA frame per size.
fn write_icon(img: &DynamicImage, output: &Path, requested: &[(u32, u32)]) -> Result<()> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);

    for (width, height) in icon_frame_sizes(img.width(), img.height(), requested) {
        // Fit inside the frame size, keeping the aspect ratio.
        let frame = img.resize(width, height, FilterType::Lanczos3).to_rgba8();
        let icon_image = IconImage::from_rgba_data(frame.width(), frame.height(), frame.into_raw());
        icon_dir.add_entry(IconDirEntry::encode(&icon_image)?);
    }

    let file = BufWriter::new(File::create(output)?);
    icon_dir.write(file)?;
    Ok(())
}
