//! HEIC/HEIF decoding through libheif, available with the `heic` feature.

use crate::error::{ConvertError, Result};
use image::DynamicImage;
use std::path::Path;

/// Initialises the decoder and reports whether HEIC inputs can be opened.
#[cfg(feature = "heic")]
pub fn register() -> bool {
    let _lib_heif = libheif_rs::LibHeif::new();
    log::debug!("libheif decoder initialised");
    true
}

#[cfg(not(feature = "heic"))]
pub fn register() -> bool {
    false
}

/// Decodes the primary image of a HEIC/HEIF file into interleaved RGB.
#[cfg(feature = "heic")]
pub fn decode(path: &Path) -> Result<DynamicImage> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let path_str = path
        .to_str()
        .ok_or_else(|| ConvertError::InvalidInput(path.to_path_buf()))?;

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_file(path_str)?;
    let handle = ctx.primary_image_handle()?;
    let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)?;

    let planes = decoded.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| ConvertError::Image("HEIC image has no interleaved plane".to_string()))?;

    let width = interleaved.width;
    let height = interleaved.height;
    let row_len = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in interleaved.data.chunks(interleaved.stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    image::RgbImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| ConvertError::Image("HEIC pixel buffer has the wrong size".to_string()))
}

#[cfg(not(feature = "heic"))]
pub fn decode(_path: &Path) -> Result<DynamicImage> {
    Err(ConvertError::HeicUnsupported)
}
