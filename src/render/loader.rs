//! Synchronous image preparation: decode, rotate, resize, RGBA8.

use std::path::Path;

use image::imageops::FilterType;

/// An image fitted to the window and ready for GPU upload.
pub struct PreparedImage {
    /// Dimensions after the aspect-preserving fit (width, height).
    pub size: (u32, u32),
    /// RGBA8 pixel buffer.
    pub pixels: Vec<u8>,
}

/// Decode `path`, apply `rotation` (degrees, multiple of 90), and fit the
/// result inside `target` preserving aspect ratio.
///
/// Returning the failure explicitly leaves the skip-on-error decision to
/// the caller.
///
/// # Errors
/// Returns the decode error for missing, unreadable or unsupported files.
pub fn prepare(
    path: &Path,
    target: (u32, u32),
    rotation: u32,
) -> Result<PreparedImage, image::ImageError> {
    let img = image::open(path)?;
    let img = match rotation % 360 {
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        _ => img,
    };
    let fitted = img.resize(target.0.max(1), target.1.max(1), FilterType::Triangle);
    let size = (fitted.width(), fitted.height());
    Ok(PreparedImage {
        size,
        pixels: fitted.to_rgba8().into_vec(),
    })
}
