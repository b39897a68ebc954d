//! Export adapters for a finished [`Surface`].
//!
//! Exports are re-sampled from the displayed surface to the configured
//! export resolution. Every failure maps to [`StudioError::ExportFailed`].

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{StudioError, StudioResult};
use crate::surface::Surface;

/// Resizes the surface to `export_size`×`export_size`.
///
/// # Errors
///
/// Returns [`StudioError::ExportFailed`] for a zero export size.
pub fn export_image(surface: &Surface, export_size: u32) -> StudioResult<RgbaImage> {
    if export_size == 0 {
        return Err(StudioError::export("export size must be greater than zero"));
    }
    if surface.width() == export_size && surface.height() == export_size {
        return Ok(surface.image.clone());
    }
    Ok(imageops::resize(
        &surface.image,
        export_size,
        export_size,
        FilterType::Lanczos3,
    ))
}

/// Encodes the surface as a PNG at the export resolution.
///
/// # Errors
///
/// Returns [`StudioError::ExportFailed`] if resizing or encoding fails.
#[tracing::instrument(skip(surface), fields(width = surface.width()))]
pub fn encode_png(surface: &Surface, export_size: u32) -> StudioResult<Vec<u8>> {
    let img = export_image(surface, export_size)?;
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| StudioError::export(e.to_string()))?;
    tracing::debug!(bytes = buf.len(), "encoded png");
    Ok(buf)
}

/// Writes the surface to `path` as a PNG at the export resolution.
///
/// # Errors
///
/// Returns [`StudioError::ExportFailed`] if encoding or writing fails.
pub fn save_png(surface: &Surface, path: impl AsRef<Path>, export_size: u32) -> StudioResult<()> {
    let path = path.as_ref();
    let bytes = encode_png(surface, export_size)?;
    std::fs::write(path, bytes)
        .map_err(|e| StudioError::export(format!("cannot write {}: {e}", path.display())))
}

/// Places the surface on the system clipboard at its displayed resolution.
///
/// # Errors
///
/// Returns [`StudioError::ExportFailed`] if no clipboard is available or it
/// rejects the image.
#[cfg(feature = "clipboard")]
pub fn copy_to_clipboard(surface: &Surface) -> StudioResult<()> {
    use std::borrow::Cow;

    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| StudioError::export(format!("clipboard: {e}")))?;
    let data = arboard::ImageData {
        width: surface.width() as usize,
        height: surface.height() as usize,
        bytes: Cow::Borrowed(surface.image.as_raw()),
    };
    clipboard
        .set_image(data)
        .map_err(|e| StudioError::export(format!("clipboard: {e}")))
}
