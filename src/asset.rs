//! Decoded logo and background bitmaps.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{StudioError, StudioResult};

/// A decoded RGBA bitmap plus the reference it was loaded from.
///
/// Cloning is cheap; the pixels are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    reference: String,
    image: Arc<RgbaImage>,
}

impl Asset {
    /// Wraps an already-decoded image.
    pub fn from_image(reference: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            reference: reference.into(),
            image: Arc::new(image),
        }
    }

    /// Decodes any format the `image` crate recognizes.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::AssetLoadFailed`] for unsupported or corrupt data.
    pub fn decode(reference: impl Into<String>, bytes: &[u8]) -> StudioResult<Self> {
        let reference = reference.into();
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| StudioError::asset(reference.clone(), e))?
            .to_rgba8();
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(StudioError::asset(reference, "image has no pixels"));
        }
        tracing::debug!(
            reference = %reference,
            width = decoded.width(),
            height = decoded.height(),
            "decoded asset"
        );
        Ok(Self::from_image(reference, decoded))
    }

    /// Reads and decodes an image file. The path becomes the reference.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::AssetLoadFailed`] if the file cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let reference = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| StudioError::asset(reference.clone(), e))?;
        Self::decode(reference, &bytes)
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
