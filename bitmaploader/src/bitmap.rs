//! Decoded image type shared between caches, tasks and display surfaces.

use image::{Rgba, RgbaImage};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors produced while decoding or encoding a bitmap.
#[derive(Debug, Error)]
pub enum BitmapError {
    /// The byte stream is not an image format we can decode
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Writing the bitmap out failed
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// A decoded RGBA image.
///
/// Cloning is cheap: the pixel buffer is reference counted, so the same
/// bitmap can sit in the memory cache and on a display surface at once.
#[derive(Clone, PartialEq)]
pub struct Bitmap {
    image: Arc<RgbaImage>,
}

impl Bitmap {
    /// Wrap an already decoded RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Create a bitmap filled with a single colour.
    ///
    /// Mostly useful for placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    /// Decode an encoded image (PNG, JPEG, GIF, WebP).
    pub fn decode(bytes: &[u8]) -> Result<Self, BitmapError> {
        let image = image::load_from_memory(bytes).map_err(BitmapError::Decode)?;
        Ok(Self::from_rgba(image.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size of the pixel buffer in bytes, used for cache accounting.
    pub fn byte_size(&self) -> usize {
        self.image.as_raw().len()
    }

    /// Borrow the underlying pixel buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Returns true if both handles share the same pixel buffer.
    pub fn ptr_eq(&self, other: &Bitmap) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }

    /// Encode to a file; the format is chosen from the extension.
    pub fn save(&self, path: &Path) -> Result<(), BitmapError> {
        self.image.save(path).map_err(BitmapError::Encode)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn encode_png(bitmap: &Bitmap) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    bitmap
        .as_rgba()
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
