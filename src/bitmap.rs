//! Decoded source images.
//!
//! A [`Bitmap`] is an owned RGBA8 raster. It can be built from raw pixels,
//! decoded from encoded bytes, or read from disk. Supported encodings are
//! PNG and JPEG.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::ImageError;

/// An owned, decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    /// Wrap raw RGBA pixel data (4 bytes per pixel, row-major).
    ///
    /// # Example
    ///
    /// ```ignore
    /// // 2x1: one white pixel, one transparent pixel
    /// let bitmap = Bitmap::from_rgba(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 0])?;
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        let pixels = RgbaImage::from_raw(width, height, data).ok_or(ImageError::DataLength {
            expected,
            actual: expected,
        })?;
        Ok(Self { pixels })
    }

    /// A bitmap filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    /// Decode an in-memory PNG or JPEG.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let pixels = image::load_from_memory(bytes)?.into_rgba8();
        Ok(Self { pixels })
    }

    /// Read and decode an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA of the pixel at `(x, y)`. Caller guarantees the coordinate is in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Resample to exactly `width` x `height`.
    pub(crate) fn resized(&self, width: u32, height: u32) -> Self {
        Self {
            pixels: image::imageops::resize(&self.pixels, width, height, FilterType::Triangle),
        }
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        let err = Bitmap::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, ImageError::DataLength { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_pixel_lookup() {
        let bitmap = Bitmap::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(bitmap.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(bitmap.pixel(1, 0), [5, 6, 7, 8]);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = Bitmap::decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn test_decode_png_round_trip() {
        let source = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let bitmap = Bitmap::decode(&bytes).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.pixel(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let err = Bitmap::open("/nonexistent/portrait.png").unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }
}
