//! Drawing surfaces.
//!
//! The frame loop only needs two primitives: a full-surface translucent
//! [`fade`](Surface::fade) at the start of a frame and a filled
//! [`disc`](Surface::fill_disc) per particle. [`Canvas`] implements them on
//! a CPU raster, which is what tests and snapshots use; the window renders
//! through [`GpuSurface`](crate::gpu::GpuSurface).

use std::path::Path;

use glam::{Vec2, Vec4};

use crate::error::ImageError;
use crate::visuals::blend_over;

/// Something a frame can be drawn onto.
pub trait Surface {
    /// Blend `color` over the whole surface.
    fn fade(&mut self, color: Vec4);

    /// Blend a filled disc of `radius` centered at `center`.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4);
}

/// A CPU RGBA raster with source-over blending.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Canvas {
    /// A transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec4::ZERO)
    }

    /// A canvas filled with `color`.
    pub fn filled(width: u32, height: u32, color: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Convert to an 8-bit RGBA image.
    pub fn to_image(&self) -> image::RgbaImage {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut out = image::RgbaImage::new(self.width, self.height);
        for (dst, src) in out.pixels_mut().zip(&self.pixels) {
            *dst = image::Rgba([to_u8(src.x), to_u8(src.y), to_u8(src.z), to_u8(src.w)]);
        }
        out
    }

    /// Write the canvas to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        self.to_image()
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

impl Surface for Canvas {
    fn fade(&mut self, color: Vec4) {
        for px in &mut self.pixels {
            *px = blend_over(*px, color);
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        if radius <= 0.0 || !center.is_finite() || self.width == 0 || self.height == 0 {
            return;
        }

        // Pixel centers inside the circle are covered
        let min_x = (center.x - radius).floor().max(0.0) as u32;
        let min_y = (center.y - radius).floor().max(0.0) as u32;
        let max_x = ((center.x + radius).ceil().max(0.0) as u32).min(self.width - 1);
        let max_y = ((center.y + radius).ceil().max(0.0) as u32).min(self.height - 1);
        let r2 = radius * radius;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    let i = (y * self.width + x) as usize;
                    self.pixels[i] = blend_over(self.pixels[i], color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_disc_covers_center_not_corners() {
        let mut canvas = Canvas::new(10, 10);
        let white = Vec4::ONE;
        canvas.fill_disc(Vec2::new(5.0, 5.0), 1.5, white);

        assert_eq!(canvas.pixel(4, 4), Some(white));
        assert_eq!(canvas.pixel(5, 5), Some(white));
        assert_eq!(canvas.pixel(0, 0), Some(Vec4::ZERO));
        assert_eq!(canvas.pixel(9, 9), Some(Vec4::ZERO));
    }

    #[test]
    fn test_fill_disc_off_canvas_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_disc(Vec2::new(-1000.0, -1000.0), 3.0, Vec4::ONE);
        canvas.fill_disc(Vec2::new(5000.0, 2.0), 3.0, Vec4::ONE);
        canvas.fill_disc(Vec2::new(f32::NAN, 2.0), 3.0, Vec4::ONE);
        assert!((0..4).all(|y| (0..4).all(|x| canvas.pixel(x, y) == Some(Vec4::ZERO))));
    }

    #[test]
    fn test_fade_darkens_toward_color() {
        let mut canvas = Canvas::filled(2, 2, Vec4::ONE);
        canvas.fade(Vec4::new(0.0, 0.0, 0.0, 0.1));
        let px = canvas.pixel(1, 1).unwrap();
        assert!((px.x - 0.9).abs() < 1e-6);
        assert!((px.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_image_quantizes() {
        let canvas = Canvas::filled(1, 1, Vec4::new(0.2, 0.8, 1.0, 1.0));
        let img = canvas.to_image();
        assert_eq!(img.get_pixel(0, 0).0, [51, 204, 255, 255]);
    }
}
