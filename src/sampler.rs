//! Image to seed point sampling.
//!
//! Sampling runs in two clamp stages followed by a strided walk:
//!
//! - The **processing clamp** shrinks sources larger than
//!   `max_image_size` so the walk stays cheap. The bitmap is actually
//!   resampled at this stage.
//! - The **display clamp** fits the processed image inside
//!   `max_display_ratio` of the canvas. The result is floored to whole
//!   pixels and the source is resampled once to that size.
//!
//! Both stages are uniform and shrink-only. The walk then runs in canvas
//! pixels: it visits every `sampling_step`-th pixel on both axes (nearest
//! neighbor, no averaging), drops pixels with alpha at or below 128, and
//! classifies the rest by mean brightness.

use std::borrow::Cow;

use glam::Vec2;

use crate::bitmap::Bitmap;
use crate::config::PortraitConfig;
use crate::error::ImageError;
use crate::particle::{ColorClass, SeedPoint};

/// Pixels with alpha at or below this are treated as background.
pub const ALPHA_CUTOFF: u8 = 128;

/// Size of the drawing surface in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center point of the canvas.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for CanvasSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// Where a bitmap of a given size lands on a given canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Bitmap size after the processing clamp.
    pub processed: (u32, u32),
    /// On-screen size after the display clamp, before flooring.
    pub display: Vec2,
    /// Whole-pixel size the bitmap is resampled to and walked at.
    pub sampled: (u32, u32),
    /// Top-left corner of the displayed image.
    pub offset: Vec2,
}

impl Layout {
    /// Compute the layout of a `width` x `height` source on `canvas`.
    pub fn compute(
        width: u32,
        height: u32,
        canvas: CanvasSize,
        config: &PortraitConfig,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions {
                width: width as f32,
                height: height as f32,
            });
        }

        let processed = processing_size(width, height, config.max_image_size);
        let display = display_size(processed, canvas, config.max_display_ratio);

        let valid = display.x > 0.0
            && display.y > 0.0
            && display.is_finite()
            && canvas.width.is_finite()
            && canvas.height.is_finite();
        if !valid {
            return Err(ImageError::InvalidDimensions {
                width: display.x,
                height: display.y,
            });
        }

        let sampled = (
            (display.x.floor() as u32).max(1),
            (display.y.floor() as u32).max(1),
        );
        let offset = (canvas.as_vec2() - Vec2::new(sampled.0 as f32, sampled.1 as f32)) / 2.0;
        Ok(Self {
            processed,
            display,
            sampled,
            offset,
        })
    }
}

/// Shrink `(width, height)` uniformly so neither exceeds `max_size`.
///
/// Dimensions are floored but never drop below 1.
pub fn processing_size(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width <= max_size && height <= max_size {
        return (width, height);
    }
    // The longer side limits the ratio; integer math keeps the floor exact.
    let (w, h, m) = (width as u64, height as u64, max_size as u64);
    let (nw, nh) = if w >= h { (m, h * m / w) } else { (w * m / h, m) };
    (nw.max(1) as u32, nh.max(1) as u32)
}

/// Fit `processed` inside `max_ratio` of the canvas, uniformly, shrink-only.
pub fn display_size(processed: (u32, u32), canvas: CanvasSize, max_ratio: f32) -> Vec2 {
    let size = Vec2::new(processed.0 as f32, processed.1 as f32);
    let max = canvas.as_vec2() * max_ratio;
    if size.x > max.x || size.y > max.y {
        let ratio = (max.x / size.x).min(max.y / size.y);
        size * ratio
    } else {
        size
    }
}

/// Sample `bitmap` into seed points laid out on `canvas`.
///
/// Points come out in row-major order of the visited grid. Sampling the same
/// bitmap with the same canvas and config always yields the same sequence.
pub fn sample(
    bitmap: &Bitmap,
    canvas: CanvasSize,
    config: &PortraitConfig,
) -> Result<Vec<SeedPoint>, ImageError> {
    let layout = Layout::compute(bitmap.width(), bitmap.height(), canvas, config)?;
    let (sw, sh) = layout.sampled;

    // One resample straight from the source keeps the stride in canvas pixels.
    let source: Cow<'_, Bitmap> = if (sw, sh) == (bitmap.width(), bitmap.height()) {
        Cow::Borrowed(bitmap)
    } else {
        Cow::Owned(bitmap.resized(sw, sh))
    };

    let step = config.sampling_step.max(1) as usize;
    let mut seeds = Vec::new();

    for y in (0..sh).step_by(step) {
        for x in (0..sw).step_by(step) {
            let [r, g, b, a] = source.pixel(x, y);
            if a <= ALPHA_CUTOFF {
                continue;
            }
            seeds.push(SeedPoint {
                position: Vec2::new(x as f32, y as f32) + layout.offset,
                class: ColorClass::from_rgb(r, g, b),
            });
        }
    }

    Ok(seeds)
}
