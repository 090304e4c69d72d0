//! # Pixel Mosaic
//!
//! Turns an image into a field of small colored discs that scatter away from
//! the pointer and drift back to where they came from.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pixel_mosaic::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     env_logger::init();
//!     let options = RunOptions::new(std::path::PathBuf::from("portrait.png"))
//!         .with_config(PortraitConfig::for_profile(DeviceProfile::Touch))
//!         .with_theme(Theme::Night);
//!     pixel_mosaic::run(options)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Sampling
//!
//! [`sample`] walks a [`Bitmap`] on a regular grid and emits one
//! [`SeedPoint`] per opaque cell, already positioned in canvas pixels and
//! centered. Each seed is classified [`ColorClass::Light`] or
//! [`ColorClass::Dark`] by brightness.
//!
//! ### The field
//!
//! A [`ParticleField`] owns one [`Particle`] per seed. Every frame each
//! particle is pushed away from the pointer if it is close enough, pulled
//! back toward its origin, and slowed by friction:
//!
//! ```ignore
//! let seeds = sample(&bitmap, canvas, &config)?;
//! let mut field = ParticleField::new(seeds, Theme::Night);
//! field.step(pointer, &config, dt, &mut surface);
//! ```
//!
//! The field can also play a one-shot radial reveal that pushes everything
//! off screen and then disposes of the particles (see [`FieldMode`]).
//!
//! ### Hosting
//!
//! [`FrameLoop`] bundles the field with pointer state, load bookkeeping and a
//! status line. Anything implementing [`Surface`] can be drawn to: the
//! window uses a wgpu-backed surface, tests and snapshots use [`Canvas`].
//!
//! ## Tuning
//!
//! | Parameter | Desktop | Touch |
//! |-----------|---------|-------|
//! | Repulsion radius | 105 | 78 |
//! | Repulsion force | 1.8 | 1.9 |
//! | Friction | 0.15 | 0.16 |
//!
//! Everything else is shared; see [`PortraitConfig`].

pub mod bitmap;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod loader;
pub mod particle;
pub mod render;
pub mod reveal;
pub mod sampler;
pub mod scheduler;
pub mod status;
pub mod time;
pub mod visuals;
mod window;

pub use bitmap::Bitmap;
pub use config::{DeviceProfile, PortraitConfig};
pub use error::{AppError, ConfigError, GpuError, ImageError};
pub use field::{FieldMode, ParticleField};
pub use glam::{Vec2, Vec4};
pub use input::{Command, PointerState};
pub use loader::{load_bitmap, ImageSource, LoadTicket, Loader};
pub use particle::{ColorClass, Particle, SeedPoint};
pub use render::{Canvas, Surface};
pub use reveal::Reveal;
pub use sampler::{sample, CanvasSize, Layout};
pub use scheduler::{FrameLoop, LoadOutcome};
pub use status::StatusLine;
pub use time::Time;
pub use visuals::Theme;
pub use window::{run, RunOptions, UserEvent};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pixel_mosaic::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::config::{DeviceProfile, PortraitConfig};
    pub use crate::error::AppError;
    pub use crate::field::{FieldMode, ParticleField};
    pub use crate::particle::{ColorClass, SeedPoint};
    pub use crate::render::{Canvas, Surface};
    pub use crate::sampler::{sample, CanvasSize};
    pub use crate::scheduler::FrameLoop;
    pub use crate::visuals::Theme;
    pub use crate::window::{run, RunOptions};
    pub use crate::{Vec2, Vec4};
}
