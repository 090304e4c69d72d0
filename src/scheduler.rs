//! The per-frame loop and the state it owns.
//!
//! [`FrameLoop`] is the whole simulation context: config, pointer, current
//! field, load bookkeeping, and status line. A host feeds it events and calls
//! [`tick`](FrameLoop::tick) once per display refresh:
//!
//! ```ignore
//! let mut frames = FrameLoop::new(config, Theme::Night, canvas);
//! let ticket = frames.begin_load();
//! // ...later, when the decode finishes:
//! frames.complete_load(ticket, result);
//!
//! // every refresh:
//! frames.tick(&mut surface);
//! ```
//!
//! A tick fades the surface, then updates and draws each particle in turn.
//! All of it runs on the calling thread; nothing here blocks.

use std::time::{Duration, Instant};

use crate::bitmap::Bitmap;
use crate::config::PortraitConfig;
use crate::error::ImageError;
use crate::field::{FieldMode, ParticleField};
use crate::input::PointerState;
use crate::loader::{LoadTicket, Loader};
use crate::render::{Canvas, Surface};
use crate::sampler::CanvasSize;
use crate::status::StatusLine;
use crate::time::Time;
use crate::visuals::Theme;

/// What happened to a finished load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The field was replaced with this many particles.
    Applied(usize),
    /// A newer load was started in the meantime; the result was dropped.
    Stale,
    /// Decoding or sampling failed; the previous field is untouched.
    Failed(ImageError),
}

/// Simulation context for one portrait view.
pub struct FrameLoop {
    config: PortraitConfig,
    theme: Theme,
    canvas: CanvasSize,
    field: ParticleField,
    pointer: PointerState,
    loader: Loader,
    /// Last bitmap that produced a field, kept for re-sampling on resize.
    source: Option<Bitmap>,
    /// The canvas changed while a load was in flight.
    relayout_pending: bool,
    status: StatusLine,
    time: Time,
}

impl FrameLoop {
    /// Start with an empty field.
    pub fn new(config: PortraitConfig, theme: Theme, canvas: CanvasSize) -> Self {
        Self {
            config,
            theme,
            canvas,
            field: ParticleField::empty(theme),
            pointer: PointerState::new(),
            loader: Loader::new(),
            source: None,
            relayout_pending: false,
            status: StatusLine::new(),
            time: Time::new(),
        }
    }

    pub fn config(&self) -> &PortraitConfig {
        &self.config
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    /// Message currently on the status line.
    pub fn status(&self) -> Option<&str> {
        self.status.message()
    }

    /// Put a transient message on the status line.
    pub fn show_status(&mut self, message: impl Into<String>) {
        self.status.show(message, Instant::now());
    }

    /// Whether the most recent load has not completed yet.
    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// Run one frame against the wall clock.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let dt = self.time.tick();
        if let Some(fps) = self.time.take_fps_sample() {
            log::debug!("FPS: {:.1} ({} particles)", fps, self.field.len());
        }
        self.tick_with(dt, Instant::now(), surface);
    }

    /// Run one frame with an explicit delta and wall time.
    pub fn tick_with<S: Surface + ?Sized>(&mut self, dt: Duration, now: Instant, surface: &mut S) {
        self.status.tick(now);
        surface.fade(self.theme.fade());
        self.field
            .step(self.pointer.position(), &self.config, dt, surface);
    }

    /// Draw the current field onto a fresh canvas without advancing it.
    pub fn snapshot(&self) -> Canvas {
        let width = self.canvas.width.max(0.0) as u32;
        let height = self.canvas.height.max(0.0) as u32;
        let mut canvas = Canvas::filled(width, height, self.theme.background());
        self.field.draw(&mut canvas, &self.config);
        canvas
    }

    /// Issue a ticket for a new load, superseding any load in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = self.loader.begin();
        log::debug!("Load {} started", ticket.generation());
        ticket
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// Stale results are dropped. Failures leave the current field in place
    /// and post a status message; if the canvas changed while the load was
    /// in flight, that field is re-sampled for the new size first.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Bitmap, ImageError>,
    ) -> LoadOutcome {
        if !self.loader.settle(ticket) {
            log::debug!("Discarding stale load {}", ticket.generation());
            return LoadOutcome::Stale;
        }

        let applied = result.and_then(|bitmap| {
            let count = self.rebuild_from(&bitmap)?;
            self.source = Some(bitmap);
            Ok(count)
        });

        match applied {
            Ok(count) => {
                self.relayout_pending = false;
                LoadOutcome::Applied(count)
            }
            Err(e) => {
                log::warn!("Load {} failed: {}", ticket.generation(), e);
                if self.relayout_pending {
                    self.relayout();
                }
                self.show_status(failure_message(&e));
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Change the canvas size and re-sample the current image to fit.
    ///
    /// If a load is still in flight it will sample at the new size when it
    /// lands, so nothing is re-sampled now. A field that is revealing or
    /// disposed is left alone; the next load picks up the new size.
    pub fn resize(&mut self, canvas: CanvasSize) -> Option<Result<usize, ImageError>> {
        self.canvas = canvas;
        if self.loader.is_pending() {
            self.relayout_pending = true;
            return None;
        }
        self.relayout()
    }

    fn relayout(&mut self) -> Option<Result<usize, ImageError>> {
        self.relayout_pending = false;
        if self.field.mode() != FieldMode::Normal {
            log::debug!("Skipping re-sample of {:?} field", self.field.mode());
            return None;
        }
        let bitmap = self.source.take()?;
        let result = self.rebuild_from(&bitmap);
        if let Err(e) = &result {
            log::warn!("Re-sampling after resize failed: {}", e);
            self.show_status(failure_message(e));
        }
        self.source = Some(bitmap);
        Some(result)
    }

    /// Start the radial reveal. Returns `false` if one is already running
    /// or the field was already disposed.
    pub fn start_reveal(&mut self) -> bool {
        self.field.start_reveal(self.canvas.as_vec2())
    }

    /// Switch theme for the background and every particle.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.field.set_theme(theme);
    }

    fn rebuild_from(&mut self, bitmap: &Bitmap) -> Result<usize, ImageError> {
        let field = ParticleField::from_bitmap(bitmap, self.canvas, &self.config, self.theme)?;
        let count = field.len();
        self.field = field;
        log::info!(
            "Field rebuilt: {} particles from {}x{} image on {}x{} canvas",
            count,
            bitmap.width(),
            bitmap.height(),
            self.canvas.width,
            self.canvas.height
        );
        Ok(count)
    }
}

/// Short user-facing text for a load failure.
fn failure_message(e: &ImageError) -> &'static str {
    match e {
        ImageError::Decode(_) => "Image decode failed",
        ImageError::Io(_) => "Image load failed",
        ImageError::InvalidDimensions { .. } | ImageError::DataLength { .. } => {
            "Particle generation failed"
        }
    }
}
