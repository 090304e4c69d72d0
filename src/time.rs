//! Frame timing.
//!
//! The physics step is per frame and ignores wall time. Time only drives
//! the reveal clock, status-message expiry, and the FPS readout.
//!
//! ```ignore
//! let mut time = Time::new();
//!
//! // Once per redraw:
//! let dt = time.tick();
//! if let Some(fps) = time.take_fps_sample() {
//!     log::debug!("FPS: {:.1}", fps);
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest frame delta fed to the reveal clock. A window that was hidden or
/// dragged can stall for seconds; the reveal should not skip ahead by that much.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Frame clock with FPS sampling.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Set when `fps` was refreshed and not yet taken.
    fps_fresh: bool,
}

impl Time {
    /// Create a clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose first frame is measured from `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fps_fresh: false,
        }
    }

    /// Mark a new frame now. Returns the clamped delta since the last one.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Mark a new frame at `now`. Returns the clamped delta since the last one.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        self.delta = now
            .saturating_duration_since(self.last_frame)
            .min(MAX_FRAME_DELTA);
        self.last_frame = now;
        self.frame_count += 1;

        let since_fps = now.saturating_duration_since(self.fps_update_time);
        if since_fps >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_fps.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            self.fps_fresh = true;
        }

        self.delta
    }

    /// Delta of the most recent frame.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// The FPS measurement, if it was refreshed since the last call.
    pub fn take_fps_sample(&mut self) -> Option<f32> {
        std::mem::take(&mut self.fps_fresh).then_some(self.fps)
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
