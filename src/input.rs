//! Pointer and touch tracking.
//!
//! [`PointerState`] holds the last known pointer position in canvas pixels.
//! Before any input arrives it sits far off-canvas so nothing is repelled.
//! Mouse motion and touch contacts both write to it; whichever moved last wins.
//!
//! Events are delivered on the same thread that runs the frame loop, so
//! every update sees the most recent coordinate without any locking.

use glam::Vec2;
use winit::event::{ElementState, KeyEvent, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Where the pointer is assumed to be before the first event.
pub const OFF_CANVAS: Vec2 = Vec2::new(-1000.0, -1000.0);

/// Last known pointer or touch position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: OFF_CANVAS,
        }
    }
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pointer position in canvas pixels.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Record a new pointer position.
    pub fn move_to(&mut self, position: Vec2) {
        if position.is_finite() {
            self.position = position;
        }
    }

    /// Apply a winit window event. Returns `true` if the position changed.
    ///
    /// Touch lift-off leaves the last contact point in place, so particles
    /// under a finger that just lifted stay pushed until the next touch.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        let before = self.position;
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Touch(touch) => {
                if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
                    self.move_to(Vec2::new(touch.location.x as f32, touch.location.y as f32));
                }
            }
            _ => {}
        }
        self.position != before
    }
}

/// Host key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the radial reveal, or reload once the field is disposed.
    Reveal,
    /// Switch between day and night themes.
    ToggleTheme,
    /// Save a PNG snapshot of the current frame.
    Snapshot,
    /// Reload the source image.
    Reload,
    /// Close the window.
    Quit,
}

impl Command {
    /// Map a key press to a command. Releases and repeats map to nothing.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => Self::from_key_code(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyR => Some(Command::Reveal),
            KeyCode::KeyT => Some(Command::ToggleTheme),
            KeyCode::KeyS => Some(Command::Snapshot),
            KeyCode::F5 => Some(Command::Reload),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        }
    }
}
