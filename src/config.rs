//! Simulation constants.
//!
//! A [`PortraitConfig`] is fixed for the lifetime of a run. The host decides
//! which [`DeviceProfile`] applies (for example by checking whether the
//! primary input is touch) and passes it in; nothing in this crate inspects
//! the platform to guess.
//!
//! ```ignore
//! let config = PortraitConfig::for_profile(DeviceProfile::Touch)
//!     .with_sampling_step(4)
//!     .with_particle_size(2.0);
//! config.validate()?;
//! ```
//!
//! Configs can also be read from JSON. Missing keys fall back to the
//! defaults of the profile named in the file:
//!
//! ```json
//! { "profile": "Touch", "sampling_step": 4 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Input device class the portrait is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceProfile {
    /// Mouse or trackpad.
    #[default]
    Desktop,
    /// Touch-primary device. Fingers are blunter than a cursor, so the
    /// repulsion zone is smaller but a little stronger.
    Touch,
}

impl DeviceProfile {
    /// The `(repulsion_radius, repulsion_force, friction)` triple for this profile.
    pub fn repulsion_tuning(&self) -> (f32, f32, f32) {
        match self {
            DeviceProfile::Desktop => (105.0, 1.8, 0.15),
            DeviceProfile::Touch => (78.0, 1.9, 0.16),
        }
    }
}

/// Read-only constants for one simulation run.
///
/// All distances are in canvas pixels and all rates are per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitConfig {
    /// Profile the repulsion triple was taken from.
    pub profile: DeviceProfile,
    /// Diameter of a drawn particle.
    pub particle_size: f32,
    /// Gap between particles. Kept for config compatibility; the physics
    /// does not read it.
    pub particle_margin: f32,
    /// Pointer influence radius.
    pub repulsion_radius: f32,
    /// Peak repulsion impulse, reached when the pointer sits on a particle.
    pub repulsion_force: f32,
    /// Fraction of velocity removed each frame, in `[0, 1)`.
    pub friction: f32,
    /// Spring constant pulling a particle back to its origin.
    pub return_speed: f32,
    /// Pixel stride used when sampling the source bitmap.
    pub sampling_step: u32,
    /// Largest fraction of the canvas the portrait may cover on either axis.
    pub max_display_ratio: f32,
    /// Largest source dimension processed; bigger images are shrunk first.
    pub max_image_size: u32,
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self::for_profile(DeviceProfile::Desktop)
    }
}

impl PortraitConfig {
    /// Defaults for the given device profile.
    pub fn for_profile(profile: DeviceProfile) -> Self {
        let (repulsion_radius, repulsion_force, friction) = profile.repulsion_tuning();
        Self {
            profile,
            particle_size: 3.0,
            particle_margin: 1.0,
            repulsion_radius,
            repulsion_force,
            friction,
            return_speed: 0.01,
            sampling_step: 5,
            max_display_ratio: 0.8,
            max_image_size: 1024,
        }
    }

    /// Parse a config from JSON.
    ///
    /// Keys absent from the document take the defaults of the document's
    /// `profile` (Desktop when that is absent too).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let profile = match value.get("profile") {
            Some(p) => serde_json::from_value(p.clone())?,
            None => DeviceProfile::default(),
        };

        let serde_json::Value::Object(overrides) = value else {
            return Err(ConfigError::Invalid("config must be a JSON object".into()));
        };

        let mut merged = serde_json::to_value(Self::for_profile(profile))?;
        if let Some(base) = merged.as_object_mut() {
            base.extend(overrides);
        }

        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value is in a range the simulation can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("particle_size", self.particle_size),
            ("particle_margin", self.particle_margin),
            ("repulsion_radius", self.repulsion_radius),
            ("repulsion_force", self.repulsion_force),
            ("friction", self.friction),
            ("return_speed", self.return_speed),
            ("max_display_ratio", self.max_display_ratio),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite", name)));
        }

        if self.particle_size <= 0.0 {
            return Err(ConfigError::Invalid("particle_size must be positive".into()));
        }
        if self.repulsion_radius <= 0.0 {
            return Err(ConfigError::Invalid("repulsion_radius must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid(format!(
                "friction must be in [0, 1), got {}",
                self.friction
            )));
        }
        if self.return_speed < 0.0 {
            return Err(ConfigError::Invalid("return_speed must not be negative".into()));
        }
        if self.sampling_step == 0 {
            return Err(ConfigError::Invalid("sampling_step must be at least 1".into()));
        }
        if self.max_display_ratio <= 0.0 || self.max_display_ratio > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "max_display_ratio must be in (0, 1], got {}",
                self.max_display_ratio
            )));
        }
        if self.max_image_size == 0 {
            return Err(ConfigError::Invalid("max_image_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Set the drawn particle diameter.
    pub fn with_particle_size(mut self, size: f32) -> Self {
        self.particle_size = size;
        self
    }

    /// Set the pointer influence radius.
    pub fn with_repulsion_radius(mut self, radius: f32) -> Self {
        self.repulsion_radius = radius;
        self
    }

    /// Set the peak repulsion impulse.
    pub fn with_repulsion_force(mut self, force: f32) -> Self {
        self.repulsion_force = force;
        self
    }

    /// Set the per-frame velocity damping.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the homing spring constant.
    pub fn with_return_speed(mut self, speed: f32) -> Self {
        self.return_speed = speed;
        self
    }

    /// Set the sampling stride in source pixels.
    pub fn with_sampling_step(mut self, step: u32) -> Self {
        self.sampling_step = step;
        self
    }

    /// Set the largest fraction of the canvas the portrait may cover.
    pub fn with_max_display_ratio(mut self, ratio: f32) -> Self {
        self.max_display_ratio = ratio;
        self
    }

    /// Set the largest source dimension processed.
    pub fn with_max_image_size(mut self, size: u32) -> Self {
        self.max_image_size = size;
        self
    }
}
