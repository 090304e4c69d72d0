//! A single mosaic particle and its per-frame physics.
//!
//! Each frame a particle picks up three contributions, in order:
//!
//! 1. **Repulsion** from the pointer, with quadratic falloff inside
//!    `repulsion_radius`.
//! 2. **Homing**, a linear spring toward the particle's origin.
//! 3. **Damping**, which scales velocity by `1 - friction`.
//!
//! Position is then advanced by one explicit Euler step. There is no
//! pairwise interaction, so update order across particles does not matter.

use glam::Vec2;

use crate::config::PortraitConfig;

/// Brightness class of a sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorClass {
    Light,
    Dark,
}

impl ColorClass {
    /// Pixels brighter than this (mean of R, G, B) are [`ColorClass::Light`].
    pub const THRESHOLD: f32 = 128.0;

    /// Classify an RGB triple by its mean channel value.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let brightness = (r as f32 + g as f32 + b as f32) / 3.0;
        if brightness > Self::THRESHOLD {
            ColorClass::Light
        } else {
            ColorClass::Dark
        }
    }
}

/// A sampled image location before it becomes a live particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    /// Position in canvas space.
    pub position: Vec2,
    pub class: ColorClass,
}

/// One simulated point mass anchored to a sampled pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    origin: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    class: ColorClass,
    /// Visibility in `[0, 1]`. Stays 1 outside of a reveal.
    pub opacity: f32,
}

impl Particle {
    /// A particle at rest on its origin.
    pub fn new(origin: Vec2, class: ColorClass) -> Self {
        Self {
            origin,
            position: origin,
            velocity: Vec2::ZERO,
            class,
            opacity: 1.0,
        }
    }

    /// Where this particle was sampled. Never changes.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn class(&self) -> ColorClass {
        self.class
    }

    /// Advance one frame under pointer repulsion, homing and damping.
    pub fn update(&mut self, pointer: Vec2, config: &PortraitConfig) {
        self.velocity += repulsion(
            self.position - pointer,
            config.repulsion_radius,
            config.repulsion_force,
        );
        self.velocity += (self.origin - self.position) * config.return_speed;
        self.velocity *= 1.0 - config.friction;
        self.position += self.velocity;
    }
}

impl From<SeedPoint> for Particle {
    fn from(seed: SeedPoint) -> Self {
        Particle::new(seed.position, seed.class)
    }
}

/// Velocity impulse a pointer at offset `-delta` applies to a particle.
///
/// `delta` points from the pointer to the particle. Inside `radius` the
/// magnitude is `((radius - d) / radius)^2 * force`, directed along `delta`.
/// Zero outside the radius, and zero when the pointer sits exactly on the
/// particle since the push direction is undefined there.
pub fn repulsion(delta: Vec2, radius: f32, force: f32) -> Vec2 {
    let distance = delta.length();
    if distance >= radius || distance <= 0.0 {
        return Vec2::ZERO;
    }

    let ratio = (radius - distance) / radius;
    let magnitude = ratio * ratio * force;
    let angle = delta.y.atan2(delta.x);
    Vec2::new(angle.cos(), angle.sin()) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn still_config() -> PortraitConfig {
        PortraitConfig::default()
            .with_return_speed(0.0)
            .with_repulsion_force(0.0)
    }

    #[test]
    fn test_color_class_threshold() {
        assert_eq!(ColorClass::from_rgb(200, 200, 200), ColorClass::Light);
        assert_eq!(ColorClass::from_rgb(128, 128, 128), ColorClass::Dark);
        assert_eq!(ColorClass::from_rgb(129, 129, 129), ColorClass::Light);
        // Mean is what counts, not any single channel
        assert_eq!(ColorClass::from_rgb(255, 0, 0), ColorClass::Dark);
    }

    #[test]
    fn test_repulsion_scenario_half_radius() {
        // Pointer 50 px left of the particle, radius 100, force 2
        let impulse = repulsion(Vec2::new(50.0, 0.0), 100.0, 2.0);
        assert!((impulse.length() - 0.5).abs() < EPS);
        assert!((impulse.x - 0.5).abs() < EPS);
        assert!(impulse.y.abs() < EPS);
    }

    #[test]
    fn test_repulsion_points_away_from_pointer() {
        let delta = Vec2::new(-30.0, 40.0);
        let impulse = repulsion(delta, 100.0, 2.0);
        let cos = impulse.normalize().dot(delta.normalize());
        assert!((cos - 1.0).abs() < EPS);
    }

    #[test]
    fn test_repulsion_zero_at_and_beyond_radius() {
        assert_eq!(repulsion(Vec2::new(100.0, 0.0), 100.0, 2.0), Vec2::ZERO);
        assert_eq!(repulsion(Vec2::new(0.0, 250.0), 100.0, 2.0), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_zero_distance_is_finite() {
        assert_eq!(repulsion(Vec2::ZERO, 100.0, 2.0), Vec2::ZERO);

        let mut p = Particle::new(Vec2::new(10.0, 10.0), ColorClass::Dark);
        p.update(Vec2::new(10.0, 10.0), &PortraitConfig::default());
        assert!(p.position.is_finite());
        assert!(p.velocity.is_finite());
    }

    #[test]
    fn test_friction_scenario() {
        let config = still_config().with_friction(0.15);
        let mut p = Particle::new(Vec2::ZERO, ColorClass::Light);
        p.velocity = Vec2::new(1.0, 1.0);
        p.update(Vec2::splat(-1000.0), &config);
        assert!((p.velocity.x - 0.85).abs() < EPS);
        assert!((p.velocity.y - 0.85).abs() < EPS);
        // Position integrates the damped velocity
        assert!((p.position.x - 0.85).abs() < EPS);
    }

    #[test]
    fn test_homing_pulls_toward_origin() {
        let config = PortraitConfig::default();
        let mut p = Particle::new(Vec2::new(100.0, 100.0), ColorClass::Light);
        p.position = Vec2::new(120.0, 100.0);
        p.update(Vec2::splat(-1000.0), &config);
        // (100 - 120) * 0.01 * 0.85
        assert!((p.velocity.x - (-0.17)).abs() < EPS);
        assert!(p.position.x < 120.0);
    }

    #[test]
    fn test_origin_never_moves() {
        let config = PortraitConfig::default();
        let origin = Vec2::new(40.0, 60.0);
        let mut p = Particle::new(origin, ColorClass::Dark);
        for i in 0..200 {
            p.update(Vec2::new(40.0 + i as f32 * 0.1, 55.0), &config);
        }
        assert_eq!(p.origin(), origin);
        assert_eq!(p.class(), ColorClass::Dark);
    }
}
