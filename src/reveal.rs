//! Radial reveal: the portrait blows apart from the center and fades out.
//!
//! A [`Reveal`] is a pure function of elapsed time. The field asks it, per
//! frame, how far the vanishing front has spread and how hard particles are
//! being pushed outward.

use std::f32::consts::PI;
use std::time::Duration;

use glam::Vec2;

use crate::particle::Particle;

/// How long a reveal runs before the field is disposed.
pub const REVEAL_DURATION: Duration = Duration::from_millis(9000);

/// Outward drift, in pixels per frame, at full eased progress.
const PUSH_SPEED: f32 = 10.0;

/// Elastic ease-out: overshoots past 1 and settles.
///
/// `ease_out_elastic(0) == 0` and `ease_out_elastic(1) == 1` exactly.
pub fn ease_out_elastic(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = (2.0 * PI) / 3.0;
    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

/// Parameters of one running reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    /// Point the front expands from.
    pub center: Vec2,
    /// Radius at which the front has swept the whole canvas.
    pub max_radius: f32,
    pub duration: Duration,
}

impl Reveal {
    /// A reveal centered on a canvas of `size`, reaching its corners at the end.
    pub fn centered(size: Vec2) -> Self {
        let center = size * 0.5;
        Self {
            center,
            max_radius: center.length(),
            duration: REVEAL_DURATION,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Advance one particle by one frame of the reveal.
    ///
    /// Particles inside the vanishing front fade in proportion to their
    /// distance from the center, and everything drifts radially outward.
    pub fn step(&self, particle: &mut Particle, elapsed: Duration) {
        if self.is_finished(elapsed) {
            particle.opacity = 0.0;
            return;
        }

        let eased = ease_out_elastic(self.progress(elapsed));
        let offset = particle.position - self.center;
        let distance = offset.length();

        let front = eased * self.max_radius;
        if distance < front {
            particle.opacity = 1.0 - distance / front;
        }

        if eased > 0.0 && distance > 0.0 {
            particle.position += offset / distance * (PUSH_SPEED * eased);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ColorClass;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_out_elastic(0.0), 0.0);
        assert_eq!(ease_out_elastic(1.0), 1.0);
        // Overshoots early on
        assert!((0..100).map(|i| ease_out_elastic(i as f32 / 100.0)).any(|v| v > 1.0));
    }

    #[test]
    fn test_centered_reveal_reaches_corners() {
        let reveal = Reveal::centered(Vec2::new(600.0, 800.0));
        assert_eq!(reveal.center, Vec2::new(300.0, 400.0));
        assert_eq!(reveal.max_radius, 500.0);
    }

    #[test]
    fn test_step_pushes_outward_and_fades() {
        let reveal = Reveal::centered(Vec2::new(200.0, 200.0));
        let mut p = Particle::new(Vec2::new(110.0, 100.0), ColorClass::Light);
        reveal.step(&mut p, Duration::from_millis(4500));

        assert!(p.position.x > 110.0);
        assert!((p.position.y - 100.0).abs() < 1e-4);
        assert!(p.opacity < 1.0 && p.opacity > 0.0);
    }

    #[test]
    fn test_step_at_center_does_not_move() {
        let reveal = Reveal::centered(Vec2::new(200.0, 200.0));
        let mut p = Particle::new(Vec2::new(100.0, 100.0), ColorClass::Light);
        reveal.step(&mut p, Duration::from_millis(3000));
        assert_eq!(p.position, Vec2::new(100.0, 100.0));
        assert!(p.opacity.is_finite());
    }

    #[test]
    fn test_step_after_duration_hides() {
        let reveal = Reveal::centered(Vec2::new(200.0, 200.0));
        let mut p = Particle::new(Vec2::new(0.0, 0.0), ColorClass::Dark);
        reveal.step(&mut p, REVEAL_DURATION);
        assert_eq!(p.opacity, 0.0);
    }
}
