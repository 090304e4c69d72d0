//! The live particle field.
//!
//! A [`ParticleField`] is built in one batch from sampled seed points and is
//! replaced wholesale when a new image arrives. It moves through three modes:
//!
//! ```text
//!  Normal ──start_reveal──▶ Revealing ──duration elapsed──▶ Disposed
//! ```
//!
//! Each mode has its own update and draw behavior; the field matches on its
//! [`FieldMode`] every frame rather than swapping behavior in and out.

use std::time::Duration;

use glam::{Vec2, Vec4};

use crate::bitmap::Bitmap;
use crate::config::PortraitConfig;
use crate::error::ImageError;
use crate::particle::{ColorClass, Particle, SeedPoint};
use crate::render::Surface;
use crate::reveal::Reveal;
use crate::sampler::{self, CanvasSize};
use crate::visuals::Theme;

/// What the field is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldMode {
    /// Pointer repulsion and homing.
    Normal,
    /// Blowing apart from the center.
    Revealing {
        reveal: Reveal,
        elapsed: Duration,
    },
    /// Reveal finished; nothing left to simulate.
    Disposed,
}

/// Colors for each [`ColorClass`] under the current theme.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClassColors {
    light: Vec4,
    dark: Vec4,
}

impl ClassColors {
    fn for_theme(theme: Theme) -> Self {
        Self {
            light: theme.particle_color(ColorClass::Light),
            dark: theme.particle_color(ColorClass::Dark),
        }
    }

    #[inline]
    fn get(&self, class: ColorClass) -> Vec4 {
        match class {
            ColorClass::Light => self.light,
            ColorClass::Dark => self.dark,
        }
    }
}

/// A fixed set of particles plus the mode driving them.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    mode: FieldMode,
    theme: Theme,
    colors: ClassColors,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::empty(Theme::default())
    }
}

impl ParticleField {
    /// A field with no particles.
    pub fn empty(theme: Theme) -> Self {
        Self::new(Vec::new(), theme)
    }

    /// Build a field with one particle per seed, each at rest on its seed.
    pub fn new<I>(seeds: I, theme: Theme) -> Self
    where
        I: IntoIterator<Item = SeedPoint>,
    {
        Self {
            particles: seeds.into_iter().map(Particle::from).collect(),
            mode: FieldMode::Normal,
            theme,
            colors: ClassColors::for_theme(theme),
        }
    }

    /// Sample `bitmap` onto `canvas` and build a field from the result.
    pub fn from_bitmap(
        bitmap: &Bitmap,
        canvas: CanvasSize,
        config: &PortraitConfig,
        theme: Theme,
    ) -> Result<Self, ImageError> {
        let seeds = sampler::sample(bitmap, canvas, config)?;
        Ok(Self::new(seeds, theme))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Display color of a particle under the current theme.
    #[inline]
    pub fn color_of(&self, particle: &Particle) -> Vec4 {
        self.colors.get(particle.class())
    }

    /// Switch theme. Colors are remapped here, once, not per frame.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            log::debug!("Field theme {} -> {}", self.theme.name(), theme.name());
            self.theme = theme;
            self.colors = ClassColors::for_theme(theme);
        }
    }

    /// Begin the radial reveal on a canvas of `size`.
    ///
    /// Returns `false` if the field is not in [`FieldMode::Normal`]. An empty
    /// field has nothing to reveal and is disposed straight away.
    pub fn start_reveal(&mut self, size: Vec2) -> bool {
        if self.mode != FieldMode::Normal {
            return false;
        }
        if self.particles.is_empty() {
            self.dispose();
            return true;
        }
        for p in &mut self.particles {
            p.opacity = 1.0;
        }
        self.mode = FieldMode::Revealing {
            reveal: Reveal::centered(size),
            elapsed: Duration::ZERO,
        };
        log::debug!("Reveal started over {} particles", self.particles.len());
        true
    }

    /// Drop every particle and stop simulating.
    pub fn dispose(&mut self) {
        self.particles.clear();
        self.mode = FieldMode::Disposed;
        log::debug!("Field disposed");
    }

    /// Advance every particle one frame. `dt` drives the reveal clock only;
    /// the physics step is per frame.
    pub fn update(&mut self, pointer: Vec2, config: &PortraitConfig, dt: Duration) {
        match self.advance_mode(dt) {
            FieldMode::Normal => {
                for p in &mut self.particles {
                    p.update(pointer, config);
                }
            }
            FieldMode::Revealing { reveal, elapsed } => {
                for p in &mut self.particles {
                    reveal.step(p, elapsed);
                }
                self.finish_reveal_if_done();
            }
            FieldMode::Disposed => {}
        }
    }

    /// Draw every particle.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, config: &PortraitConfig) {
        for p in &self.particles {
            self.draw_particle(p, surface, config);
        }
    }

    /// Update then draw each particle in turn, one frame's worth.
    pub fn step<S: Surface + ?Sized>(
        &mut self,
        pointer: Vec2,
        config: &PortraitConfig,
        dt: Duration,
        surface: &mut S,
    ) {
        let mode = self.advance_mode(dt);
        let colors = self.colors;
        for p in &mut self.particles {
            match mode {
                FieldMode::Normal => p.update(pointer, config),
                FieldMode::Revealing { reveal, elapsed } => reveal.step(p, elapsed),
                FieldMode::Disposed => {}
            }
            draw_with(p, colors.get(p.class()), mode, surface, config);
        }
        if matches!(mode, FieldMode::Revealing { .. }) {
            self.finish_reveal_if_done();
        }
    }

    fn draw_particle<S: Surface + ?Sized>(&self, p: &Particle, surface: &mut S, config: &PortraitConfig) {
        draw_with(p, self.color_of(p), self.mode, surface, config);
    }

    /// Move the reveal clock forward and return the mode for this frame.
    fn advance_mode(&mut self, dt: Duration) -> FieldMode {
        if let FieldMode::Revealing { elapsed, .. } = &mut self.mode {
            *elapsed += dt;
        }
        self.mode
    }

    fn finish_reveal_if_done(&mut self) {
        if let FieldMode::Revealing { reveal, elapsed } = self.mode {
            if reveal.is_finished(elapsed) {
                self.dispose();
            }
        }
    }
}

fn draw_with<S: Surface + ?Sized>(
    p: &Particle,
    color: Vec4,
    mode: FieldMode,
    surface: &mut S,
    config: &PortraitConfig,
) {
    let radius = config.particle_size / 2.0;
    match mode {
        FieldMode::Normal => surface.fill_disc(p.position, radius, color),
        FieldMode::Revealing { .. } => {
            if p.opacity > 0.0 {
                let faded = color.truncate().extend(color.w * p.opacity);
                surface.fill_disc(p.position, radius * p.opacity, faded);
            }
        }
        FieldMode::Disposed => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;
    use crate::reveal::REVEAL_DURATION;

    fn seeds() -> Vec<SeedPoint> {
        vec![
            SeedPoint { position: Vec2::new(10.0, 10.0), class: ColorClass::Light },
            SeedPoint { position: Vec2::new(30.0, 10.0), class: ColorClass::Dark },
            SeedPoint { position: Vec2::new(50.0, 40.0), class: ColorClass::Light },
        ]
    }

    /// Counts draw calls instead of rasterizing.
    #[derive(Default)]
    struct Recorder {
        discs: Vec<(Vec2, f32, Vec4)>,
        fades: usize,
    }

    impl Surface for Recorder {
        fn fade(&mut self, _color: Vec4) {
            self.fades += 1;
        }
        fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
            self.discs.push((center, radius, color));
        }
    }

    #[test]
    fn test_new_field_at_rest() {
        let field = ParticleField::new(seeds(), Theme::Night);
        assert_eq!(field.len(), 3);
        assert_eq!(field.mode(), FieldMode::Normal);
        for (p, s) in field.particles().iter().zip(seeds()) {
            assert_eq!(p.position, s.position);
            assert_eq!(p.origin(), s.position);
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_draw_uses_theme_colors() {
        let config = PortraitConfig::default();
        let mut field = ParticleField::new(seeds(), Theme::Night);
        let mut rec = Recorder::default();
        field.draw(&mut rec, &config);
        assert_eq!(rec.discs.len(), 3);
        assert_eq!(rec.discs[0].1, 1.5);
        assert_eq!(rec.discs[0].2, Theme::Night.particle_color(ColorClass::Light));
        assert_eq!(rec.discs[1].2, Theme::Night.particle_color(ColorClass::Dark));

        field.set_theme(Theme::Day);
        let mut rec = Recorder::default();
        field.draw(&mut rec, &config);
        assert_eq!(rec.discs[0].2, Theme::Day.particle_color(ColorClass::Light));
    }

    #[test]
    fn test_update_pushes_nearby_particle_only() {
        let config = PortraitConfig::default();
        let mut field = ParticleField::new(seeds(), Theme::Night);
        field.update(Vec2::new(5.0, 10.0), &config, Duration::from_millis(16));

        let ps = field.particles();
        assert!(ps[0].position.x > 10.0);
        assert!(ps[1].position.x > 30.0);
        assert!(ps.iter().all(|p| p.position.is_finite()));

        // Out of reach: nothing moves
        let mut field = ParticleField::new(seeds(), Theme::Night);
        field.update(Vec2::splat(-1000.0), &config, Duration::from_millis(16));
        for (p, s) in field.particles().iter().zip(seeds()) {
            assert_eq!(p.position, s.position);
        }
    }

    #[test]
    fn test_empty_field_is_harmless() {
        let config = PortraitConfig::default();
        let mut field = ParticleField::default();
        let mut rec = Recorder::default();
        field.step(Vec2::ZERO, &config, Duration::from_millis(16), &mut rec);
        assert!(rec.discs.is_empty());
        assert!(field.is_empty());
    }

    #[test]
    fn test_reveal_runs_to_disposal() {
        let config = PortraitConfig::default();
        let mut field = ParticleField::new(seeds(), Theme::Night);
        assert!(field.start_reveal(Vec2::new(100.0, 100.0)));
        assert!(matches!(field.mode(), FieldMode::Revealing { .. }));

        // A second trigger while running is ignored
        assert!(!field.start_reveal(Vec2::new(100.0, 100.0)));

        let mut canvas = Canvas::new(100, 100);
        let frame = Duration::from_millis(100);
        let frames = REVEAL_DURATION.as_millis() / frame.as_millis();
        for _ in 0..frames - 1 {
            field.step(Vec2::ZERO, &config, frame, &mut canvas);
        }
        assert!(matches!(field.mode(), FieldMode::Revealing { .. }));
        assert_eq!(field.len(), 3);

        field.step(Vec2::ZERO, &config, frame, &mut canvas);
        assert_eq!(field.mode(), FieldMode::Disposed);
        assert!(field.is_empty());
        assert!(!field.start_reveal(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_reveal_ignores_pointer() {
        let config = PortraitConfig::default();
        let mut field = ParticleField::new(seeds(), Theme::Night);
        field.start_reveal(Vec2::new(60.0, 20.0));
        let before = field.particles()[0].position;
        // Pointer right on top of the particle: in Normal mode this would repel
        field.update(before, &config, Duration::ZERO);
        // At zero elapsed time the eased progress is 0, so nothing moves
        assert_eq!(field.particles()[0].position, before);
    }

    #[test]
    fn test_reveal_draw_shrinks_and_fades() {
        let config = PortraitConfig::default();
        let mut field = ParticleField::new(seeds(), Theme::Night);
        field.start_reveal(Vec2::new(100.0, 100.0));
        field.update(Vec2::ZERO, &config, Duration::from_millis(4000));

        let mut rec = Recorder::default();
        field.draw(&mut rec, &config);
        for (_, radius, color) in &rec.discs {
            assert!(*radius <= 1.5);
            assert!(color.w <= 1.0);
        }
    }

    #[test]
    fn test_reveal_on_empty_field_disposes() {
        let mut field = ParticleField::default();
        assert!(field.start_reveal(Vec2::new(100.0, 100.0)));
        assert_eq!(field.mode(), FieldMode::Disposed);
    }
}
