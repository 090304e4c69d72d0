//! Themes and particle colors.
//!
//! Colors are RGBA [`Vec4`]s with components in `0.0..=1.0`, interpreted as
//! display (sRGB-encoded) values the same way a 2D canvas fill style is.
//!
//! A particle's color is looked up from its [`ColorClass`] once, when the
//! field is built or the theme changes, never per frame.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::particle::ColorClass;

/// Build an opaque color from a `0xRRGGBB` literal.
pub fn hex(rgb: u32) -> Vec4 {
    let r = ((rgb >> 16) & 0xFF) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xFF) as f32 / 255.0;
    let b = (rgb & 0xFF) as f32 / 255.0;
    Vec4::new(r, g, b, 1.0)
}

/// Page theme behind the portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    /// Light particles on black.
    #[default]
    Night,
    /// Mid-gray particles on white.
    Day,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Night => Theme::Day,
            Theme::Day => Theme::Night,
        }
    }

    /// Color assigned to particles of `class` under this theme.
    pub fn particle_color(&self, class: ColorClass) -> Vec4 {
        match (self, class) {
            (_, ColorClass::Dark) => hex(0x333333),
            (Theme::Night, ColorClass::Light) => hex(0xCCCCCC),
            (Theme::Day, ColorClass::Light) => hex(0x999999),
        }
    }

    /// Opaque page color under the canvas.
    pub fn background(&self) -> Vec4 {
        match self {
            Theme::Night => Vec4::new(0.0, 0.0, 0.0, 1.0),
            Theme::Day => Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Translucent wash drawn over the whole surface at the start of a frame.
    pub fn fade(&self) -> Vec4 {
        match self {
            Theme::Night => Vec4::new(0.0, 0.0, 0.0, 0.1),
            Theme::Day => Vec4::new(1.0, 1.0, 1.0, 0.1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Night => "night",
            Theme::Day => "day",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "night" => Ok(Theme::Night),
            "day" => Ok(Theme::Day),
            other => Err(format!("unknown theme '{}', expected 'day' or 'night'", other)),
        }
    }
}

/// Source-over blend of `src` onto `dst`. Both are straight (non-premultiplied) RGBA.
pub fn blend_over(dst: Vec4, src: Vec4) -> Vec4 {
    let sa = src.w;
    let out_a = sa + dst.w * (1.0 - sa);
    if out_a <= 0.0 {
        return Vec4::ZERO;
    }
    let rgb = (src.truncate() * sa + dst.truncate() * dst.w * (1.0 - sa)) / out_a;
    rgb.extend(out_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        let c = hex(0x333333);
        assert!((c.x - 0.2).abs() < 1e-6);
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn test_night_palette() {
        assert_eq!(Theme::Night.particle_color(ColorClass::Dark), hex(0x333333));
        assert_eq!(Theme::Night.particle_color(ColorClass::Light), hex(0xCCCCCC));
    }

    #[test]
    fn test_toggle_and_parse() {
        assert_eq!(Theme::Night.toggled(), Theme::Day);
        assert_eq!(Theme::Day.toggled(), Theme::Night);
        assert_eq!("DAY".parse::<Theme>(), Ok(Theme::Day));
        assert!("dusk".parse::<Theme>().is_err());
    }

    #[test]
    fn test_blend_over() {
        let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let white = Vec4::new(1.0, 1.0, 1.0, 1.0);
        let half = blend_over(black, Vec4::new(1.0, 1.0, 1.0, 0.5));
        assert!((half.x - 0.5).abs() < 1e-6);
        assert_eq!(half.w, 1.0);

        // Opaque source replaces destination
        assert_eq!(blend_over(black, white), white);
        // Transparent onto transparent stays transparent
        assert_eq!(blend_over(Vec4::ZERO, Vec4::ZERO), Vec4::ZERO);
    }
}
