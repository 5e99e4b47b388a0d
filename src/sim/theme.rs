//! Level themes
//!
//! Colors are authored in OKLCH (lightness, chroma, hue in degrees) and
//! converted to linear RGB only when tessellating the scene.

use serde::{Deserialize, Serialize};

/// A color in OKLCH space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    /// Hue in degrees
    pub h: f32,
}

impl Oklch {
    pub const fn new(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    /// Convert to OKLab `[L, a, b]`
    pub fn to_oklab(self) -> [f32; 3] {
        let h = self.h.to_radians();
        [self.l, self.c * h.cos(), self.c * h.sin()]
    }

    pub fn from_oklab(lab: [f32; 3]) -> Self {
        let [l, a, b] = lab;
        let c = (a * a + b * b).sqrt();
        let mut h = b.atan2(a).to_degrees();
        if h < 0.0 {
            h += 360.0;
        }
        Self { l, c, h }
    }

    /// Linear sRGB with alpha, clamped into gamut
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [l, a, b] = self.to_oklab();

        let l_ = l + 0.396_337_78 * a + 0.215_803_76 * b;
        let m_ = l - 0.105_561_346 * a - 0.063_854_17 * b;
        let s_ = l - 0.089_484_18 * a - 1.291_485_5 * b;

        let (l3, m3, s3) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

        let r = 4.076_741_7 * l3 - 3.307_711_6 * m3 + 0.230_969_94 * s3;
        let g = -1.268_438 * l3 + 2.609_757_4 * m3 - 0.341_319_38 * s3;
        let b = -0.004_196_086_3 * l3 - 0.703_418_6 * m3 + 1.707_614_7 * s3;

        [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0), alpha]
    }

    /// Perceptual interpolation through OKLab
    pub fn mix(self, other: Oklch, t: f32) -> Oklch {
        let t = t.clamp(0.0, 1.0);
        let a = self.to_oklab();
        let b = other.to_oklab();
        Oklch::from_oklab([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ])
    }
}

/// How background colors move between themes during a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeBlend {
    /// Hold the old colors until halfway, then switch
    #[default]
    Step,
    /// Interpolate through OKLab
    Smooth,
}

impl ThemeBlend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeBlend::Step => "step",
            ThemeBlend::Smooth => "smooth",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "step" => Some(ThemeBlend::Step),
            "smooth" => Some(ThemeBlend::Smooth),
            _ => None,
        }
    }

    /// Blend a single color pair at transition progress `t`
    pub fn apply(self, from: Oklch, to: Oklch, t: f32) -> Oklch {
        match self {
            ThemeBlend::Step => {
                if t < 0.5 {
                    from
                } else {
                    to
                }
            }
            ThemeBlend::Smooth => from.mix(to, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeName {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Colors for one band of levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: ThemeName,
    /// Top and bottom gradient stops
    pub background: [Oklch; 2],
    pub obstacle: Oklch,
    pub accent: Oklch,
}

static THEMES: [Theme; 4] = [
    Theme {
        name: ThemeName::Beginner,
        background: [Oklch::new(0.95, 0.02, 40.0), Oklch::new(0.90, 0.03, 60.0)],
        obstacle: Oklch::new(0.55, 0.12, 120.0),
        accent: Oklch::new(0.70, 0.15, 60.0),
    },
    Theme {
        name: ThemeName::Intermediate,
        background: [Oklch::new(0.92, 0.04, 35.0), Oklch::new(0.85, 0.06, 50.0)],
        obstacle: Oklch::new(0.60, 0.14, 35.0),
        accent: Oklch::new(0.65, 0.16, 45.0),
    },
    Theme {
        name: ThemeName::Advanced,
        background: [Oklch::new(0.88, 0.06, 30.0), Oklch::new(0.80, 0.08, 40.0)],
        obstacle: Oklch::new(0.55, 0.15, 30.0),
        accent: Oklch::new(0.60, 0.17, 35.0),
    },
    Theme {
        name: ThemeName::Expert,
        background: [Oklch::new(0.85, 0.08, 25.0), Oklch::new(0.75, 0.10, 35.0)],
        obstacle: Oklch::new(0.50, 0.16, 25.0),
        accent: Oklch::new(0.55, 0.18, 30.0),
    },
];

/// Theme for a level: 1-3 beginner, 4-6 intermediate, 7-9 advanced, 10+ expert
pub fn theme_for_level(level: u32) -> &'static Theme {
    match level {
        0..=3 => &THEMES[0],
        4..=6 => &THEMES[1],
        7..=9 => &THEMES[2],
        _ => &THEMES[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_theme_partition() {
        assert_eq!(theme_for_level(1).name, ThemeName::Beginner);
        assert_eq!(theme_for_level(3).name, ThemeName::Beginner);
        assert_eq!(theme_for_level(4).name, ThemeName::Intermediate);
        assert_eq!(theme_for_level(6).name, ThemeName::Intermediate);
        assert_eq!(theme_for_level(7).name, ThemeName::Advanced);
        assert_eq!(theme_for_level(9).name, ThemeName::Advanced);
        assert_eq!(theme_for_level(10).name, ThemeName::Expert);
        assert_eq!(theme_for_level(500).name, ThemeName::Expert);
    }

    #[test]
    fn test_theme_backgrounds_differ_between_bands() {
        for pair in THEMES.windows(2) {
            assert_ne!(pair[0].background[0], pair[1].background[0]);
        }
    }

    #[test]
    fn test_step_blend_switches_at_half() {
        let from = Oklch::new(0.9, 0.0, 0.0);
        let to = Oklch::new(0.5, 0.1, 120.0);
        assert_eq!(ThemeBlend::Step.apply(from, to, 0.0), from);
        assert_eq!(ThemeBlend::Step.apply(from, to, 0.48), from);
        assert_eq!(ThemeBlend::Step.apply(from, to, 0.5), to);
        assert_eq!(ThemeBlend::Step.apply(from, to, 1.0), to);
    }

    #[test]
    fn test_smooth_blend_midpoint_lightness() {
        let from = Oklch::new(0.9, 0.0, 0.0);
        let to = Oklch::new(0.5, 0.0, 0.0);
        let mid = ThemeBlend::Smooth.apply(from, to, 0.5);
        assert!((mid.l - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_white_and_black_convert() {
        let white = Oklch::new(1.0, 0.0, 0.0).to_rgba(1.0);
        for channel in &white[..3] {
            assert!((channel - 1.0).abs() < 1e-3);
        }
        let black = Oklch::new(0.0, 0.0, 0.0).to_rgba(1.0);
        for channel in &black[..3] {
            assert!(channel.abs() < 1e-6);
        }
    }

    #[test]
    fn test_blend_parse() {
        assert_eq!(ThemeBlend::parse("Smooth"), Some(ThemeBlend::Smooth));
        assert_eq!(ThemeBlend::parse("step"), Some(ThemeBlend::Step));
        assert_eq!(ThemeBlend::parse("lerp"), None);
    }

    proptest! {
        #[test]
        fn prop_every_level_has_a_theme(level in 1u32..10_000) {
            let theme = theme_for_level(level);
            let expected = match level {
                1..=3 => ThemeName::Beginner,
                4..=6 => ThemeName::Intermediate,
                7..=9 => ThemeName::Advanced,
                _ => ThemeName::Expert,
            };
            prop_assert_eq!(theme.name, expected);
        }
    }
}
