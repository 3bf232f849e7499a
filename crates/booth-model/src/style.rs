//! Filters and strip themes.
//!
//! Both are closed enumerations mapped to fixed lookup tables: a filter to a
//! list of color adjustment steps, a theme to its palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([0xff, 0xff, 0xff]);
    pub const BLACK: Color = Color([0x00, 0x00, 0x00]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// `#rrggbb` notation.
    pub fn hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Rec. 709 relative luminance in `[0, 1]` (gamma-encoded approximation).
    pub fn luminance(self) -> f32 {
        let [r, g, b] = self.0;
        (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) / 255.0
    }

    /// Blend `self` over `under` with the given opacity.
    pub fn over(self, under: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 * alpha + b as f32 * (1.0 - alpha)).round() as u8;
        Color([
            mix(self.0[0], under.0[0]),
            mix(self.0[1], under.0[1]),
            mix(self.0[2], under.0[2]),
        ])
    }
}

/// One color adjustment. Amounts follow the CSS filter functions of the
/// same name: `1.0` is full strength for grayscale/sepia and identity for
/// contrast/brightness/saturate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStep {
    Grayscale(f32),
    Sepia(f32),
    Contrast(f32),
    Brightness(f32),
    Saturate(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
}

/// Photo filter applied uniformly to every photo of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Soft,
    Vintage,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        Self::None,
        Self::Grayscale,
        Self::Sepia,
        Self::Soft,
        Self::Vintage,
    ];

    /// Adjustments baked into the photostrip.
    pub fn strip_recipe(self) -> &'static [FilterStep] {
        use FilterStep::*;
        match self {
            Self::None => &[],
            Self::Grayscale => &[Grayscale(1.0)],
            Self::Sepia => &[Sepia(0.5), Contrast(1.1)],
            Self::Soft => &[Contrast(0.95), Brightness(1.05), Saturate(1.1)],
            Self::Vintage => &[
                Sepia(0.3),
                Contrast(1.1),
                Brightness(0.9),
                HueRotate(-5.0),
            ],
        }
    }

    /// Adjustments for the live viewfinder. Stronger than the strip
    /// recipe so the effect reads on a moving picture.
    pub fn preview_recipe(self) -> &'static [FilterStep] {
        use FilterStep::*;
        match self {
            Self::None => &[],
            Self::Grayscale => &[Grayscale(1.0)],
            Self::Sepia => &[Sepia(0.6), Contrast(1.2)],
            Self::Soft => &[Contrast(0.9), Brightness(1.1), Saturate(1.2)],
            Self::Vintage => &[
                Sepia(0.4),
                Contrast(1.1),
                Brightness(0.9),
                HueRotate(-10.0),
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Soft => "soft",
            Self::Vintage => "vintage",
        }
    }

    /// Button label: "Normal" for no filter, otherwise the capitalized name.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Normal",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
            Self::Soft => "Soft",
            Self::Vintage => "Vintage",
        }
    }

    /// Result-screen tag, e.g. `"Filter: Normal"`.
    pub fn tag(self) -> String {
        format!("Filter: {}", self.label())
    }
}

impl FromStr for FilterKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "normal" => Ok(Self::None),
            "grayscale" | "greyscale" => Ok(Self::Grayscale),
            "sepia" => Ok(Self::Sepia),
            "soft" => Ok(Self::Soft),
            "vintage" => Ok(Self::Vintage),
            other => Err(ModelError::UnknownFilter(other.to_string())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background/border color scheme of the photostrip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripTheme {
    #[default]
    White,
    Black,
    Gray,
}

/// Colors of the small layout badge drawn over the viewfinder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BadgeColors {
    pub background: Color,
    pub background_alpha: f32,
    pub text: Color,
}

impl StripTheme {
    pub const ALL: [StripTheme; 3] = [Self::White, Self::Black, Self::Gray];

    /// Strip background fill.
    pub fn background(self) -> Color {
        match self {
            Self::White => Color::rgb(0xfd, 0xfd, 0xfd),
            Self::Black => Color::rgb(0x1a, 0x1a, 0x1a),
            Self::Gray => Color::rgb(0xe5, 0xe7, 0xeb),
        }
    }

    /// Title caption color.
    pub fn text_color(self) -> Color {
        match self {
            Self::Black => Color::rgb(0xff, 0xff, 0xff),
            Self::White | Self::Gray => Color::rgb(0x1a, 0x1a, 0x1a),
        }
    }

    /// Date and watermark color.
    pub fn meta_color(self) -> Color {
        match self {
            Self::Black => Color::rgb(0x88, 0x88, 0x88),
            Self::White | Self::Gray => Color::rgb(0x66, 0x66, 0x66),
        }
    }

    /// Whether the strip is dark and needs light text.
    pub fn is_dark(self) -> bool {
        self == Self::Black
    }

    /// Viewfinder border previewing the strip color.
    pub fn preview_border(self) -> Color {
        match self {
            Self::White => Color::WHITE,
            Self::Black => Color::BLACK,
            Self::Gray => Color::rgb(0x9c, 0xa3, 0xaf),
        }
    }

    /// Layout badge colors. Always light text on a dark badge; the dark
    /// theme gets a near-opaque badge.
    pub fn badge_colors(self) -> BadgeColors {
        match self {
            Self::Black => BadgeColors {
                background: Color::BLACK,
                background_alpha: 0.9,
                text: Color::WHITE,
            },
            Self::White | Self::Gray => BadgeColors {
                background: Color::BLACK,
                background_alpha: 0.5,
                text: Color::WHITE,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Gray => "gray",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
            Self::Gray => "Gray",
        }
    }

    /// Result-screen tag, e.g. `"Gray Strip"`.
    pub fn tag(self) -> String {
        format!("{} Strip", self.label())
    }
}

impl FromStr for StripTheme {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            "gray" | "grey" => Ok(Self::Gray),
            other => Err(ModelError::UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for StripTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_recipe_is_empty() {
        assert!(FilterKind::None.strip_recipe().is_empty());
        assert!(FilterKind::None.preview_recipe().is_empty());
    }

    #[test]
    fn test_every_other_filter_has_a_recipe() {
        for filter in FilterKind::ALL {
            if filter != FilterKind::None {
                assert!(!filter.strip_recipe().is_empty(), "{filter}");
                assert!(!filter.preview_recipe().is_empty(), "{filter}");
            }
        }
    }

    #[test]
    fn test_preview_sepia_is_stronger_than_strip_sepia() {
        assert_eq!(
            FilterKind::Sepia.strip_recipe()[0],
            FilterStep::Sepia(0.5)
        );
        assert_eq!(
            FilterKind::Sepia.preview_recipe()[0],
            FilterStep::Sepia(0.6)
        );
    }

    #[test]
    fn test_filter_labels_and_tags() {
        assert_eq!(FilterKind::None.label(), "Normal");
        assert_eq!(FilterKind::None.tag(), "Filter: Normal");
        assert_eq!(FilterKind::Vintage.tag(), "Filter: Vintage");
        assert_eq!("normal".parse::<FilterKind>().unwrap(), FilterKind::None);
        assert!("noir".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_theme_backgrounds() {
        assert_eq!(StripTheme::White.background().hex(), "#fdfdfd");
        assert_eq!(StripTheme::Black.background().hex(), "#1a1a1a");
        assert_eq!(StripTheme::Gray.background().hex(), "#e5e7eb");
    }

    #[test]
    fn test_footer_text_contrasts_with_background() {
        for theme in StripTheme::ALL {
            let bg = theme.background().luminance();
            let text = theme.text_color().luminance();
            let meta = theme.meta_color().luminance();
            assert_ne!(theme.text_color(), theme.background());
            assert!((bg - text).abs() > 0.5, "{theme}: title too close");
            assert!((bg - meta).abs() > 0.2, "{theme}: meta too close");
            if theme.is_dark() {
                assert!(text > bg);
            } else {
                assert!(text < bg);
            }
        }
    }

    #[test]
    fn test_badge_text_contrasts_with_badge() {
        for theme in StripTheme::ALL {
            let badge = theme.badge_colors();
            assert_ne!(badge.text, badge.background);
        }
        assert_eq!(StripTheme::Gray.badge_colors().text, Color::WHITE);
    }

    #[test]
    fn test_black_theme_badge_is_light_on_dark() {
        let badge = StripTheme::Black.badge_colors();
        assert!(badge.text.luminance() > 0.5);
        assert!(badge.background.luminance() < 0.5);
        assert!(StripTheme::Black.text_color().luminance() > 0.5);
    }

    #[test]
    fn test_color_over_blends() {
        let grey = Color::WHITE.over(Color::BLACK, 0.5);
        assert_eq!(grey, Color::rgb(128, 128, 128));
        assert_eq!(Color::WHITE.over(Color::BLACK, 1.0), Color::WHITE);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("grey".parse::<StripTheme>().unwrap(), StripTheme::Gray);
        assert_eq!(StripTheme::Gray.tag(), "Gray Strip");
    }
}
