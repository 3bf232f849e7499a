//! Footer captions: title, timestamp and watermark.
//!
//! Caption placement is computed without a font so that strip geometry is
//! complete even on hosts with no usable TrueType file; glyphs are drawn
//! only when a font was loaded.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use chrono::{DateTime, FixedOffset};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use photobooth_common::config::StripConfig;
use photobooth_model::{Color, StripGeometry, StripTheme};
use serde::Serialize;

/// Monospace fonts tried when no font is configured, in order.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/Library/Fonts/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Caption timestamp format, e.g. `Oct 16, 2026 • 03:45 PM`.
pub const CAPTION_DATE_FORMAT: &str = "%b %-d, %Y • %I:%M %p";

/// A font loaded for caption drawing.
#[derive(Clone)]
pub struct CaptionFont {
    pub font: FontArc,
    pub path: PathBuf,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CaptionFont {
    /// Load a font file.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        match FontArc::try_from_vec(bytes) {
            Ok(font) => Some(Self {
                font,
                path: path.to_path_buf(),
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unusable font file");
                None
            }
        }
    }

    /// The configured font if it loads, else the first usable system font.
    pub fn find(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            if let Some(font) = Self::load(path) {
                return Some(font);
            }
            tracing::warn!(
                path = %path.display(),
                "Configured caption font unavailable, trying system fonts"
            );
        }

        let found = FALLBACK_FONTS
            .iter()
            .map(Path::new)
            .filter(|p| p.is_file())
            .find_map(Self::load);
        match &found {
            Some(font) => tracing::debug!(path = %font.path.display(), "Caption font loaded"),
            None => tracing::warn!("No caption font found; strip captions will not be drawn"),
        }
        found
    }

    /// Width of `text` at `px` with `spacing` pixels between glyphs.
    pub fn measure(&self, text: &str, px: f32, spacing: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let advances: f32 = text
            .chars()
            .map(|c| scaled.h_advance(self.font.glyph_id(c)))
            .sum();
        let gaps = text.chars().count().saturating_sub(1) as f32;
        advances + gaps * spacing
    }
}

/// Where and how one caption line is placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionLayout {
    pub text: String,
    /// Horizontal center of the line.
    pub center_x: f32,
    /// Baseline y.
    pub baseline: f32,
    pub px: f32,
    /// Extra advance between glyphs.
    pub spacing: f32,
    /// Final color, already blended over the strip background.
    pub color: Color,
    pub bold: bool,
}

/// Format the caption timestamp.
pub fn format_caption_date(at: &DateTime<FixedOffset>) -> String {
    at.format(CAPTION_DATE_FORMAT).to_string()
}

/// Lay out the title, timestamp and watermark for a strip.
pub fn footer_captions(
    geometry: &StripGeometry,
    theme: StripTheme,
    strip: &StripConfig,
    at: &DateTime<FixedOffset>,
) -> Vec<CaptionLayout> {
    let m = geometry.footer_metrics();
    let mut captions = vec![
        CaptionLayout {
            text: strip.title.clone(),
            center_x: m.center_x,
            baseline: m.title_baseline,
            px: m.title_px,
            spacing: m.title_spacing,
            color: theme.text_color(),
            bold: true,
        },
        CaptionLayout {
            text: format_caption_date(at),
            center_x: m.center_x,
            baseline: m.meta_baseline,
            px: m.meta_px,
            spacing: m.meta_spacing,
            color: theme.meta_color(),
            bold: false,
        },
    ];

    if !strip.watermark.is_empty() {
        captions.push(CaptionLayout {
            text: strip.watermark.clone(),
            center_x: m.watermark_center_x,
            baseline: m.watermark_baseline,
            px: m.watermark_px,
            spacing: 0.0,
            color: theme
                .meta_color()
                .over(theme.background(), m.watermark_alpha),
            bold: false,
        });
    }
    captions
}

/// Draw one caption onto `canvas`, glyph by glyph.
pub fn draw_caption(canvas: &mut RgbImage, font: &CaptionFont, caption: &CaptionLayout) {
    let scale = PxScale::from(caption.px);
    let scaled = font.font.as_scaled(scale);
    let top = (caption.baseline - scaled.ascent()).round() as i32;
    let color = Rgb(caption.color.0);

    let mut x = caption.center_x - font.measure(&caption.text, caption.px, caption.spacing) / 2.0;
    let mut buf = [0u8; 4];
    for c in caption.text.chars() {
        let glyph: &str = c.encode_utf8(&mut buf);
        let left = x.round() as i32;
        draw_text_mut(canvas, color, left, top, scale, &font.font, glyph);
        if caption.bold {
            draw_text_mut(canvas, color, left + 1, top, scale, &font.font, glyph);
        }
        x += scaled.h_advance(font.font.glyph_id(c)) + caption.spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use photobooth_model::{LayoutCount, ViewportClass};

    fn afternoon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 6, 15, 45, 0)
            .unwrap()
    }

    #[test]
    fn test_caption_date_format() {
        assert_eq!(format_caption_date(&afternoon()), "Oct 6, 2026 • 03:45 PM");
    }

    #[test]
    fn test_footer_captions_follow_metrics() {
        let g = StripGeometry::compute(LayoutCount::THREE, ViewportClass::Wide, 640, 480).unwrap();
        let captions = footer_captions(&g, StripTheme::Black, &StripConfig::default(), &afternoon());

        assert_eq!(captions.len(), 3);
        let (title, date, mark) = (&captions[0], &captions[1], &captions[2]);
        assert_eq!(title.text, "Home Proj.");
        assert_eq!(title.baseline, g.footer_top() as f32 + 30.0);
        assert_eq!(date.baseline, title.baseline + 30.0);
        assert_eq!(title.color, Color::WHITE);
        assert_eq!(date.color, Color::rgb(0x88, 0x88, 0x88));
        assert_eq!(mark.center_x, g.width as f32 - 60.0);
        assert_eq!(mark.baseline, g.height as f32 - 15.0);
        assert_ne!(mark.color, StripTheme::Black.background());
    }

    #[test]
    fn test_empty_watermark_is_omitted() {
        let g = StripGeometry::compute(LayoutCount::TWO, ViewportClass::Narrow, 480, 640).unwrap();
        let strip = StripConfig {
            watermark: String::new(),
            ..StripConfig::default()
        };
        let captions = footer_captions(&g, StripTheme::White, &strip, &afternoon());
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].px, 18.0);
    }

    #[test]
    fn test_missing_font_is_not_found() {
        assert!(CaptionFont::load(Path::new("/no/such/font.ttf")).is_none());
    }
}
