//! Color filters for strip photos and the viewfinder.
//!
//! Every [`FilterStep`] maps to one of the filter-effects primitives: either
//! a 3×3 color matrix over linear-in-gamma RGB or a per-channel linear
//! transfer. Steps run in recipe order and each result is clamped to the
//! displayable range before the next step.

use image::RgbImage;
use photobooth_model::FilterStep;

type Matrix = [[f32; 3]; 3];

/// A compiled filter step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColorOp {
    Matrix(Matrix),
    /// `out = in * slope + intercept`, in 0–255 units.
    Linear { slope: f32, intercept: f32 },
}

impl ColorOp {
    fn from_step(step: FilterStep) -> Self {
        match step {
            FilterStep::Grayscale(amount) => Self::Matrix(grayscale(amount)),
            FilterStep::Sepia(amount) => Self::Matrix(sepia(amount)),
            FilterStep::Saturate(amount) => Self::Matrix(saturate(amount)),
            FilterStep::HueRotate(degrees) => Self::Matrix(hue_rotate(degrees)),
            FilterStep::Contrast(amount) => Self::Linear {
                slope: amount,
                intercept: (0.5 - 0.5 * amount) * 255.0,
            },
            FilterStep::Brightness(amount) => Self::Linear {
                slope: amount,
                intercept: 0.0,
            },
        }
    }

    fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Self::Matrix(m) => [
                m[0][0] * r + m[0][1] * g + m[0][2] * b,
                m[1][0] * r + m[1][1] * g + m[1][2] * b,
                m[2][0] * r + m[2][1] * g + m[2][2] * b,
            ],
            Self::Linear { slope, intercept } => [
                r * slope + intercept,
                g * slope + intercept,
                b * slope + intercept,
            ],
        };
        out.map(|v| v.clamp(0.0, 255.0))
    }
}

fn grayscale(amount: f32) -> Matrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia(amount: f32) -> Matrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn saturate(amount: f32) -> Matrix {
    let s = amount.max(0.0);
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// Apply `recipe` to every pixel of `img` in place.
///
/// An empty recipe leaves the image untouched.
pub fn apply_recipe(img: &mut RgbImage, recipe: &[FilterStep]) {
    if recipe.is_empty() {
        return;
    }
    let ops: Vec<ColorOp> = recipe.iter().copied().map(ColorOp::from_step).collect();

    for pixel in img.pixels_mut() {
        let mut rgb = pixel.0.map(f32::from);
        for op in &ops {
            rgb = op.apply(rgb);
        }
        pixel.0 = rgb.map(|v| v.round() as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use photobooth_model::FilterKind;

    fn swatch() -> RgbImage {
        RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 120]))
    }

    fn mean_saturation(img: &RgbImage) -> f32 {
        let total: f32 = img
            .pixels()
            .map(|p| {
                let max = *p.0.iter().max().unwrap_or(&0) as f32;
                let min = *p.0.iter().min().unwrap_or(&0) as f32;
                max - min
            })
            .sum();
        total / (img.width() * img.height()) as f32
    }

    fn mean_luma(img: &RgbImage) -> f32 {
        let total: f32 = img
            .pixels()
            .map(|p| 0.2126 * p[0] as f32 + 0.7152 * p[1] as f32 + 0.0722 * p[2] as f32)
            .sum();
        total / (img.width() * img.height()) as f32
    }

    #[test]
    fn test_none_is_identity() {
        let mut img = swatch();
        apply_recipe(&mut img, FilterKind::None.strip_recipe());
        assert_eq!(img, swatch());
    }

    #[test]
    fn test_grayscale_equalizes_channels() {
        let mut img = swatch();
        apply_recipe(&mut img, FilterKind::Grayscale.strip_recipe());
        for p in img.pixels() {
            assert!(p[0].abs_diff(p[1]) <= 1 && p[1].abs_diff(p[2]) <= 1);
        }
    }

    #[test]
    fn test_every_filter_alters_saturation_or_luminance() {
        let original = swatch();
        for filter in FilterKind::ALL.into_iter().filter(|f| *f != FilterKind::None) {
            for recipe in [filter.strip_recipe(), filter.preview_recipe()] {
                let mut img = swatch();
                apply_recipe(&mut img, recipe);
                let d_sat = (mean_saturation(&img) - mean_saturation(&original)).abs();
                let d_luma = (mean_luma(&img) - mean_luma(&original)).abs();
                assert!(d_sat > 1.0 || d_luma > 1.0, "{filter} left the image unchanged");
            }
        }
    }

    #[test]
    fn test_sepia_warms_neutral_gray() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([128, 128, 128]));
        apply_recipe(&mut img, &[FilterStep::Sepia(1.0)]);
        let p = img.get_pixel(0, 0);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let mut img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([40, 40, 40]),
            1 => Rgb([128, 128, 128]),
            _ => Rgb([220, 220, 220]),
        });
        apply_recipe(&mut img, &[FilterStep::Contrast(1.5)]);
        assert!(img.get_pixel(0, 0)[0] < 40);
        assert!(img.get_pixel(1, 0)[0].abs_diff(128) <= 1);
        assert_eq!(img.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn test_brightness_scales_and_clamps() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([100, 200, 250]));
        apply_recipe(&mut img, &[FilterStep::Brightness(1.1)]);
        assert_eq!(img.get_pixel(0, 0).0, [110, 220, 255]);
    }

    #[test]
    fn test_zero_hue_rotation_is_near_identity() {
        let mut img = swatch();
        apply_recipe(&mut img, &[FilterStep::HueRotate(0.0)]);
        for (a, b) in img.pixels().zip(swatch().pixels()) {
            for c in 0..3 {
                assert!(a[c].abs_diff(b[c]) <= 1);
            }
        }
    }
}
