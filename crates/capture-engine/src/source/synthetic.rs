//! Synthetic camera producing test patterns.
//!
//! Each capture is a JPEG of the viewport class's capture resolution with
//! a "face" marker whose hue shifts per capture, so strips built from it
//! show capture order at a glance.

use std::sync::atomic::{AtomicU32, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use photobooth_model::ViewportClass;

use super::SnapshotSource;

/// Marker colors cycled per capture.
const MARKER_COLORS: [Rgb<u8>; 4] = [
    Rgb([230, 80, 70]),
    Rgb([70, 180, 90]),
    Rgb([60, 110, 220]),
    Rgb([235, 190, 60]),
];

pub struct SyntheticSource {
    width: u32,
    height: u32,
    captures: AtomicU32,
}

impl SyntheticSource {
    pub fn new(viewport: ViewportClass) -> Self {
        let (width, height) = viewport.capture_constraints();
        Self::with_size(width, height)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width: width.max(8),
            height: height.max(8),
            captures: AtomicU32::new(0),
        }
    }

    /// Render the pattern for the `n`-th capture (0-based).
    pub fn render_pattern(&self, n: u32) -> RgbImage {
        let (w, h) = (self.width, self.height);
        let mut img = ImageBuffer::from_fn(w, h, |_, y| {
            let shade = 60 + (y * 80 / h) as u8;
            Rgb([shade, shade, shade.saturating_add(10)])
        });

        let marker = MARKER_COLORS[n as usize % MARKER_COLORS.len()];
        let radius = (w.min(h) / 4) as i32;
        draw_filled_circle_mut(&mut img, ((w / 2) as i32, (h * 2 / 5) as i32), radius, marker);

        // Shoulders.
        draw_filled_circle_mut(
            &mut img,
            ((w / 2) as i32, h as i32 + radius / 2),
            radius * 2,
            Rgb([35, 35, 45]),
        );

        img
    }
}

impl SnapshotSource for SyntheticSource {
    fn capture_frame(&self) -> Option<Vec<u8>> {
        let n = self.captures.fetch_add(1, Ordering::SeqCst);
        let img = self.render_pattern(n);

        let mut bytes = Vec::new();
        let encoded = JpegEncoder::new_with_quality(&mut bytes, 90).encode_image(&img);
        match encoded {
            Ok(()) => Some(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Synthetic frame encoding failed");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
