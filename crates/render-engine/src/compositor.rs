//! Photostrip compositor.
//!
//! Stacks the captured frames into one vertical strip: themed background,
//! filtered photos in capture order, footer captions, then JPEG encode.
//! Image work runs on the blocking pool; a compose call either delivers one
//! complete strip or fails as a whole.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use photobooth_common::clock::{SystemWallClock, WallClock};
use photobooth_common::config::StripConfig;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{
    CaptureHandoff, FilterKind, LayoutCount, RawFrame, StripGeometry, StripTheme, ViewportClass,
};

use crate::export::{encode_jpeg, PhotoStrip};
use crate::filters::apply_recipe;
use crate::footer::{draw_caption, footer_captions, CaptionFont, CaptionLayout};

/// Per-call compose inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComposeOptions {
    pub filter: FilterKind,
    pub theme: StripTheme,
    pub layout: LayoutCount,
    /// Viewport class at the moment compose was requested.
    pub viewport: ViewportClass,
}

/// Renders photostrips.
pub struct Compositor {
    strip: StripConfig,
    font: Option<CaptionFont>,
    clock: Arc<dyn WallClock>,
}

impl Compositor {
    /// Create a compositor, loading the caption font from `strip.font_path`
    /// or the system fallbacks.
    pub fn new(strip: StripConfig) -> Self {
        let font = CaptionFont::find(strip.font_path.as_deref());
        Self {
            strip,
            font,
            clock: Arc::new(SystemWallClock),
        }
    }

    /// Replace the wall clock used for the caption timestamp.
    pub fn with_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the caption font. `None` disables glyph drawing.
    pub fn with_font(mut self, font: Option<CaptionFont>) -> Self {
        self.font = font;
        self
    }

    pub fn font(&self) -> Option<&CaptionFont> {
        self.font.as_ref()
    }

    pub fn strip_config(&self) -> &StripConfig {
        &self.strip
    }

    /// Compose the frames of a finished capture run.
    pub async fn compose_handoff(
        &self,
        handoff: &CaptureHandoff,
        viewport: ViewportClass,
    ) -> BoothResult<PhotoStrip> {
        let options = ComposeOptions {
            filter: handoff.filter,
            theme: handoff.theme,
            layout: handoff.layout,
            viewport,
        };
        self.compose(&handoff.frames, options).await
    }

    /// Compose `frames` into a photostrip.
    ///
    /// Fewer frames than `options.layout` leaves the trailing cells empty.
    pub async fn compose(
        &self,
        frames: &[RawFrame],
        options: ComposeOptions,
    ) -> BoothResult<PhotoStrip> {
        if frames.is_empty() {
            return Err(BoothError::compose("No frames to compose"));
        }
        if frames.len() > options.layout.len() {
            return Err(BoothError::compose(format!(
                "{} frames do not fit a {}-photo layout",
                frames.len(),
                options.layout
            )));
        }

        let captured_at = self.clock.now();
        tracing::info!(
            frames = frames.len(),
            layout = %options.layout,
            filter = %options.filter,
            theme = %options.theme,
            viewport = %options.viewport,
            "Composing photostrip"
        );

        let photos = decode_all(frames).await?;
        let first = &photos[0];
        let geometry =
            StripGeometry::compute(options.layout, options.viewport, first.width(), first.height())
                .map_err(|e| BoothError::compose(e.to_string()))?;
        let captions = footer_captions(&geometry, options.theme, &self.strip, &captured_at);

        let font = self.font.clone();
        let quality = self.strip.jpeg_quality;
        let render_captions = captions.clone();
        let (raster, jpeg) = tokio::task::spawn_blocking(move || {
            let raster = render_strip(
                &geometry,
                &photos,
                options.filter,
                options.theme,
                &render_captions,
                font.as_ref(),
            );
            let jpeg = encode_jpeg(&raster, quality)?;
            Ok::<_, BoothError>((raster, jpeg))
        })
        .await
        .map_err(|e| BoothError::encode(format!("Render task failed: {e}")))??;

        tracing::info!(
            width = geometry.width,
            height = geometry.height,
            bytes = jpeg.len(),
            "Photostrip composed"
        );
        Ok(PhotoStrip::new(
            geometry,
            options.filter,
            options.theme,
            raster,
            captions,
            captured_at,
            self.font.is_some(),
            jpeg,
        ))
    }
}

/// Decode every frame concurrently. The first failure, in shot order, wins.
async fn decode_all(frames: &[RawFrame]) -> BoothResult<Vec<RgbImage>> {
    let tasks: Vec<_> = frames
        .iter()
        .map(|frame| {
            let shot = frame.shot;
            if frame.is_empty() {
                return Err(BoothError::decode(shot, "Frame has no data"));
            }
            let bytes = frame.bytes.clone();
            let task = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes));
            Ok((shot, task))
        })
        .collect::<BoothResult<_>>()?;

    let mut photos = Vec::with_capacity(tasks.len());
    for (shot, task) in tasks {
        let decoded = task
            .await
            .map_err(|e| BoothError::decode(shot, e.to_string()))?
            .map_err(|e| {
                tracing::error!(shot, error = %e, "Frame decode failed");
                BoothError::decode(shot, e.to_string())
            })?;
        photos.push(decoded.to_rgb8());
    }
    Ok(photos)
}

/// Draw a strip synchronously. Deterministic for identical inputs.
pub fn render_strip(
    geometry: &StripGeometry,
    photos: &[RgbImage],
    filter: FilterKind,
    theme: StripTheme,
    captions: &[CaptionLayout],
    font: Option<&CaptionFont>,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(geometry.width, geometry.height, Rgb(theme.background().0));
    let recipe = filter.strip_recipe();

    for (index, photo) in photos.iter().enumerate().take(geometry.layout.len()) {
        let cell = geometry.cell(index);
        let mut fitted = imageops::resize(photo, cell.width, cell.height, FilterType::Triangle);
        apply_recipe(&mut fitted, recipe);
        imageops::replace(&mut canvas, &fitted, cell.x as i64, cell.y as i64);
    }

    if let Some(font) = font {
        for caption in captions {
            draw_caption(&mut canvas, font, caption);
        }
    }
    canvas
}
