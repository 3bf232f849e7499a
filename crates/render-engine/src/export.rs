//! Finished photostrips: JPEG encoding, retrieval and saving.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{FilterKind, StripGeometry, StripTheme};

use crate::footer::CaptionLayout;

/// A composed photostrip.
///
/// The JPEG bytes are produced once at compose time; reading them never
/// re-renders.
#[derive(Debug, Clone)]
pub struct PhotoStrip {
    pub geometry: StripGeometry,
    pub filter: FilterKind,
    pub theme: StripTheme,
    /// Decoded canvas the JPEG was encoded from.
    pub raster: RgbImage,
    pub captions: Vec<CaptionLayout>,
    /// Wall-clock time printed on the strip.
    pub captured_at: DateTime<FixedOffset>,
    /// Whether caption glyphs were drawn.
    pub captions_drawn: bool,
    jpeg: Vec<u8>,
}

impl PhotoStrip {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        geometry: StripGeometry,
        filter: FilterKind,
        theme: StripTheme,
        raster: RgbImage,
        captions: Vec<CaptionLayout>,
        captured_at: DateTime<FixedOffset>,
        captions_drawn: bool,
        jpeg: Vec<u8>,
    ) -> Self {
        Self {
            geometry,
            filter,
            theme,
            raster,
            captions,
            captured_at,
            captions_drawn,
            jpeg,
        }
    }

    /// Encoded JPEG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.jpeg
    }

    /// Suggested file name for downloading this strip.
    pub fn file_name(&self) -> String {
        download_filename(&self.captured_at)
    }

    /// Write the JPEG to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> BoothResult<()> {
        let path = path.as_ref();
        let is_jpeg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
        if !is_jpeg {
            return Err(BoothError::unsupported(format!(
                "Photostrips are JPEG; cannot save as {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.jpeg)?;
        tracing::info!(
            path = %path.display(),
            bytes = self.jpeg.len(),
            "Photostrip saved"
        );
        Ok(())
    }

    /// Save into `dir` under the download file name. An existing file is
    /// never overwritten; a numeric suffix is added instead.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> BoothResult<PathBuf> {
        let path = unique_path(dir.as_ref(), &self.file_name());
        self.save(&path)?;
        Ok(path)
    }
}

/// `photobooth-YYYY-MM-DD.jpg`
pub fn download_filename(at: &DateTime<FixedOffset>) -> String {
    format!("photobooth-{}.jpg", at.format("%Y-%m-%d"))
}

/// Encode an RGB canvas as baseline JPEG.
pub fn encode_jpeg(canvas: &RgbImage, quality: u8) -> BoothResult<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(canvas)
        .map_err(|e| BoothError::encode(e.to_string()))?;
    Ok(bytes)
}

fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let stem = file_name.trim_end_matches(".jpg");
    (1u32..)
        .map(|n| dir.join(format!("{stem}-{n}.jpg")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgb;

    #[test]
    fn test_download_filename() {
        let at = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 9, 23, 10, 0)
            .unwrap();
        assert_eq!(download_filename(&at), "photobooth-2026-03-09.jpg");
    }

    #[test]
    fn test_encode_jpeg_produces_decodable_image() {
        let canvas = RgbImage::from_pixel(40, 20, Rgb([10, 200, 30]));
        let bytes = encode_jpeg(&canvas, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn test_save_rejects_non_jpeg_paths() {
        let canvas = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let geometry = StripGeometry::compute(
            photobooth_model::LayoutCount::TWO,
            photobooth_model::ViewportClass::Wide,
            4,
            4,
        )
        .unwrap();
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .unwrap();
        let jpeg = encode_jpeg(&canvas, 90).unwrap();
        let strip = PhotoStrip::new(
            geometry,
            FilterKind::None,
            StripTheme::White,
            canvas,
            Vec::new(),
            at,
            false,
            jpeg,
        );
        let err = strip.save("/tmp/strip.png").unwrap_err();
        assert!(matches!(err, BoothError::Unsupported { .. }));
    }

    #[test]
    fn test_unique_path_adds_suffix() {
        let dir = std::env::temp_dir().join(format!("photobooth-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = unique_path(&dir, "photobooth-2026-01-01.jpg");
        std::fs::write(&first, b"x").unwrap();
        let second = unique_path(&dir, "photobooth-2026-01-01.jpg");
        assert_eq!(second, dir.join("photobooth-2026-01-01-1.jpg"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
