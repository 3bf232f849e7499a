//! Live viewfinder look and the info tags shown beside it.

use image::imageops;
use image::{Rgb, RgbImage};
use photobooth_common::error::BoothResult;
use photobooth_model::{BadgeColors, FilterKind, LayoutCount, StripTheme, ViewportClass};
use serde::Serialize;

use crate::filters::apply_recipe;

/// Border width around the viewfinder for a viewport class.
pub fn border_width(viewport: ViewportClass) -> u32 {
    match viewport {
        ViewportClass::Narrow => 4,
        ViewportClass::Medium => 6,
        ViewportClass::Wide => 8,
    }
}

/// Render the viewfinder look of one frame: preview filter, mirrored, with
/// the theme border.
pub fn render_viewfinder(
    frame: &RgbImage,
    filter: FilterKind,
    theme: StripTheme,
    viewport: ViewportClass,
) -> RgbImage {
    let mut view = imageops::flip_horizontal(frame);
    apply_recipe(&mut view, filter.preview_recipe());

    let border = border_width(viewport);
    let mut framed = RgbImage::from_pixel(
        view.width() + border * 2,
        view.height() + border * 2,
        Rgb(theme.preview_border().0),
    );
    imageops::replace(&mut framed, &view, border as i64, border as i64);
    framed
}

/// Decode encoded frame bytes and render their viewfinder look.
pub fn render_viewfinder_bytes(
    bytes: &[u8],
    filter: FilterKind,
    theme: StripTheme,
    viewport: ViewportClass,
) -> BoothResult<RgbImage> {
    let frame = image::load_from_memory(bytes)?.to_rgb8();
    Ok(render_viewfinder(&frame, filter, theme, viewport))
}

/// Labels describing the current selections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoTags {
    pub layout: String,
    pub filter: String,
    pub theme: String,
    pub badge: BadgeColors,
}

pub fn info_tags(layout: LayoutCount, filter: FilterKind, theme: StripTheme) -> InfoTags {
    InfoTags {
        layout: layout.label(),
        filter: filter.tag(),
        theme: theme.tag(),
        badge: theme.badge_colors(),
    }
}
