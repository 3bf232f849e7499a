//! Photostrip geometry.
//!
//! Everything here is a pure function of the layout, the viewport class and
//! the first frame's aspect ratio. All photos are assumed to share that
//! aspect ratio; later frames are scaled into the same cell size.

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutCount, ViewportClass};
use crate::ModelError;

/// Placement of one photo on the strip, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    /// Center pixel of the cell.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Font sizes and anchors for the footer band.
///
/// Baselines are alphabetic baselines; `center_x` is where each caption is
/// horizontally centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FooterMetrics {
    pub center_x: f32,
    pub title_px: f32,
    pub title_spacing: f32,
    pub title_baseline: f32,
    pub meta_px: f32,
    pub meta_spacing: f32,
    pub meta_baseline: f32,
    pub watermark_px: f32,
    pub watermark_center_x: f32,
    pub watermark_baseline: f32,
    pub watermark_alpha: f32,
}

/// Size and placement of everything on a photostrip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripGeometry {
    pub layout: LayoutCount,
    pub viewport: ViewportClass,
    pub photo_width: u32,
    pub photo_height: u32,
    pub padding: u32,
    pub footer_height: u32,
    pub width: u32,
    pub height: u32,
}

impl StripGeometry {
    /// Compute strip geometry from the first frame's natural size.
    pub fn compute(
        layout: LayoutCount,
        viewport: ViewportClass,
        first_width: u32,
        first_height: u32,
    ) -> Result<Self, ModelError> {
        if first_width == 0 || first_height == 0 {
            return Err(ModelError::DegenerateFrame {
                width: first_width,
                height: first_height,
            });
        }

        let narrow = viewport.is_narrow();
        let photo_width: u32 = if narrow { 300 } else { 400 };
        let padding: u32 = if narrow { 16 } else { 24 };
        let footer_height: u32 = if narrow { 100 } else { 140 };

        let aspect = first_height as f64 / first_width as f64;
        let photo_height = ((photo_width as f64 * aspect).round() as u32).max(1);

        let n = layout.get() as u32;
        Ok(Self {
            layout,
            viewport,
            photo_width,
            photo_height,
            padding,
            footer_height,
            width: photo_width + padding * 2,
            height: padding * (n + 1) + photo_height * n + footer_height,
        })
    }

    /// Cell of the `index`-th photo (0-based, capture order).
    pub fn cell(&self, index: usize) -> CellRect {
        let index = index as u32;
        CellRect {
            x: self.padding,
            y: self.padding + index * (self.photo_height + self.padding),
            width: self.photo_width,
            height: self.photo_height,
        }
    }

    /// Every photo cell, top to bottom.
    pub fn cells(&self) -> Vec<CellRect> {
        (0..self.layout.len()).map(|i| self.cell(i)).collect()
    }

    /// First row of the footer band.
    pub fn footer_top(&self) -> u32 {
        self.height - self.footer_height
    }

    /// Caption sizes and anchors for this strip.
    pub fn footer_metrics(&self) -> FooterMetrics {
        let narrow = self.viewport.is_narrow();
        let line_gap = if narrow { 20.0 } else { 30.0 };
        let title_baseline = self.footer_top() as f32 + line_gap;

        FooterMetrics {
            center_x: self.width as f32 / 2.0,
            title_px: if narrow { 18.0 } else { 24.0 },
            title_spacing: 4.0,
            title_baseline,
            meta_px: if narrow { 12.0 } else { 16.0 },
            meta_spacing: 2.0,
            meta_baseline: title_baseline + line_gap,
            watermark_px: 10.0,
            watermark_center_x: self.width as f32 - 60.0,
            watermark_baseline: self.height as f32 - 15.0,
            watermark_alpha: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wide_four_up_from_4_3_frames() {
        let g = StripGeometry::compute(LayoutCount::FOUR, ViewportClass::Wide, 640, 480).unwrap();
        assert_eq!(g.photo_width, 400);
        assert_eq!(g.photo_height, 300);
        assert_eq!(g.width, 448);
        assert_eq!(g.height, 24 * 5 + 300 * 4 + 140);
    }

    #[test]
    fn test_narrow_uses_compact_tier() {
        let g = StripGeometry::compute(LayoutCount::TWO, ViewportClass::Narrow, 480, 640).unwrap();
        assert_eq!(g.photo_width, 300);
        assert_eq!(g.photo_height, 400);
        assert_eq!(g.padding, 16);
        assert_eq!(g.footer_height, 100);
        assert_eq!(g.width, 332);
    }

    #[test]
    fn test_medium_shares_the_wide_tier() {
        let medium =
            StripGeometry::compute(LayoutCount::THREE, ViewportClass::Medium, 600, 800).unwrap();
        let wide = StripGeometry::compute(LayoutCount::THREE, ViewportClass::Wide, 600, 800).unwrap();
        assert_eq!(medium.width, wide.width);
        assert_eq!(medium.height, wide.height);
    }

    #[test]
    fn test_cells_stack_with_padding() {
        let g = StripGeometry::compute(LayoutCount::THREE, ViewportClass::Wide, 400, 300).unwrap();
        let cells = g.cells();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], CellRect { x: 24, y: 24, width: 400, height: 300 });
        assert_eq!(cells[1].y, 24 + 300 + 24);
        assert_eq!(cells[2].y + cells[2].height + g.padding, g.footer_top());
    }

    #[test]
    fn test_footer_metrics_wide() {
        let g = StripGeometry::compute(LayoutCount::TWO, ViewportClass::Wide, 400, 300).unwrap();
        let m = g.footer_metrics();
        assert_eq!(m.center_x, 224.0);
        assert_eq!(m.title_baseline, g.footer_top() as f32 + 30.0);
        assert_eq!(m.meta_baseline, m.title_baseline + 30.0);
        assert_eq!(m.watermark_center_x, g.width as f32 - 60.0);
        assert_eq!(m.watermark_baseline, g.height as f32 - 15.0);
    }

    #[test]
    fn test_degenerate_frame_is_rejected() {
        assert_eq!(
            StripGeometry::compute(LayoutCount::TWO, ViewportClass::Wide, 0, 480),
            Err(ModelError::DegenerateFrame { width: 0, height: 480 })
        );
    }

    fn layout_strategy() -> impl Strategy<Value = LayoutCount> {
        prop::sample::select(LayoutCount::ALL.to_vec())
    }

    fn viewport_strategy() -> impl Strategy<Value = ViewportClass> {
        prop::sample::select(ViewportClass::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_strip_height_formula_holds(
            layout in layout_strategy(),
            viewport in viewport_strategy(),
            w in 16u32..4000,
            h in 16u32..4000,
        ) {
            let g = StripGeometry::compute(layout, viewport, w, h).unwrap();
            let n = layout.get() as u32;
            prop_assert_eq!(g.height, g.padding * (n + 1) + g.photo_height * n + g.footer_height);
            prop_assert_eq!(g.width, g.photo_width + 2 * g.padding);
        }

        #[test]
        fn prop_cells_stay_inside_photo_area(
            layout in layout_strategy(),
            viewport in viewport_strategy(),
            w in 16u32..4000,
            h in 16u32..4000,
        ) {
            let g = StripGeometry::compute(layout, viewport, w, h).unwrap();
            for cell in g.cells() {
                prop_assert!(cell.x + cell.width <= g.width - g.padding);
                prop_assert!(cell.y + cell.height <= g.footer_top() - g.padding);
            }
        }
    }
}
