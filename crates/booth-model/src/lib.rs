//! Photobooth Model
//!
//! Defines the core data contracts shared by the capture sequencer and the
//! photostrip compositor:
//! - **Layout:** photo count per strip and the coarse viewport width class
//! - **Style:** filter kinds and strip themes, with their fixed lookup tables
//! - **Frame:** raw captured frames and the completed-capture handoff
//! - **Geometry:** strip dimensions, photo cells, and footer caption placement
//!
//! Every enumeration here is closed; lookups are plain `match` tables so
//! adding a variant is a compile error until every table handles it.

pub mod frame;
pub mod geometry;
pub mod layout;
pub mod style;

pub use frame::*;
pub use geometry::*;
pub use layout::*;
pub use style::*;

/// Errors raised when parsing model values from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Unsupported layout: {0} photos (expected 2, 3 or 4)")]
    InvalidLayout(u32),

    #[error("Unknown filter: {0} (expected none, grayscale, sepia, soft or vintage)")]
    UnknownFilter(String),

    #[error("Unknown strip theme: {0} (expected white, black or gray)")]
    UnknownTheme(String),

    #[error("Unknown viewport class: {0} (expected narrow, medium or wide)")]
    UnknownViewport(String),

    #[error("Frame has no area: {width}x{height}")]
    DegenerateFrame { width: u32, height: u32 },
}
