//! Photobooth Render Engine
//!
//! Turns the frames of a capture run into a finished photostrip and renders
//! the viewfinder look of live frames.
//!
//! # Pipeline
//!
//! ```text
//! RawFrame bytes ──▶ decode (blocking pool, concurrent)
//!                           │
//!                           ▼
//!        StripGeometry ──▶ background ──▶ resize + filter ──▶ cells
//!                                                              │
//!        footer captions (title · timestamp · watermark) ◀─────┘
//!                           │
//!                           ▼
//!                     JPEG encode ──▶ PhotoStrip
//! ```

pub mod compositor;
pub mod export;
pub mod filters;
pub mod footer;
pub mod viewfinder;

pub use compositor::*;
pub use export::*;
pub use footer::{CaptionFont, CaptionLayout};
pub use viewfinder::*;
