//! Photobooth Capture Engine
//!
//! Drives a timed capture run: countdown, shutter, shot bookkeeping. The
//! engine pulls stills from a [`SnapshotSource`] and hands the collected
//! frames off to the render engine once the run completes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                CaptureSession                │
//! │  layout · filter · theme · progress (watch)  │
//! │                      │                       │
//! │                      ▼                       │
//! │  ┌───────────┐   ┌────────────────────────┐  │
//! │  │ Sequencer │──▶│ SnapshotSource         │  │
//! │  │ countdown │   │ stills · synthetic     │  │
//! │  └─────┬─────┘   └────────────────────────┘  │
//! │        ▼                                     │
//! │  SequencerEvent stream ── CaptureHandoff ──▶ │
//! └──────────────────────────────────────────────┘
//! ```

pub mod sequencer;
pub mod session;
pub mod source;

pub use sequencer::*;
pub use session::*;
pub use source::{open_source, DropCaptures, SnapshotSource, SourceKind, StillsSource, SyntheticSource};
