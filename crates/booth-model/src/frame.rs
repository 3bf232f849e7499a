//! Captured frames and the completed-capture handoff.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::LayoutCount;
use crate::style::{FilterKind, StripTheme};

/// One encoded still produced by the snapshot source.
///
/// The payload is opaque to the sequencer; only the compositor decodes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// 1-based shot index this frame was captured for.
    pub shot: u8,

    /// Offset from the start of the capture sequence.
    pub captured_at: Duration,

    /// Encoded image bytes (JPEG from cameras, anything `image` decodes).
    pub bytes: Arc<[u8]>,
}

impl RawFrame {
    pub fn new(shot: u8, captured_at: Duration, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            shot,
            captured_at,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A finished capture run, ready for compositing.
///
/// Frames are in capture order. When the source failed on a shot the frame
/// is absent and its index is listed in `missed_shots`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureHandoff {
    pub layout: LayoutCount,
    pub filter: FilterKind,
    pub theme: StripTheme,
    pub frames: Arc<[RawFrame]>,
    pub missed_shots: Vec<u8>,
}

impl CaptureHandoff {
    /// Whether every requested shot produced a frame.
    pub fn is_complete(&self) -> bool {
        self.missed_shots.is_empty() && self.frames.len() == self.layout.len()
    }

    /// Summary used in logs and the CLI.
    pub fn summary(&self) -> HandoffSummary {
        HandoffSummary {
            layout: self.layout,
            filter: self.filter,
            theme: self.theme,
            frames: self.frames.len(),
            missed_shots: self.missed_shots.clone(),
        }
    }
}

/// Serializable description of a handoff without the image payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffSummary {
    pub layout: LayoutCount,
    pub filter: FilterKind,
    pub theme: StripTheme,
    pub frames: usize,
    pub missed_shots: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(shot: u8) -> RawFrame {
        RawFrame::new(shot, Duration::from_secs(shot as u64 * 4), vec![0xff, 0xd8])
    }

    #[test]
    fn test_complete_handoff() {
        let handoff = CaptureHandoff {
            layout: LayoutCount::TWO,
            filter: FilterKind::Sepia,
            theme: StripTheme::Gray,
            frames: vec![frame(1), frame(2)].into(),
            missed_shots: vec![],
        };
        assert!(handoff.is_complete());
    }

    #[test]
    fn test_handoff_with_missed_shot_is_incomplete() {
        let handoff = CaptureHandoff {
            layout: LayoutCount::THREE,
            filter: FilterKind::None,
            theme: StripTheme::White,
            frames: vec![frame(1), frame(3)].into(),
            missed_shots: vec![2],
        };
        assert!(!handoff.is_complete());

        let summary = serde_json::to_value(handoff.summary()).unwrap();
        assert_eq!(summary["frames"], 2);
        assert_eq!(summary["layout"], 3);
        assert_eq!(summary["filter"], "none");
        assert_eq!(summary["missed_shots"][0], 2);
    }
}
