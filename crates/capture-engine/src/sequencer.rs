//! Countdown-then-shoot loop.
//!
//! For each shot the sequencer counts down, fires the shutter against the
//! snapshot source, and pauses so the subject can reset their pose. Every
//! observable step is reported through an event callback; the collected
//! frames are returned once the whole run (including the handoff delay)
//! has elapsed.
//!
//! ```text
//!  shot i:  3 ──1s── 2 ──1s── 1 ──1s── 0 (flash + capture)
//!                                       │
//!             more shots? ──yes── hold 1s ── clear ── hold 0.5s ── shot i+1
//!                         └─no─── clear ── finished ── hold 0.5s ── handoff
//! ```

use std::sync::Arc;
use std::time::Duration;

use photobooth_common::clock::SessionClock;
use photobooth_common::config::PacingConfig;
use photobooth_model::{LayoutCount, RawFrame};
use serde::Serialize;

use crate::source::SnapshotSource;

/// Sequencer timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// First countdown value (counts down to 1, then 0 fires the shutter).
    pub countdown_from: u8,
    pub tick: Duration,
    pub flash_hold: Duration,
    pub reset_hold: Duration,
    pub handoff_delay: Duration,
}

impl Pacing {
    /// Zero-length pauses. For driving the sequencer as fast as possible.
    pub fn instant() -> Self {
        Self {
            countdown_from: 3,
            tick: Duration::ZERO,
            flash_hold: Duration::ZERO,
            reset_hold: Duration::ZERO,
            handoff_delay: Duration::ZERO,
        }
    }

    /// Wall time a full run takes for `layout` shots.
    pub fn run_duration(&self, layout: LayoutCount) -> Duration {
        let shots = layout.get() as u32;
        self.tick * self.countdown_from as u32 * shots
            + (self.flash_hold + self.reset_hold) * (shots - 1)
            + self.handoff_delay
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from(&PacingConfig::default())
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(config: &PacingConfig) -> Self {
        Self {
            countdown_from: config.countdown_from.max(1),
            tick: Duration::from_millis(config.tick_ms),
            flash_hold: Duration::from_millis(config.flash_hold_ms),
            reset_hold: Duration::from_millis(config.reset_hold_ms),
            handoff_delay: Duration::from_millis(config.handoff_delay_ms),
        }
    }
}

/// Observable step of a capture run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SequencerEvent {
    /// The run began; controls must be disabled until `Finished`.
    Started { layout: LayoutCount },

    /// Countdown display changed. `Some(0)` is the flash at the capture
    /// moment; `None` clears the display.
    Countdown { shot: u8, value: Option<u8> },

    /// The source produced a frame for `shot`.
    ShotCaptured { shot: u8, shots_taken: u8 },

    /// The source had no frame for `shot`; the shot is skipped, not retried.
    ShotMissed { shot: u8 },

    /// All shots attempted; controls may be re-enabled. Frames are handed
    /// off after the handoff delay.
    Finished { frames: u8, missed: Vec<u8> },
}

/// Frames collected by one run, in capture order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceOutcome {
    pub frames: Vec<RawFrame>,
    pub missed_shots: Vec<u8>,
}

/// Drives shots against a snapshot source.
pub struct Sequencer {
    source: Arc<dyn SnapshotSource>,
    pacing: Pacing,
}

impl Sequencer {
    pub fn new(source: Arc<dyn SnapshotSource>, pacing: Pacing) -> Self {
        Self { source, pacing }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Run `layout` shots, reporting every step to `emit`.
    ///
    /// Shots are strictly sequential: shot `i + 1` never starts counting
    /// down before shot `i` has resolved. A missing frame skips the shot.
    pub async fn run<F>(&self, layout: LayoutCount, mut emit: F) -> SequenceOutcome
    where
        F: FnMut(SequencerEvent) + Send,
    {
        let shots = layout.get();
        let clock = SessionClock::start_at(tokio::time::Instant::now().into_std());
        let mut outcome = SequenceOutcome {
            frames: Vec::with_capacity(layout.len()),
            missed_shots: Vec::new(),
        };

        tracing::info!(
            layout = shots,
            source = self.source.name(),
            "Starting capture sequence"
        );
        emit(SequencerEvent::Started { layout });

        for shot in 1..=shots {
            for value in (1..=self.pacing.countdown_from).rev() {
                emit(SequencerEvent::Countdown {
                    shot,
                    value: Some(value),
                });
                tokio::time::sleep(self.pacing.tick).await;
            }

            emit(SequencerEvent::Countdown {
                shot,
                value: Some(0),
            });
            match self.source.capture_frame() {
                Some(bytes) => {
                    let captured_at = clock.offset_at(tokio::time::Instant::now().into_std());
                    let frame = RawFrame::new(shot, captured_at, bytes);
                    tracing::debug!(shot, bytes = frame.len(), ?captured_at, "Shot captured");
                    outcome.frames.push(frame);
                    let shots_taken = outcome.frames.len() as u8;
                    emit(SequencerEvent::ShotCaptured { shot, shots_taken });
                }
                None => {
                    tracing::warn!(
                        shot,
                        source = self.source.name(),
                        "No frame from source, shot skipped"
                    );
                    outcome.missed_shots.push(shot);
                    emit(SequencerEvent::ShotMissed { shot });
                }
            }

            if shot < shots {
                tokio::time::sleep(self.pacing.flash_hold).await;
                emit(SequencerEvent::Countdown { shot, value: None });
                tokio::time::sleep(self.pacing.reset_hold).await;
            }
        }

        emit(SequencerEvent::Countdown {
            shot: shots,
            value: None,
        });
        emit(SequencerEvent::Finished {
            frames: outcome.frames.len() as u8,
            missed: outcome.missed_shots.clone(),
        });
        tracing::info!(
            frames = outcome.frames.len(),
            missed = outcome.missed_shots.len(),
            "Capture sequence finished"
        );

        tokio::time::sleep(self.pacing.handoff_delay).await;
        outcome
    }
}
