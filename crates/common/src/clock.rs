//! Clock utilities for capture sessions and caption timestamps.
//!
//! A capture session is anchored to a monotonic epoch recorded when the
//! sequence starts. Every captured frame carries its offset from that
//! epoch. Wall-clock time only enters through [`WallClock`], which the
//! compositor consults once per compose call for the footer caption.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Local};

/// A session clock that provides monotonic offsets relative to
/// a fixed epoch (the moment the capture sequence started).
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,
}

impl SessionClock {
    /// Create a clock anchored to a known instant.
    ///
    /// Async callers pass `tokio::time::Instant::now().into_std()` so that
    /// offsets follow the runtime clock, including paused test time.
    pub fn start_at(epoch: Instant) -> Self {
        Self { epoch }
    }

    /// Offset of `now` from the epoch. Instants before the epoch saturate to zero.
    pub fn offset_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.epoch)
    }
}

/// Source of wall-clock time for captions and file names.
pub trait WallClock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant. Makes compose output reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedWallClock(pub DateTime<FixedOffset>);

impl WallClock for FixedWallClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
