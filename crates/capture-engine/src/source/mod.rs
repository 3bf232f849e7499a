//! Snapshot sources: the one capability the booth needs from a camera.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use photobooth_common::error::BoothResult;
use photobooth_model::ViewportClass;

pub mod stills;
pub mod synthetic;

pub use stills::StillsSource;
pub use synthetic::SyntheticSource;

/// Produces a still of the current camera frame on demand.
///
/// `capture_frame` must not block: it returns the most recent frame the
/// stream has, or `None` when the stream is unavailable (device not ready,
/// permission revoked). The sequencer treats `None` as a missed shot.
pub trait SnapshotSource: Send + Sync {
    /// Encoded bytes of the current frame, or `None` if the stream is down.
    fn capture_frame(&self) -> Option<Vec<u8>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Which source to open.
#[derive(Debug, Clone)]
pub enum SourceKind {
    /// Cycle through the images in a directory.
    Stills { dir: PathBuf },
    /// Generated test patterns sized for the viewport class.
    Synthetic { viewport: ViewportClass },
}

/// Open a snapshot source.
pub fn open_source(kind: &SourceKind) -> BoothResult<Arc<dyn SnapshotSource>> {
    let source: Arc<dyn SnapshotSource> = match kind {
        SourceKind::Stills { dir } => Arc::new(StillsSource::from_dir(dir)?),
        SourceKind::Synthetic { viewport } => Arc::new(SyntheticSource::new(*viewport)),
    };
    tracing::info!(source = source.name(), "Opened snapshot source");
    Ok(source)
}

/// Wraps a source and drops the frames of chosen captures.
///
/// Models a stream that is momentarily unavailable. Capture attempts are
/// counted from 1, matching shot indices of a single run.
pub struct DropCaptures<S> {
    inner: S,
    drop_attempts: Vec<u32>,
    attempts: AtomicU32,
}

impl<S: SnapshotSource> DropCaptures<S> {
    pub fn new(inner: S, drop_attempts: impl IntoIterator<Item = u32>) -> Self {
        Self {
            inner,
            drop_attempts: drop_attempts.into_iter().collect(),
            attempts: AtomicU32::new(0),
        }
    }

    /// Capture attempts seen so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl<S: SnapshotSource> SnapshotSource for DropCaptures<S> {
    fn capture_frame(&self) -> Option<Vec<u8>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.drop_attempts.contains(&attempt) {
            return None;
        }
        self.inner.capture_frame()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
