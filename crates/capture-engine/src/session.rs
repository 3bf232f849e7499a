//! Capture session management.
//!
//! A [`CaptureSession`] owns one booth session: the layout, filter and
//! theme selections, the snapshot source, and at most one running capture
//! sequence. The sequence runs as a spawned task whose handle the session
//! keeps; tearing the session down aborts that task, which releases every
//! pending timer and guarantees nothing more is delivered.

use std::sync::{Arc, Mutex, MutexGuard};

use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{CaptureHandoff, FilterKind, LayoutCount, RawFrame, StripTheme};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::sequencer::{Pacing, SequenceOutcome, Sequencer, SequencerEvent};
use crate::source::SnapshotSource;

/// Configuration for a capture session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    /// Photos per strip.
    pub layout: LayoutCount,

    /// Filter applied to every photo of a run.
    pub filter: FilterKind,

    /// Strip theme.
    pub theme: StripTheme,

    /// Sequencer timing.
    pub pacing: Pacing,
}

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready to start a run.
    Idle,
    /// A capture sequence is running.
    Capturing,
    /// A run finished; its frames are available until retake.
    Complete,
    /// Torn down; the session accepts no further runs.
    Closed,
}

/// UI-observable progress of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureProgress {
    pub layout: LayoutCount,
    pub capturing: bool,
    pub countdown: Option<u8>,
    pub shots_taken: u8,
}

impl CaptureProgress {
    fn idle(layout: LayoutCount) -> Self {
        Self {
            layout,
            capturing: false,
            countdown: None,
            shots_taken: 0,
        }
    }

    /// Fold one sequencer event into the progress state.
    pub fn apply(&mut self, event: &SequencerEvent) {
        match event {
            SequencerEvent::Started { layout } => {
                *self = Self::idle(*layout);
                self.capturing = true;
            }
            SequencerEvent::Countdown { value, .. } => self.countdown = *value,
            SequencerEvent::ShotCaptured { shots_taken, .. } => self.shots_taken = *shots_taken,
            SequencerEvent::ShotMissed { .. } => {}
            SequencerEvent::Finished { .. } => {
                self.capturing = false;
                self.countdown = None;
            }
        }
    }

    /// Header text: shot progress while capturing, the booth name otherwise.
    pub fn label(&self) -> String {
        if self.capturing {
            format!("{}/{}", self.shots_taken, self.layout)
        } else {
            "Photo Booth".to_string()
        }
    }

    /// Whether the full-frame flash is showing.
    pub fn is_flashing(&self) -> bool {
        self.countdown == Some(0)
    }

    /// The shutter is disabled while a run is in progress.
    pub fn shutter_enabled(&self) -> bool {
        !self.capturing
    }

    /// Back navigation is suppressed while a run is in progress.
    pub fn back_enabled(&self) -> bool {
        !self.capturing
    }
}

/// A booth session coordinating the sequencer and its snapshot source.
pub struct CaptureSession {
    config: SessionConfig,
    state: SessionState,
    source: Arc<dyn SnapshotSource>,
    progress: Arc<watch::Sender<CaptureProgress>>,
    /// Held while an event is published, so teardown cannot interleave.
    closed: Arc<Mutex<bool>>,
    task: Option<JoinHandle<SequenceOutcome>>,
    run_config: Option<SessionConfig>,
    frames: Arc<[RawFrame]>,
    missed_shots: Vec<u8>,
}

impl CaptureSession {
    /// Create a new capture session with the given configuration.
    pub fn new(config: SessionConfig, source: Arc<dyn SnapshotSource>) -> Self {
        let (progress, _) = watch::channel(CaptureProgress::idle(config.layout));
        Self {
            config,
            state: SessionState::Idle,
            source,
            progress: Arc::new(progress),
            closed: Arc::new(Mutex::new(false)),
            task: None,
            run_config: None,
            frames: Arc::from(Vec::new()),
            missed_shots: Vec::new(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a run is in progress.
    pub fn is_capturing(&self) -> bool {
        self.state == SessionState::Capturing
    }

    /// Subscribe to progress updates.
    pub fn progress(&self) -> watch::Receiver<CaptureProgress> {
        self.progress.subscribe()
    }

    /// Latest progress snapshot.
    pub fn current_progress(&self) -> CaptureProgress {
        *self.progress.borrow()
    }

    /// Frames of the last completed run.
    pub fn frames(&self) -> &[RawFrame] {
        &self.frames
    }

    /// Shots that produced a frame in the last completed run.
    pub fn shots_taken(&self) -> u8 {
        self.frames.len() as u8
    }

    /// Change the photo count. Only allowed between runs.
    pub fn set_layout(&mut self, layout: LayoutCount) -> BoothResult<()> {
        self.ensure_open()?;
        if self.state != SessionState::Idle {
            return Err(BoothError::session(
                "Layout is fixed once a run has started; retake first",
            ));
        }
        self.config.layout = layout;
        self.progress
            .send_modify(|p| *p = CaptureProgress::idle(layout));
        Ok(())
    }

    /// Select a filter. A running sequence keeps the filter it started with.
    pub fn set_filter(&mut self, filter: FilterKind) {
        self.config.filter = filter;
    }

    /// Select a strip theme. A running sequence keeps the theme it started with.
    pub fn set_theme(&mut self, theme: StripTheme) {
        self.config.theme = theme;
    }

    /// Start a capture sequence.
    ///
    /// Returns the event stream of this run. The stream ends when the run
    /// completes or the session is torn down.
    pub fn start(&mut self) -> BoothResult<mpsc::UnboundedReceiver<SequencerEvent>> {
        self.ensure_open()?;
        match self.state {
            SessionState::Capturing => {
                return Err(BoothError::session("A capture sequence is already running"));
            }
            SessionState::Complete => {
                return Err(BoothError::session(
                    "Previous run not discarded; retake before starting again",
                ));
            }
            SessionState::Idle | SessionState::Closed => {}
        }

        let run_config = self.config;
        tracing::info!(
            layout = %run_config.layout,
            filter = %run_config.filter,
            theme = %run_config.theme,
            "Starting capture session run"
        );

        // Controls lock before the task is first polled.
        self.progress
            .send_modify(|p| p.apply(&SequencerEvent::Started { layout: run_config.layout }));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let progress = self.progress.clone();
        let closed = self.closed.clone();
        let sequencer = Sequencer::new(self.source.clone(), run_config.pacing);

        self.task = Some(tokio::spawn(async move {
            sequencer
                .run(run_config.layout, move |event| {
                    let closed = lock_flag(&closed);
                    if *closed {
                        return;
                    }
                    progress.send_modify(|p| p.apply(&event));
                    let _ = events_tx.send(event);
                })
                .await
        }));
        self.run_config = Some(run_config);
        self.state = SessionState::Capturing;
        Ok(events_rx)
    }

    /// Wait for the running sequence and take its handoff.
    pub async fn wait(&mut self) -> BoothResult<CaptureHandoff> {
        self.ensure_open()?;
        let task = self
            .task
            .take()
            .ok_or_else(|| BoothError::session("No capture sequence is running"))?;
        let run_config = self.run_config.take().unwrap_or(self.config);

        let outcome = task
            .await
            .map_err(|e| BoothError::session(format!("Capture sequence did not complete: {e}")))?;

        if *lock_flag(&self.closed) {
            return Err(BoothError::session("Session was torn down"));
        }

        self.frames = Arc::from(outcome.frames);
        self.missed_shots = outcome.missed_shots;
        self.state = SessionState::Complete;

        let handoff = CaptureHandoff {
            layout: run_config.layout,
            filter: run_config.filter,
            theme: run_config.theme,
            frames: self.frames.clone(),
            missed_shots: self.missed_shots.clone(),
        };
        tracing::info!(summary = ?handoff.summary(), "Capture handoff ready");
        Ok(handoff)
    }

    /// Start a sequence and wait for its handoff.
    pub async fn run(&mut self) -> BoothResult<CaptureHandoff> {
        let _events = self.start()?;
        self.wait().await
    }

    /// Discard the last run so a new one can start.
    pub fn retake(&mut self) -> BoothResult<()> {
        self.ensure_open()?;
        if self.state == SessionState::Capturing {
            return Err(BoothError::session("Cannot retake while capturing"));
        }
        self.frames = Arc::from(Vec::new());
        self.missed_shots.clear();
        let layout = self.config.layout;
        self.progress
            .send_modify(|p| *p = CaptureProgress::idle(layout));
        self.state = SessionState::Idle;
        tracing::info!("Capture session reset for retake");
        Ok(())
    }

    /// Tear the session down: cancel pending timers and suppress any
    /// further output. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        *lock_flag(&self.closed) = true;
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::info!("Capture sequence cancelled by teardown");
        }
        self.run_config = None;
        self.frames = Arc::from(Vec::new());
        self.missed_shots.clear();
        let layout = self.config.layout;
        self.progress
            .send_modify(|p| *p = CaptureProgress::idle(layout));
        self.state = SessionState::Closed;
    }

    fn ensure_open(&self) -> BoothResult<()> {
        if self.state == SessionState::Closed {
            return Err(BoothError::session("Session is closed"));
        }
        Ok(())
    }
}

fn lock_flag(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            *lock_flag(&self.closed) = true;
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DropCaptures, StillsSource};
    use std::time::Duration;

    fn session(layout: LayoutCount) -> CaptureSession {
        let source = StillsSource::from_bytes("numbered", (1..=4u8).map(|n| vec![n]).collect());
        CaptureSession::new(
            SessionConfig {
                layout,
                ..SessionConfig::default()
            },
            Arc::new(source),
        )
    }

    #[test]
    fn test_progress_label() {
        let mut progress = CaptureProgress::idle(LayoutCount::THREE);
        assert_eq!(progress.label(), "Photo Booth");
        progress.apply(&SequencerEvent::Started {
            layout: LayoutCount::THREE,
        });
        progress.apply(&SequencerEvent::ShotCaptured {
            shot: 1,
            shots_taken: 1,
        });
        assert_eq!(progress.label(), "1/3");
        assert!(!progress.shutter_enabled());
        assert!(!progress.back_enabled());
    }

    #[test]
    fn test_progress_flash_and_clear() {
        let mut progress = CaptureProgress::idle(LayoutCount::TWO);
        progress.apply(&SequencerEvent::Countdown {
            shot: 1,
            value: Some(0),
        });
        assert!(progress.is_flashing());
        progress.apply(&SequencerEvent::Countdown {
            shot: 1,
            value: None,
        });
        assert!(!progress.is_flashing());
        assert_eq!(progress.countdown, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_with_all_frames() {
        for layout in LayoutCount::ALL {
            let mut session = session(layout);
            let handoff = session.run().await.unwrap();
            assert_eq!(handoff.frames.len(), layout.len());
            assert_eq!(session.shots_taken(), layout.get());
            assert_eq!(session.state(), SessionState::Complete);
            assert_eq!(session.current_progress().shots_taken, layout.get());
            assert!(!session.current_progress().capturing);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_locked_as_soon_as_start_returns() {
        let mut session = session(LayoutCount::THREE);
        let _events = session.start().unwrap();

        let progress = session.current_progress();
        assert!(progress.capturing);
        assert!(!progress.shutter_enabled());
        assert!(!progress.back_enabled());
        assert_eq!(progress.label(), "0/3");
        assert!(session.progress().borrow().capturing);
        session.wait().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_progress_published_after_teardown_returns() {
        let source = StillsSource::from_bytes("numbered", vec![vec![1]]);
        let mut session = CaptureSession::new(
            SessionConfig {
                layout: LayoutCount::FOUR,
                pacing: Pacing::instant(),
                ..SessionConfig::default()
            },
            Arc::new(source),
        );
        let progress = session.progress();
        let mut events = session.start().unwrap();
        tokio::task::yield_now().await;
        session.teardown();

        let after_teardown = *progress.borrow();
        while events.recv().await.is_some() {}
        assert_eq!(*progress.borrow(), after_teardown);
        assert!(!after_teardown.capturing);
        assert_eq!(after_teardown.shots_taken, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_while_running_is_rejected() {
        let mut session = session(LayoutCount::TWO);
        let _events = session.start().unwrap();
        assert!(session.is_capturing());
        assert!(matches!(session.start(), Err(BoothError::Session { .. })));
        assert!(session.retake().is_err());
        session.wait().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_retake_resets_session() {
        let mut session = session(LayoutCount::THREE);
        session.run().await.unwrap();
        assert!(session.start().is_err());

        session.retake().unwrap();
        assert_eq!(session.shots_taken(), 0);
        assert!(session.frames().is_empty());
        assert_eq!(session.current_progress().shots_taken, 0);
        assert_eq!(session.state(), SessionState::Idle);

        let handoff = session.run().await.unwrap();
        assert_eq!(handoff.frames.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_and_theme_frozen_at_start() {
        let mut session = session(LayoutCount::TWO);
        session.set_filter(FilterKind::Sepia);
        session.set_theme(StripTheme::Gray);
        let _events = session.start().unwrap();
        session.set_filter(FilterKind::Vintage);
        let handoff = session.wait().await.unwrap();
        assert_eq!(handoff.filter, FilterKind::Sepia);
        assert_eq!(handoff.theme, StripTheme::Gray);
    }

    #[tokio::test(start_paused = true)]
    async fn test_layout_locked_after_run() {
        let mut session = session(LayoutCount::TWO);
        session.set_layout(LayoutCount::FOUR).unwrap();
        session.run().await.unwrap();
        assert!(session.set_layout(LayoutCount::TWO).is_err());
        session.retake().unwrap();
        session.set_layout(LayoutCount::TWO).unwrap();
        assert_eq!(session.config().layout, LayoutCount::TWO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_mid_run_suppresses_output() {
        let mut session = session(LayoutCount::FOUR);
        let mut events = session.start().unwrap();

        // Let the first shot fire.
        tokio::time::sleep(Duration::from_millis(3_200)).await;
        session.teardown();
        assert_eq!(session.state(), SessionState::Closed);

        let mut received = Vec::new();
        while let Some(event) = events.recv().await {
            received.push(event);
        }
        assert!(!received
            .iter()
            .any(|e| matches!(e, SequencerEvent::Finished { .. })));
        assert!(!received
            .iter()
            .any(|e| matches!(e, SequencerEvent::ShotCaptured { shot: 2, .. })));

        assert!(session.start().is_err());
        assert!(session.wait().await.is_err());
        assert!(session.frames().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_shot_keeps_frames_and_count_in_step() {
        let source = DropCaptures::new(
            StillsSource::from_bytes("numbered", vec![vec![1], vec![2], vec![3]]),
            [1],
        );
        let mut session = CaptureSession::new(
            SessionConfig {
                layout: LayoutCount::THREE,
                ..SessionConfig::default()
            },
            Arc::new(source),
        );
        let handoff = session.run().await.unwrap();
        assert_eq!(handoff.frames.len(), 2);
        assert_eq!(handoff.missed_shots, vec![1]);
        assert_eq!(session.shots_taken() as usize, session.frames().len());
        assert_eq!(session.current_progress().shots_taken, 2);
        assert!(!handoff.is_complete());
    }
}
