use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::guard::StartGuard;
use crate::control::{ControlApi, Notifier, StartOptions};

/// Delay before the one automatic start attempt after attach.
pub const AUTO_START_DELAY: Duration = Duration::from_millis(1500);

/// How long an ambiguous start outcome waits for corroborating stream
/// evidence before it is treated as a true failure.
pub const VERIFICATION_WINDOW: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionState {
    #[default]
    Idle,
    Starting,
    Active,
    Stopping,
    /// The start command failed with the ambiguous "may already be running"
    /// code; waiting for the data plane to corroborate.
    PendingVerification,
}

#[derive(Debug, Default)]
struct Inner {
    state: TranscriptionState,

    /// Set exactly once, the first time transcription is confirmed active.
    /// Never reset for the life of the session.
    session_started_at: Option<DateTime<Utc>>,

    /// Start of the current Active period; drives the cumulative accounting
    /// on the transition out of Active.
    activation_start: Option<Instant>,

    cumulative_active_ms: u64,

    /// Auto-start fires at most once per attached instance.
    auto_start_fired: bool,

    /// Any manual start/stop permanently disables auto-start.
    manual_override: bool,

    /// Bumped on shutdown so pending timers can't act on a dead session.
    epoch: u64,

    closed: bool,
}

/// Point-in-time view of the controller, for status endpoints and logs.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: TranscriptionState,
    pub session_started_at: Option<DateTime<Utc>>,
    pub cumulative_active_ms: u64,
}

/// Drives transcription on/off against the platform control API, treating
/// arriving transcript data as the authoritative signal when the two
/// disagree.
#[derive(Clone)]
pub struct SessionController {
    session_id: String,
    control: Arc<dyn ControlApi>,
    notifier: Arc<dyn Notifier>,
    guard: StartGuard,
    inner: Arc<Mutex<Inner>>,
}

impl SessionController {
    pub fn new(
        session_id: String,
        control: Arc<dyn ControlApi>,
        notifier: Arc<dyn Notifier>,
        guard: StartGuard,
    ) -> Self {
        Self {
            session_id,
            control,
            notifier,
            guard,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Manual start request. Disables auto-start for the rest of this
    /// instance's life, even if the state later returns to Idle.
    pub async fn request_start(&self) {
        self.inner.lock().await.manual_override = true;
        self.start_inner().await;
    }

    async fn start_inner(&self) {
        {
            let inner = self.inner.lock().await;
            if inner.closed {
                return;
            }
            if matches!(
                inner.state,
                TranscriptionState::Starting | TranscriptionState::Active
            ) {
                debug!("start ignored for {}: already {:?}", self.session_id, inner.state);
                return;
            }
        }

        // One accepted start per session per guard window, across all callers.
        if !self.guard.try_acquire(&self.session_id).await {
            debug!("duplicate start suppressed for {}", self.session_id);
            return;
        }

        {
            let mut inner = self.inner.lock().await;
            if inner.closed
                || matches!(
                    inner.state,
                    TranscriptionState::Starting | TranscriptionState::Active
                )
            {
                return;
            }
            inner.state = TranscriptionState::Starting;
        }

        match self.control.start_transcription(StartOptions::default()).await {
            Ok(()) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.state = TranscriptionState::Active;
                    if inner.session_started_at.is_none() {
                        inner.session_started_at = Some(Utc::now());
                    }
                    inner.activation_start = Some(Instant::now());
                }
                self.guard.release(&self.session_id).await;
                info!("transcription started for {}", self.session_id);
                self.notifier.success("Live transcription started");
            }
            Err(e) if e.is_ambiguous() => {
                // The command may have succeeded anyway. Hold state and wait
                // for the stream to corroborate; keep the guard so retries
                // stay suppressed meanwhile.
                warn!(
                    "ambiguous start outcome for {} ({}), awaiting stream evidence",
                    self.session_id, e
                );
                let epoch = {
                    let mut inner = self.inner.lock().await;
                    inner.state = TranscriptionState::PendingVerification;
                    inner.epoch
                };

                let controller = self.clone();
                let deadline = Instant::now() + VERIFICATION_WINDOW;
                tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    controller.finish_verification(epoch).await;
                });
            }
            Err(e) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.state = TranscriptionState::Idle;
                }
                self.guard.release(&self.session_id).await;
                self.notifier
                    .error(&format!("Could not start transcription: {}", e));
            }
        }
    }

    /// Verification window elapsed. If no evidence arrived the original
    /// attempt is assumed to have truly failed; settle in Idle, silently.
    async fn finish_verification(&self, epoch: u64) {
        let mut inner = self.inner.lock().await;
        if inner.closed || inner.epoch != epoch {
            return;
        }
        if inner.state == TranscriptionState::PendingVerification {
            debug!(
                "no stream evidence for {} within verification window",
                self.session_id
            );
            inner.state = TranscriptionState::Idle;
        }
    }

    /// Manual stop request. The active-time accounting happens exactly once
    /// per Active period, whether or not the platform accepts the stop.
    pub async fn request_stop(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.manual_override = true;
            if inner.closed {
                return;
            }
            if matches!(
                inner.state,
                TranscriptionState::Idle | TranscriptionState::Stopping
            ) {
                debug!("stop ignored for {}: already {:?}", self.session_id, inner.state);
                return;
            }
            inner.state = TranscriptionState::Stopping;
        }

        let result = self.control.stop_transcription().await;

        {
            let mut inner = self.inner.lock().await;
            if let Some(started) = inner.activation_start.take() {
                inner.cumulative_active_ms += started.elapsed().as_millis() as u64;
            }
            inner.state = TranscriptionState::Idle;
        }

        match result {
            Ok(()) => info!("transcription stopped for {}", self.session_id),
            Err(e) => {
                self.notifier
                    .error(&format!("Could not stop transcription: {}", e));
            }
        }
    }

    /// A transcript segment arrived. The data plane is ground truth: the
    /// control API can report failure for a command that actually succeeded,
    /// so any non-Active state is forced to Active here.
    pub async fn on_stream_evidence(&self) {
        {
            let mut inner = self.inner.lock().await;
            if inner.closed || inner.state == TranscriptionState::Active {
                return;
            }
            info!(
                "stream evidence for {}: forcing {:?} -> Active",
                self.session_id, inner.state
            );
            inner.state = TranscriptionState::Active;
            if inner.session_started_at.is_none() {
                inner.session_started_at = Some(Utc::now());
            }
            if inner.activation_start.is_none() {
                inner.activation_start = Some(Instant::now());
            }
        }
        self.guard.release(&self.session_id).await;
    }

    /// Arm the single delayed auto-start. Fires only if, when the delay
    /// elapses, the session is still Idle and the user has never issued a
    /// manual command.
    pub async fn arm_auto_start(&self) {
        let epoch = {
            let mut inner = self.inner.lock().await;
            if inner.closed
                || inner.auto_start_fired
                || inner.manual_override
                || inner.state != TranscriptionState::Idle
            {
                return;
            }
            inner.auto_start_fired = true;
            inner.epoch
        };

        let controller = self.clone();
        let deadline = Instant::now() + AUTO_START_DELAY;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let proceed = {
                let inner = controller.inner.lock().await;
                !inner.closed
                    && inner.epoch == epoch
                    && !inner.manual_override
                    && inner.state == TranscriptionState::Idle
            };

            if proceed {
                debug!("auto-starting transcription for {}", controller.session_id);
                controller.start_inner().await;
            }
        });
    }

    /// Tear down: pending timers become no-ops.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        inner.epoch += 1;
    }

    pub async fn state(&self) -> TranscriptionState {
        self.inner.lock().await.state
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().await;
        SessionSnapshot {
            session_id: self.session_id.clone(),
            state: inner.state,
            session_started_at: inner.session_started_at,
            cumulative_active_ms: inner.cumulative_active_ms,
        }
    }
}
