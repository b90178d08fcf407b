use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::controller::{SessionController, SessionSnapshot};
use super::guard::StartGuard;
use super::log::MeetingLog;
use crate::config::StreamSettings;
use crate::control::{ControlApi, Notifier};
use crate::identity::IdentityProvider;
use crate::stream::{ConnectionPhase, MeetingStatus, StreamClient, StreamEvent};
use crate::timeline::TimelineItem;

/// Everything a live-assistant run for one meeting owns: the stream
/// connection, the controller, and the append-only logs. Lives from attach
/// to detach.
pub struct LiveSession {
    session_id: String,
    controller: SessionController,
    stream: Arc<StreamClient>,
    log: Arc<MeetingLog>,
    platform_status: Mutex<Option<MeetingStatus>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveSessionStatus {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub connection: ConnectionPhase,
    pub platform_status: Option<MeetingStatus>,
    pub segment_count: usize,
    pub event_count: usize,
}

impl LiveSession {
    /// Attach to a meeting: fetch the streaming credential, open the stream,
    /// and arm the one-shot auto-start.
    pub async fn attach(
        session_id: String,
        settings: StreamSettings,
        identity: Arc<dyn IdentityProvider>,
        control: Arc<dyn ControlApi>,
        notifier: Arc<dyn Notifier>,
        guard: StartGuard,
    ) -> Result<Arc<Self>> {
        let credential = identity
            .streaming_credential(&session_id)
            .await
            .context("failed to obtain streaming credential")?;

        let controller = SessionController::new(
            session_id.clone(),
            control,
            Arc::clone(&notifier),
            guard,
        );
        let stream = Arc::new(StreamClient::new(settings, notifier));
        let log = Arc::new(MeetingLog::new());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        stream
            .connect(&session_id, credential.token, events_tx)
            .await
            .context("failed to open meeting stream")?;

        let session = Arc::new(Self {
            session_id: session_id.clone(),
            controller,
            stream,
            log,
            platform_status: Mutex::new(None),
            consumer: Mutex::new(None),
        });

        let consumer = tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                session.consume_events(events_rx).await;
            }
        });
        *session.consumer.lock().await = Some(consumer);

        session.controller.arm_auto_start().await;

        info!("attached live session for meeting {}", session_id);
        Ok(session)
    }

    /// Single consumer, sequential: stream events are handled strictly in
    /// arrival order.
    async fn consume_events(&self, mut events: mpsc::UnboundedReceiver<StreamEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                StreamEvent::Connected => {
                    debug!("stream acknowledged for meeting {}", self.session_id);
                }
                StreamEvent::Segment(segment) => {
                    // Reconciliation must land before the segment becomes
                    // visible to the timeline.
                    self.controller.on_stream_evidence().await;
                    self.log.push_segment(segment).await;
                }
                StreamEvent::Participant(event) => {
                    self.log.push_event(event).await;
                }
                StreamEvent::Status(status) => {
                    info!(
                        "platform status for meeting {}: {:?}",
                        self.session_id, status
                    );
                    *self.platform_status.lock().await = Some(status);
                }
            }
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub async fn timeline(&self) -> Vec<TimelineItem> {
        self.log.timeline().await
    }

    pub async fn status(&self) -> LiveSessionStatus {
        LiveSessionStatus {
            session: self.controller.snapshot().await,
            connection: self.stream.phase().await,
            platform_status: *self.platform_status.lock().await,
            segment_count: self.log.segment_count().await,
            event_count: self.log.event_count().await,
        }
    }

    /// Detach from the meeting: cancel timers, drop the connection, stop the
    /// consumer. Safe to call once the session is being removed.
    pub async fn detach(&self) {
        self.controller.shutdown().await;
        self.stream.disconnect().await;
        if let Some(consumer) = self.consumer.lock().await.take() {
            consumer.abort();
        }
        info!("detached live session for meeting {}", self.session_id);
    }
}
