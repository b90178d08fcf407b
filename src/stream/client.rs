use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use super::messages::{ClientMessage, MeetingStatus, ServerMessage};
use crate::config::StreamSettings;
use crate::control::Notifier;
use crate::timeline::{ParticipantEvent, TranscriptSegment};

/// Fixed delay before every reconnect attempt. Reconnection is indefinite
/// and unconditional for the life of the session: no retry cap, no backoff.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Subscribed,
}

#[derive(Debug, Error)]
pub enum StreamError {
    /// Configuration fault: fatal to the connection attempt, no retry.
    #[error("invalid meeting session id {0:?}")]
    InvalidSessionId(String),
}

/// Typed events dispatched to the session consumer, in arrival order.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Connected,
    Segment(TranscriptSegment),
    Participant(ParticipantEvent),
    Status(MeetingStatus),
}

/// Owns the one live WebSocket for a meeting. A newer `connect` supersedes
/// any prior connection: the old read loop and its pending reconnect belong
/// to a stale generation and exit on their next check.
pub struct StreamClient {
    settings: StreamSettings,
    notifier: Arc<dyn Notifier>,
    phase: Arc<RwLock<ConnectionPhase>>,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StreamClient {
    pub fn new(settings: StreamSettings, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings,
            notifier,
            phase: Arc::new(RwLock::new(ConnectionPhase::Disconnected)),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Transport endpoint for the configured edge. Secure scheme when the
    /// service itself runs secure; never an explicit port (the edge proxy
    /// terminates on the scheme default).
    pub fn endpoint(settings: &StreamSettings, credential: Option<&str>) -> String {
        let scheme = if settings.secure { "wss" } else { "ws" };
        match credential {
            Some(token) => format!("{}://{}/ws?access_token={}", scheme, settings.host, token),
            None => format!("{}://{}/ws", scheme, settings.host),
        }
    }

    /// Session ids must be present and real. The sentinel strings show up
    /// when an upstream layer stringifies a missing value.
    pub fn validate_session_id(session_id: &str) -> Result<(), StreamError> {
        let trimmed = session_id.trim();
        if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
            return Err(StreamError::InvalidSessionId(session_id.to_string()));
        }
        Ok(())
    }

    pub async fn phase(&self) -> ConnectionPhase {
        *self.phase.read().await
    }

    /// Open (or supersede) the connection for this meeting and start
    /// dispatching typed events to `events`.
    pub async fn connect(
        &self,
        session_id: &str,
        credential: Option<String>,
        events: mpsc::UnboundedSender<StreamEvent>,
    ) -> Result<(), StreamError> {
        if let Err(e) = Self::validate_session_id(session_id) {
            self.notifier
                .error(&format!("Meeting configuration error: {}", e));
            return Err(e);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Close out the superseded connection; its scheduled reconnect must
        // never resurrect an old generation.
        {
            let mut task = self.task.lock().await;
            if let Some(old) = task.take() {
                old.abort();
            }

            let url = Self::endpoint(&self.settings, credential.as_deref());
            let session_id = session_id.to_string();
            let phase = Arc::clone(&self.phase);
            let current = Arc::clone(&self.generation);

            *task = Some(tokio::spawn(async move {
                run_connection_loop(url, session_id, generation, current, phase, events).await;
            }));
        }

        Ok(())
    }

    /// Tear down the connection and cancel any pending reconnect.
    pub async fn disconnect(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut task = self.task.lock().await;
        if let Some(old) = task.take() {
            old.abort();
        }
        *self.phase.write().await = ConnectionPhase::Disconnected;
    }
}

/// One generation's connect/read/reconnect loop. At most one of these is
/// current per session; stale generations exit at the next check.
async fn run_connection_loop(
    url: String,
    session_id: String,
    generation: u64,
    current: Arc<AtomicU64>,
    phase: Arc<RwLock<ConnectionPhase>>,
    events: mpsc::UnboundedSender<StreamEvent>,
) {
    loop {
        if current.load(Ordering::SeqCst) != generation {
            return;
        }

        *phase.write().await = ConnectionPhase::Connecting;

        match connect_async(url.as_str()).await {
            Ok((ws_stream, _)) => {
                info!("stream connected for meeting {}", session_id);
                let (mut write, mut read) = ws_stream.split();

                let subscribe = ClientMessage::subscribe(session_id.clone());
                let frame = match serde_json::to_string(&subscribe) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("failed to encode subscribe message: {}", e);
                        return;
                    }
                };

                if let Err(e) = write.send(Message::Text(frame)).await {
                    warn!("failed to subscribe meeting {}: {}", session_id, e);
                } else {
                    *phase.write().await = ConnectionPhase::Subscribed;

                    while let Some(msg) = read.next().await {
                        if current.load(Ordering::SeqCst) != generation {
                            return;
                        }
                        match msg {
                            Ok(Message::Text(text)) => dispatch_frame(&text, &events),
                            Ok(Message::Close(_)) => break,
                            Ok(_) => {} // ping/pong/binary
                            Err(e) => {
                                warn!("stream read error for meeting {}: {}", session_id, e);
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                // Transport failures never reach the user; the reconnect
                // loop absorbs them.
                warn!("stream connect failed for meeting {}: {}", session_id, e);
            }
        }

        if current.load(Ordering::SeqCst) != generation {
            return;
        }

        *phase.write().await = ConnectionPhase::Disconnected;
        debug!(
            "stream for meeting {} closed, reconnecting in {:?}",
            session_id, RECONNECT_DELAY
        );
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

/// Decode one inbound frame and forward it. Unparseable or unrecognized
/// frames are logged and dropped; they never affect state.
fn dispatch_frame(text: &str, events: &mpsc::UnboundedSender<StreamEvent>) {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Connected) => {
            let _ = events.send(StreamEvent::Connected);
        }
        Ok(ServerMessage::TranscriptSegment { data }) => {
            let _ = events.send(StreamEvent::Segment(data.segment));
        }
        Ok(ServerMessage::ParticipantEvent { data }) => {
            let _ = events.send(StreamEvent::Participant(data.event));
        }
        Ok(ServerMessage::MeetingStatus { data }) => {
            let _ = events.send(StreamEvent::Status(data.status));
        }
        Ok(ServerMessage::Unknown) => {
            debug!("ignoring unrecognized stream message");
        }
        Err(e) => {
            warn!("failed to decode stream message: {}", e);
        }
    }
}
