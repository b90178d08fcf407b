//! Host-platform collaborators: the transcription control API and the
//! user-facing notification sink. Both are injected as trait objects so the
//! controller never reaches for a process-wide handle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Error code the platform is known to return for a start command that may
/// have actually succeeded ("already active" class).
pub const CODE_ALREADY_ACTIVE: i64 = 10308;

#[derive(Debug, Clone, Error)]
#[error("control command failed ({code}): {message}")]
pub struct ControlError {
    pub code: i64,
    pub message: String,
}

impl ControlError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether this failure belongs to the ambiguous class that sometimes
    /// masks an underlying success.
    pub fn is_ambiguous(&self) -> bool {
        self.code == CODE_ALREADY_ACTIVE
    }
}

/// Capability request sent with every start command: no audio capture, live
/// captions only.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StartOptions {
    pub audio_capture: bool,
    pub live_captions: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            audio_capture: false,
            live_captions: true,
        }
    }
}

/// The platform's start/stop transcription capability.
#[async_trait]
pub trait ControlApi: Send + Sync {
    async fn start_transcription(&self, options: StartOptions) -> Result<(), ControlError>;
    async fn stop_transcription(&self) -> Result<(), ControlError>;
}

/// User-facing toast sink. Only configuration faults and hard command
/// failures ever reach it; everything else is absorbed internally.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink that surfaces notifications as log lines.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("notify: {}", message);
    }

    fn error(&self, message: &str) {
        error!("notify: {}", message);
    }
}

/// REST-backed implementation of the platform control API.
pub struct RestControlApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ControlErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl RestControlApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn into_control_result(resp: reqwest::Response) -> Result<(), ControlError> {
        if resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status().as_u16() as i64;
        let body = resp.json::<ControlErrorBody>().await.ok();
        let (code, message) = match body {
            Some(b) => (
                b.code.unwrap_or(status),
                b.message.unwrap_or_else(|| "control request rejected".to_string()),
            ),
            None => (status, "control request rejected".to_string()),
        };

        Err(ControlError::new(code, message))
    }
}

#[async_trait]
impl ControlApi for RestControlApi {
    async fn start_transcription(&self, options: StartOptions) -> Result<(), ControlError> {
        let url = format!("{}/transcription/start", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&options)
            .send()
            .await
            .map_err(|e| ControlError::new(-1, e.to_string()))?;

        Self::into_control_result(resp).await
    }

    async fn stop_transcription(&self) -> Result<(), ControlError> {
        let url = format!("{}/transcription/stop", self.base_url);
        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ControlError::new(-1, e.to_string()))?;

        Self::into_control_result(resp).await
    }
}
