use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::StreamSettings;
use crate::control::{ControlApi, Notifier};
use crate::identity::IdentityProvider;
use crate::session::{LiveSession, StartGuard};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Attached live sessions (meeting_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<LiveSession>>>>,

    pub stream: StreamSettings,
    pub identity: Arc<dyn IdentityProvider>,
    pub control: Arc<dyn ControlApi>,
    pub notifier: Arc<dyn Notifier>,

    /// Duplicate-start guard, shared across every session and caller.
    pub guard: StartGuard,
}

impl AppState {
    pub fn new(
        stream: StreamSettings,
        identity: Arc<dyn IdentityProvider>,
        control: Arc<dyn ControlApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            stream,
            identity,
            control,
            notifier,
            guard: StartGuard::new(),
        }
    }
}
