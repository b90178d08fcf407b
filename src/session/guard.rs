use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Suppression window for duplicate start requests on the same session.
pub const START_GUARD_TTL: Duration = Duration::from_millis(3000);

/// Session-keyed duplicate-start guard.
///
/// Shared across every caller that can issue a start (manual, auto-start,
/// concurrent retries), not private to one call stack. Entries expire on
/// their own after the TTL; an explicit release only happens when the start
/// outcome is known.
#[derive(Clone, Default)]
pub struct StartGuard {
    inner: Arc<Mutex<HashMap<String, Instant>>>,
}

impl StartGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a start for this session. Returns `false` while a previous mark
    /// is still inside the TTL.
    pub async fn try_acquire(&self, session_id: &str) -> bool {
        let mut marks = self.inner.lock().await;
        let now = Instant::now();
        marks.retain(|_, expires_at| *expires_at > now);

        if marks.contains_key(session_id) {
            return false;
        }

        marks.insert(session_id.to_string(), now + START_GUARD_TTL);
        true
    }

    pub async fn release(&self, session_id: &str) {
        self.inner.lock().await.remove(session_id);
    }
}
