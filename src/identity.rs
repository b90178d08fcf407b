//! Identity/session provider: issues the streaming credential consumed by
//! the stream client. The OAuth exchange itself happens elsewhere; only its
//! output is consumed here.

use async_trait::async_trait;

use crate::config::IdentityConfig;

/// Opaque streaming credential plus the stable session identifier it is
/// bound to.
#[derive(Debug, Clone)]
pub struct StreamCredential {
    pub session_id: String,
    pub token: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn streaming_credential(&self, session_id: &str) -> anyhow::Result<StreamCredential>;
}

/// Provider backed by static configuration. Real deployments swap in a
/// provider that talks to the platform's identity endpoint.
pub struct StaticIdentity {
    token: Option<String>,
}

impl StaticIdentity {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            token: config.credential.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn streaming_credential(&self, session_id: &str) -> anyhow::Result<StreamCredential> {
        Ok(StreamCredential {
            session_id: session_id.to_string(),
            token: self.token.clone(),
        })
    }
}
