use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub stream: StreamSettings,
    pub control: ControlConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Where the platform's streaming edge lives. No explicit port: the edge
/// proxy terminates on the default port for the scheme in use.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    pub host: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize)]
pub struct ControlConfig {
    pub base_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdentityConfig {
    /// Streaming credential issued by the identity provider.
    /// Absent for anonymous/implicit auth.
    pub credential: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
