use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rtdb_transport::TransportConfig;

use crate::error::{SdkError, SdkResult};

/// Environment variable overriding [`ClientConfig::host`].
pub const ENV_HOST: &str = "RTDB_HOST";
/// Environment variable overriding [`ClientConfig::credential`].
pub const ENV_AUTH: &str = "RTDB_AUTH";

/// Connection settings for one tree.
///
/// ```toml
/// host = "demo.example.com"
/// credential = "secret"
/// timeout_secs = 10
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host name without scheme or path, e.g. `demo.example.com`.
    pub host: String,
    /// Sent as `auth` on every request when non-empty.
    pub credential: String,
    /// Whole-request timeout of the transport. Unset keeps its default.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `RTDB_HOST` and `RTDB_AUTH` when they are set.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(
            std::env::var(ENV_HOST).ok(),
            std::env::var(ENV_AUTH).ok(),
        )
    }

    /// Replace host and credential with any values given.
    pub fn apply_overrides(mut self, host: Option<String>, credential: Option<String>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(credential) = credential {
            self.credential = credential;
        }
        self
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.host.is_empty() {
            return Err(SdkError::Config("host must not be empty".into()));
        }
        if self.host.contains("://") {
            return Err(SdkError::Config(format!(
                "host {:?} must not include a scheme",
                self.host
            )));
        }
        if self.host.contains('/') {
            return Err(SdkError::Config(format!(
                "host {:?} must not include a path",
                self.host
            )));
        }
        Ok(())
    }

    pub fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::default();
        if let Some(secs) = self.timeout_secs {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        config
    }
}
