use std::time::Duration;

/// URL pieces shared by every request against a tree.
pub mod paths {
    pub const SCHEME: &str = "https://";
    pub const DATA_SUFFIX: &str = "/.json";
    pub const RULES: &str = "/.settings/rules.json";
}

/// Data endpoint for `path` (empty for the root, otherwise `/a/b`).
pub fn data_url(host: &str, path: &str) -> String {
    format!("{}{host}{path}{}", paths::SCHEME, paths::DATA_SUFFIX)
}

/// Administrative security-rules endpoint of a host.
pub fn rules_url(host: &str) -> String {
    format!("{}{host}{}", paths::SCHEME, paths::RULES)
}

/// Settings for [`crate::HttpClientTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Whole-request timeout. `None` leaves it to the OS.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: format!("rtdb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
