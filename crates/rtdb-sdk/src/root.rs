//! State shared by every reference of one tree.

use std::fmt;
use std::sync::{Arc, RwLock};

use rtdb_transport::{rules_url, HttpTransport};

/// Host, credential and transport of one tree.
///
/// Held behind an `Arc` by every [`crate::Reference`] of the tree. The
/// credential is the only mutable field; it sits behind a `RwLock` so that
/// a change made through any reference is seen by all of them.
pub struct RootState {
    host: String,
    credential: RwLock<String>,
    transport: Arc<dyn HttpTransport>,
}

impl RootState {
    pub fn new(
        host: impl Into<String>,
        credential: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            host: host.into(),
            credential: RwLock::new(credential.into()),
            transport,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn credential(&self) -> String {
        self.credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_credential(&self, credential: impl Into<String>) {
        let mut slot = self
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = credential.into();
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    pub fn rules_endpoint(&self) -> String {
        rules_url(&self.host)
    }

    /// Independent copy of the host and credential. The transport is shared.
    pub fn deep_copy(&self) -> Self {
        Self {
            host: self.host.clone(),
            credential: RwLock::new(self.credential()),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl fmt::Debug for RootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credential = if self.credential().is_empty() { "" } else { "<redacted>" };
        f.debug_struct("RootState")
            .field("host", &self.host)
            .field("credential", &credential)
            .finish_non_exhaustive()
    }
}
