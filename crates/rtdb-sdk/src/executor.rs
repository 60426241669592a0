//! REST operations on a [`Reference`].
//!
//! Every operation makes exactly one transport attempt and resolves to
//! exactly one of `Ok(Snapshot)` or `Err(SdkError::Request(_))`. The matching
//! success or failure hook of the reference fires before the result is
//! returned. Path errors are raised before any I/O and fire nothing. An
//! operation dropped while its request is in flight fires the failure hook
//! with a `Cancelled` error.

use std::future::Future;

use tracing::{debug, warn};

use rtdb_query::Query;
use rtdb_transport::{HttpRequest, Method, TransportError};
use rtdb_types::{RequestError, Snapshot};

use crate::callbacks::{CallbackPair, Operation};
use crate::error::{SdkError, SdkResult};
use crate::normalize::{normalize, Failure};
use crate::payload::Payload;
use crate::reference::Reference;

impl Reference {
    /// Read the value at this location. A missing value is an absent
    /// snapshot, not an error.
    pub async fn get(&self, query: impl Into<Query>) -> SdkResult<Snapshot> {
        self.execute(Operation::Get, None, query.into()).await
    }

    /// Replace the value at this location.
    pub async fn set(
        &self,
        payload: impl Into<Payload>,
        query: impl Into<Query>,
    ) -> SdkResult<Snapshot> {
        self.execute(Operation::Set, Some(payload.into()), query.into())
            .await
    }

    /// Merge the given children into the value at this location.
    pub async fn update(
        &self,
        payload: impl Into<Payload>,
        query: impl Into<Query>,
    ) -> SdkResult<Snapshot> {
        self.execute(Operation::Update, Some(payload.into()), query.into())
            .await
    }

    /// Append under a server-generated key. The snapshot holds `{"name": key}`.
    pub async fn push(
        &self,
        payload: impl Into<Payload>,
        query: impl Into<Query>,
    ) -> SdkResult<Snapshot> {
        self.execute(Operation::Push, Some(payload.into()), query.into())
            .await
    }

    pub async fn delete(&self, query: impl Into<Query>) -> SdkResult<Snapshot> {
        self.execute(Operation::Delete, None, query.into()).await
    }

    /// Write the server timestamp under the child `key`.
    pub async fn set_timestamp(&self, key: &str) -> SdkResult<Snapshot> {
        self.child(key, false)?
            .set(Payload::server_timestamp(), Query::new())
            .await
    }

    /// Like [`Reference::set_timestamp`], reporting through the given hooks.
    pub async fn set_timestamp_with(&self, key: &str, hooks: CallbackPair) -> SdkResult<Snapshot> {
        let mut target = self.child(key, false)?;
        target.callbacks_mut().set = hooks;
        target.set(Payload::server_timestamp(), Query::new()).await
    }

    /// Read the tree's security rules.
    ///
    /// Authenticates with `secret`, or with the tree's credential when no
    /// secret is given. Per-reference hooks do not fire.
    pub async fn get_rules(&self, secret: Option<&str>) -> SdkResult<Snapshot> {
        self.get_rules_with(secret, CallbackPair::new()).await
    }

    /// Like [`Reference::get_rules`], reporting through the given hooks.
    pub async fn get_rules_with(
        &self,
        secret: Option<&str>,
        hooks: CallbackPair,
    ) -> SdkResult<Snapshot> {
        let query = self.rules_query(secret);
        let url = self.rules_endpoint();
        self.hooked(&hooks, self.perform(Method::Get, &url, None, &query))
            .await
    }

    /// Replace the tree's security rules.
    ///
    /// Rules given as text must be wrapped in [`Payload::json`]; a plain
    /// string would be sent as a JSON string.
    pub async fn set_rules(
        &self,
        rules: impl Into<Payload>,
        secret: Option<&str>,
    ) -> SdkResult<Snapshot> {
        self.set_rules_with(rules, secret, CallbackPair::new()).await
    }

    /// Like [`Reference::set_rules`], reporting through the given hooks.
    pub async fn set_rules_with(
        &self,
        rules: impl Into<Payload>,
        secret: Option<&str>,
        hooks: CallbackPair,
    ) -> SdkResult<Snapshot> {
        let rules = rules.into();
        let query = self.rules_query(secret);
        let url = self.rules_endpoint();
        self.hooked(&hooks, async {
            let body = rules.encode()?;
            self.perform(Method::Put, &url, Some(body), &query).await
        })
        .await
    }

    fn rules_query(&self, secret: Option<&str>) -> Query {
        let secret = match secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => self.credential(),
        };
        Query::new().auth(secret)
    }

    async fn execute(
        &self,
        op: Operation,
        payload: Option<Payload>,
        query: Query,
    ) -> SdkResult<Snapshot> {
        let credential = self.credential();
        let query = if credential.is_empty() {
            query
        } else {
            query.auth(credential)
        };
        let url = self.endpoint();

        self.hooked(self.callbacks().pair(op), async {
            let body = match payload.as_ref().map(Payload::encode).transpose() {
                Ok(body) => body,
                Err(err) => {
                    warn!(op = %op, path = %self.path(), error = %err, "payload rejected");
                    return Err(err);
                }
            };
            self.perform(op.method(), &url, body, &query).await
        })
        .await
    }

    /// Await `request`, then report its outcome to `hooks`.
    ///
    /// If the returned future is dropped first, the failure hook still fires
    /// with a `Cancelled` error.
    async fn hooked<F>(&self, hooks: &CallbackPair, request: F) -> SdkResult<Snapshot>
    where
        F: Future<Output = Result<Snapshot, RequestError>>,
    {
        let mut in_flight = InFlight {
            reference: self,
            hooks,
            finished: false,
        };
        let outcome = request.await;
        in_flight.finished = true;

        match outcome {
            Ok(snapshot) => {
                hooks.on_success.fire(self, &snapshot);
                Ok(snapshot)
            }
            Err(err) => {
                hooks.on_failure.fire(self, &err);
                Err(SdkError::Request(err))
            }
        }
    }

    /// Send one request and interpret the answer.
    async fn perform(
        &self,
        method: Method,
        base_url: &str,
        body: Option<Vec<u8>>,
        query: &Query,
    ) -> Result<Snapshot, RequestError> {
        let mut request = HttpRequest::new(method, query.append_to(base_url));
        if let Some(body) = body.filter(|_| method.has_body()) {
            request = request.json_body(body);
        }

        debug!(
            method = %method,
            host = %self.host(),
            path = %self.path(),
            query = %query.redacted(),
            "sending request"
        );

        let response = match self.state().transport().send(request).await {
            Ok(response) => response,
            Err(err) => {
                let err = normalize(Failure::Transport(&err));
                warn!(method = %method, path = %self.path(), error = %err, "request failed");
                return Err(err);
            }
        };

        let text = response.text();
        debug!(status = response.status, bytes = response.body.len(), "response received");

        if !response.is_success() {
            let status_line = response.status_line();
            let err = normalize(Failure::Status {
                status_line: &status_line,
                body: &text,
            });
            warn!(method = %method, path = %self.path(), error = %err, "request failed");
            return Err(err);
        }

        Ok(Snapshot::from_body(&text))
    }
}

/// Fires the failure hook with a `Cancelled` error when dropped unfinished.
struct InFlight<'a> {
    reference: &'a Reference,
    hooks: &'a CallbackPair,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished || std::thread::panicking() {
            return;
        }
        let err = normalize(Failure::Transport(&TransportError::Cancelled));
        warn!(path = %self.reference.path(), "request dropped before completion");
        self.hooks.on_failure.fire(self.reference, &err);
    }
}
