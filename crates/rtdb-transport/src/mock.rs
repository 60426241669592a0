//! In-memory transport for testing and offline demos.
//!
//! [`MockTransport`] answers from a queue of scripted [`MockReply`]s and
//! records every request it receives. It is suitable for unit tests of code
//! that drives an [`HttpTransport`] without opening sockets.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{TransportError, TransportResult};
use crate::message::{HttpRequest, HttpResponse};
use crate::transport::HttpTransport;

/// A scripted outcome for one request.
#[derive(Clone, Debug)]
pub enum MockReply {
    Respond(HttpResponse),
    /// Answer 200 with the request's own body (or `null`).
    Echo,
    Fail(TransportError),
}

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    requests: Vec<HttpRequest>,
}

/// Scripted implementation of [`HttpTransport`].
///
/// Replies are consumed in order. When the queue is empty every request
/// fails with [`TransportError::Other`].
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: MockReply) -> &Self {
        self.lock().replies.push_back(reply);
        self
    }

    /// Queue a response with the canonical reason phrase for `status`.
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.push_reply(MockReply::Respond(HttpResponse::with_status(
            status,
            body.as_bytes().to_vec(),
        )))
    }

    pub fn echo(&self) -> &Self {
        self.push_reply(MockReply::Echo)
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.push_reply(MockReply::Fail(error))
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn pending_replies(&self) -> usize {
        self.lock().replies.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let mut state = self.lock();
        let reply = state.replies.pop_front();
        let body = request.body.clone();
        state.requests.push(request);
        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Echo) => {
                let body = body.unwrap_or_else(|| "null".into());
                Ok(HttpResponse::with_status(200, body))
            }
            Some(MockReply::Fail(error)) => Err(error),
            None => Err(TransportError::Other("no scripted reply".into())),
        }
    }
}
