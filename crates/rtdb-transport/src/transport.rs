use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::message::{HttpRequest, HttpResponse};

/// Transport interface for a remote tree.
///
/// Implementations make exactly one attempt per call. Any HTTP status,
/// including 4xx and 5xx, is an `Ok` response; `Err` is reserved for
/// requests that produced no status at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        (**self).send(request).await
    }
}
