//! HTTP transport seam for the rtdb client.
//!
//! The SDK never talks to the network directly. It frames an [`HttpRequest`],
//! hands it to an [`HttpTransport`], and interprets the [`HttpResponse`] or
//! [`TransportError`] that comes back. Exactly one attempt is made per call;
//! retries, redirects and TLS are the transport's business.
//!
//! Two transports ship with the crate:
//!
//! - [`HttpClientTransport`]: reqwest-backed, for real endpoints
//! - [`MockTransport`]: scripted replies and recorded requests, for tests

pub mod endpoint;
pub mod error;
pub mod http_client;
pub mod message;
pub mod mock;
pub mod transport;

pub use endpoint::{data_url, rules_url, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use http_client::HttpClientTransport;
pub use message::{HttpRequest, HttpResponse, Method};
pub use mock::{MockReply, MockTransport};
pub use transport::HttpTransport;
