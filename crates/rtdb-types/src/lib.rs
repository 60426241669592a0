//! Foundation types for the rtdb client.
//!
//! This crate provides the value types that flow out of every request made
//! against a remote JSON tree. Every other rtdb crate depends on `rtdb-types`.
//!
//! # Key Types
//!
//! - [`Snapshot`]: Immutable view over a response body, including the
//!   does-not-exist state
//! - [`RequestError`]: The single failure shape reported by every operation
//! - [`ErrorKind`]: Coarse classification of a [`RequestError`]
//! - [`server_value`]: Server-side placeholders such as the write timestamp

pub mod error;
pub mod server_value;
pub mod snapshot;

pub use error::{ErrorKind, RequestError, TypeError};
pub use server_value::{server_timestamp, timestamp_to_datetime, SERVER_TIMESTAMP_JSON};
pub use snapshot::Snapshot;
