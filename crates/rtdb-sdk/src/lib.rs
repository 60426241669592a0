//! High-level SDK for rtdb.
//!
//! A remote JSON tree is exposed as a tree of [`Reference`]s. Each reference
//! knows its path from the root, shares the root's host and credential, and
//! can read, replace, merge, append to, or delete the value at that path.
//!
//! ```no_run
//! use rtdb_sdk::{ClientConfig, Query, Reference};
//! use serde_json::json;
//!
//! # async fn demo() -> rtdb_sdk::SdkResult<()> {
//! let root = Reference::connect(&ClientConfig::new("demo.example.com"))?;
//! let ann = root.child("users", false)?.child("42", false)?;
//! ann.set(json!({ "name": "Ann" }), Query::new()).await?;
//! let snap = ann.get(Query::new().shallow(true)).await?;
//! assert!(snap.exists());
//! # Ok(())
//! # }
//! ```
//!
//! Every operation resolves to exactly one of `Ok(Snapshot)` or
//! `Err(SdkError)`. Callbacks registered on the reference fire in addition
//! to, never instead of, the returned result.

pub mod callbacks;
pub mod config;
pub mod error;
pub mod executor;
pub mod key;
pub mod normalize;
pub mod payload;
pub mod reference;
pub mod root;

pub use callbacks::{CallbackPair, CallbackSet, Hook, Operation};
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult};
pub use key::{validate_key, MAX_KEY_BYTES};
pub use normalize::{normalize, parse_status_line, Failure, CONNECTIVITY_MESSAGE, NO_INFO_MESSAGE};
pub use payload::Payload;
pub use reference::Reference;
pub use root::RootState;

// Re-export key types
pub use rtdb_query::Query;
pub use rtdb_transport::{HttpTransport, MockTransport};
pub use rtdb_types::{timestamp_to_datetime, ErrorKind, RequestError, Snapshot};
