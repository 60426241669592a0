//! REST query builder for the rtdb client.
//!
//! A [`Query`] is an ordered list of `key=value` parameters plus free-form
//! fragments. Recognized parameters (see [`keys`]) are last-write-wins and
//! keep their original position when replaced; everything else passes
//! through untouched.
//!
//! Values are held unescaped. Escaping happens exactly once, in
//! [`Query::encode`], so a query can be parsed, amended and re-encoded any
//! number of times without double escaping.
//!
//! # Modules
//!
//! - [`keys`]: Names of the recognized parameters
//! - [`query`]: The [`Query`] type and the [`build`] helper

pub mod keys;
pub mod query;

pub use keys::{is_recognized, RECOGNIZED_KEYS};
pub use query::{build, Query};
