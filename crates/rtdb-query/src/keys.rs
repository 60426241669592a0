//! Recognized query parameter names.

pub const AUTH: &str = "auth";
pub const ORDER_BY: &str = "orderBy";
pub const LIMIT_TO_FIRST: &str = "limitToFirst";
pub const LIMIT_TO_LAST: &str = "limitToLast";
pub const START_AT: &str = "startAt";
pub const END_AT: &str = "endAt";
pub const EQUAL_TO: &str = "equalTo";
pub const SHALLOW: &str = "shallow";
pub const PRINT: &str = "print";
pub const FORMAT: &str = "format";

/// Every parameter name the builder treats as a single-valued key.
pub const RECOGNIZED_KEYS: &[&str] = &[
    AUTH,
    ORDER_BY,
    LIMIT_TO_FIRST,
    LIMIT_TO_LAST,
    START_AT,
    END_AT,
    EQUAL_TO,
    SHALLOW,
    PRINT,
    FORMAT,
];

pub fn is_recognized(key: &str) -> bool {
    RECOGNIZED_KEYS.contains(&key)
}
