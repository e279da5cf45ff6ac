//! Shard Server Protocol
//!
//! Defines the URL shapes and Data Transfer Objects (DTOs) of the shard HTTP API.
//!
//! | Method | Path              | Success                         |
//! |--------|-------------------|---------------------------------|
//! | GET    | `/`               | 200, JSON array of [`KeyValue`] |
//! | GET    | `/{key}`          | 200, JSON [`KeyValue`]          |
//! | PUT    | `/{key}/{value}`  | 204, empty body                 |
//!
//! Keys are decimal integers and values are ASCII alphanumeric. A path segment that does
//! not have that shape does not match the route and is answered with 404.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// --- API Endpoints ---

/// Lists every entry of the shard.
pub const ENDPOINT_LIST: &str = "/";
/// Reads one key.
pub const ENDPOINT_GET: &str = "/:key";
/// Upserts one key.
pub const ENDPOINT_PUT: &str = "/:key/:value";

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static VALUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z]+$").unwrap());

// --- Data Transfer Objects ---

/// A single stored entry, as returned by `GET /` and `GET /{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: i64,
    pub value: String,
}

/// Parses a key path segment. `None` when it is not a decimal integer that fits a key.
pub fn parse_key(segment: &str) -> Option<i64> {
    if !KEY_PATTERN.is_match(segment) {
        return None;
    }
    segment.parse().ok()
}

/// Whether a value path segment is storable.
pub fn is_valid_value(segment: &str) -> bool {
    VALUE_PATTERN.is_match(segment)
}
