use axum::{
    Json,
    extract::{Extension, Path},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::memory::ShardStore;
use super::protocol::{KeyValue, is_valid_value, parse_key};
use crate::error::StoreError;

// Every route accepts any method. The path shape is checked first, so a malformed key or
// value is an unmatched path (404) and only a well-formed path with the wrong method
// gets 405.

/// `GET /`: every entry of the shard, unordered.
pub async fn handle_list(
    method: Method,
    Extension(store): Extension<Arc<ShardStore>>,
) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let entries: Vec<KeyValue> = store
        .entries()
        .into_iter()
        .map(|(key, value)| KeyValue { key, value })
        .collect();

    (StatusCode::OK, Json(entries)).into_response()
}

/// `GET /{key}`: one entry, or 404.
pub async fn handle_get(
    method: Method,
    Extension(store): Extension<Arc<ShardStore>>,
    Path(key_str): Path<String>,
) -> Response {
    let Some(key) = parse_key(&key_str) else {
        tracing::debug!("{}: '{}' is not a key", method, key_str);
        return StatusCode::NOT_FOUND.into_response();
    };
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match store.get(key) {
        Ok(value) => (StatusCode::OK, Json(KeyValue { key, value })).into_response(),
        Err(StoreError::NotFound(_)) => {
            tracing::debug!("GET: key {} not found", key);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// `PUT /{key}/{value}`: upsert. Always 204 once the path is well formed.
pub async fn handle_put(
    method: Method,
    Extension(store): Extension<Arc<ShardStore>>,
    Path((key_str, value)): Path<(String, String)>,
) -> StatusCode {
    let Some(key) = parse_key(&key_str) else {
        tracing::debug!("{}: '{}' is not a key", method, key_str);
        return StatusCode::NOT_FOUND;
    };
    if !is_valid_value(&value) {
        tracing::debug!("{}: '{}' is not a storable value", method, value);
        return StatusCode::NOT_FOUND;
    }
    if method != Method::PUT {
        return StatusCode::METHOD_NOT_ALLOWED;
    }

    store.set(key, value);
    StatusCode::NO_CONTENT
}
