//! Caller-side scrubbing of audit snapshots.
//!
//! The recorder writes snapshots exactly as given. Controllers call these
//! helpers on entity snapshots before handing them over; nothing in this
//! crate calls them implicitly.

use serde_json::Value;

const MAX_DEPTH: usize = 64;

/// Keys removed by [`strip_sensitive`], compared case-insensitively with
/// `-` treated as `_`.
pub const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "password_hash",
    "passwordhash",
    "secret",
    "client_secret",
    "token",
    "access_token",
    "refresh_token",
    "api_key",
    "apikey",
    "private_key",
    "credentials",
    "session_token",
];

/// Removes sensitive keys from every object in `value`, recursively.
///
/// Nesting beyond a fixed depth is cut off and replaced by `null`, so a
/// hostile payload cannot smuggle secrets past the walk.
pub fn strip_sensitive(value: &mut Value) {
    strip_with_keys(value, SENSITIVE_KEYS, 0);
}

/// Owned variant of [`strip_sensitive`].
pub fn sanitized(mut value: Value) -> Value {
    strip_sensitive(&mut value);
    value
}

/// Like [`strip_sensitive`] with a caller-supplied deny-list.
pub fn strip_keys(value: &mut Value, keys: &[&str]) {
    strip_with_keys(value, keys, 0);
}

fn strip_with_keys(value: &mut Value, keys: &[&str], depth: usize) {
    if depth > MAX_DEPTH {
        *value = Value::Null;
        return;
    }

    match value {
        Value::Object(obj) => {
            obj.retain(|key, _| !is_denied(key, keys));
            for (_, v) in obj.iter_mut() {
                strip_with_keys(v, keys, depth + 1);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_with_keys(item, keys, depth + 1);
            }
        }
        _ => {}
    }
}

fn is_denied(key: &str, keys: &[&str]) -> bool {
    let normalized = key.to_ascii_lowercase().replace('-', "_");
    keys.iter().any(|k| normalized == k.to_ascii_lowercase())
}
