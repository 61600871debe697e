//! Key Builder Module
//!
//! Deterministic cache-key derivation from a namespace, an identifier and
//! an optional context object.
//!
//! The composed key is `namespace:identifier` or, when a non-empty context
//! is supplied, `namespace:identifier:fingerprint`. The fingerprint is a
//! short fixed-length SHA-256 digest of the canonicalized context, so two
//! contexts holding the same key/value pairs in different insertion order
//! produce the same cache key.

use serde_json::Value;
use sha2::{Digest, Sha256};

// == Constants ==
/// Number of hex characters kept from the context digest.
const FINGERPRINT_LEN: usize = 16;

// == Generate Key ==
/// Builds a cache key from a namespace, an identifier and an optional
/// context.
///
/// An absent context and an empty context object produce the same bare
/// `namespace:identifier` key, so callers need not normalize between the
/// two.
pub fn generate_key(namespace: &str, identifier: &str, context: Option<&Value>) -> String {
    match context {
        Some(context) if !is_empty_context(context) => {
            format!("{}:{}:{}", namespace, identifier, fingerprint(context))
        }
        _ => format!("{}:{}", namespace, identifier),
    }
}

// == Fingerprint ==
/// Short fixed-length digest of the canonicalized context.
fn fingerprint(context: &Value) -> String {
    let canonical = canonical_json(context);
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)[..FINGERPRINT_LEN].to_string()
}

/// Treats `null` and `{}` as "no context".
fn is_empty_context(context: &Value) -> bool {
    match context {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// == Canonical JSON ==
/// Serializes a JSON value with object keys sorted at every nesting level.
///
/// Array element order is preserved: `[1, 2]` and `[2, 1]` are different
/// contexts, only object key order is insignificant.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| {
                    format!(
                        "{}:{}",
                        Value::String(key.clone()),
                        canonical_json(&map[key])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        scalar => scalar.to_string(),
    }
}
