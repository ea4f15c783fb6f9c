//! Form encoding shared by query strings and `x-www-form-urlencoded` bodies.
//!
//! Output follows the conventional `qs` style: keys in insertion order,
//! nested objects flattened with brackets (`user[name]=x`), arrays indexed
//! (`ids[0]=1`), RFC 3986 percent-encoding of keys and values.

use serde_json::Value;

/// Serialize a structured value into a form-encoded string.
///
/// Objects and arrays are flattened; a top-level scalar has no key to attach
/// to and encodes to the empty string.
pub fn stringify(value: &Value) -> String {
    let mut pairs = Vec::new();

    match value {
        Value::Object(map) => {
            for (key, item) in map {
                encode_pair(key, item, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                encode_pair(&index.to_string(), item, &mut pairs);
            }
        }
        _ => {}
    }

    pairs.join("&")
}

fn encode_pair(prefix: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                encode_pair(&format!("{}[{}]", prefix, key), item, pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                encode_pair(&format!("{}[{}]", prefix, index), item, pairs);
            }
        }
        Value::Null => pairs.push(format!("{}=", urlencoding::encode(prefix))),
        Value::String(s) => pairs.push(format!(
            "{}={}",
            urlencoding::encode(prefix),
            urlencoding::encode(s)
        )),
        Value::Bool(_) | Value::Number(_) => pairs.push(format!(
            "{}={}",
            urlencoding::encode(prefix),
            urlencoding::encode(&value.to_string())
        )),
    }
}

/// Append an already-encoded query string to `url`.
///
/// Uses `?` unless the URL already carries a query, in which case the new
/// parameters are joined with `&`. An empty query leaves the URL untouched.
pub fn append_encoded(url: &str, query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}
