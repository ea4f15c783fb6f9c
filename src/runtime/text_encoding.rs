use encoding_rs::{Encoding, UTF_8};

/// Encoding used when no label is given
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Resolve a WHATWG encoding label (case-insensitive, surrounding whitespace
/// ignored). `latin1`, `iso-8859-1` and `ascii` all name windows-1252.
pub fn for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

/// Decode `bytes` using the encoding named by `label`.
///
/// A byte order mark takes precedence over the label. Unknown labels fall
/// back to UTF-8. Malformed sequences become U+FFFD.
pub fn decode(bytes: &[u8], label: Option<&str>) -> String {
    let label = label.unwrap_or(DEFAULT_ENCODING);
    let encoding = for_label(label).unwrap_or_else(|| {
        log::warn!("Unknown text encoding '{}', decoding as UTF-8", label);
        UTF_8
    });

    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        log::debug!("Byte order mark selected {} over {}", used.name(), encoding.name());
    }
    if had_errors {
        log::debug!("Replaced malformed {} sequences", used.name());
    }
    text.into_owned()
}
