use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// Zero-argument header value producer, invoked once per request build
pub type HeaderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// A header value that is either known up front or produced at send time
#[derive(Clone)]
pub enum HeaderValue {
    Static(String),
    Lazy(HeaderFn),
}

impl HeaderValue {
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        HeaderValue::Lazy(Arc::new(f))
    }

    /// Produce the concrete value. Lazy values are invoked on every call.
    pub fn resolve(&self) -> String {
        match self {
            HeaderValue::Static(value) => value.clone(),
            HeaderValue::Lazy(f) => f(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, HeaderValue::Lazy(_))
    }

    /// The value if it is already concrete
    pub fn as_static(&self) -> Option<&str> {
        match self {
            HeaderValue::Static(value) => Some(value),
            HeaderValue::Lazy(_) => None,
        }
    }
}

impl fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            HeaderValue::Lazy(_) => f.write_str("Lazy(<fn>)"),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Static(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Static(value)
    }
}

/// Ordered header map with case-insensitive names.
///
/// Names keep the spelling they were first inserted with; lookups, overrides
/// and removal ignore case.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, HeaderValue)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Set a header, replacing any existing value with the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Append to an existing header (comma-joined), or insert it
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let joined = format!("{}, {}", self.entries[index].1.resolve(), value);
                self.entries[index].1 = HeaderValue::Static(joined);
            }
            None => self.entries.push((name, HeaderValue::Static(value))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    /// Concrete value of a header; lazy values are resolved
    pub fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).map(HeaderValue::resolve)
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove a header, returning its previous value
    pub fn delete(&mut self, name: &str) -> Option<HeaderValue> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Key-by-key merge: entries of `overrides` replace same-named entries,
    /// every other entry of `self` is preserved.
    pub fn merged_with(&self, overrides: &Headers) -> Headers {
        let mut merged = self.clone();
        for (name, value) in &overrides.entries {
            merged.set(name.clone(), value.clone());
        }
        merged
    }

    /// Copy with every lazy value invoked and replaced by its result
    pub fn resolved(&self) -> Headers {
        Headers {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), HeaderValue::Static(value.resolve())))
                .collect(),
        }
    }

    /// Concrete name/value pairs in insertion order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

struct HeadersVisitor;

impl<'de> Visitor<'de> for HeadersVisitor {
    type Value = Headers;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of header names to string values")
    }

    // Entries are applied in document order, so a later same-named key wins
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Headers, A::Error> {
        let mut headers = Headers::new();
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            headers.set(name, value);
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HeadersVisitor)
    }
}
