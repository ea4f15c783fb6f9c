use crate::options::{CachePolicy, HttpMethod, RequestMode, RequestOptions};
use crate::runtime::body::Body;

/// A fully prepared request as handed to a [`crate::Transport`].
///
/// Header values are concrete and the body is already encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    pub mode: RequestMode,
    pub cache: CachePolicy,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            url: String::new(),
            mode: RequestMode::Cors,
            cache: CachePolicy::Default,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl FetchRequest {
    /// Build the wire request from merged options. Lazy headers still
    /// present are resolved here.
    pub fn from_options(url: String, options: RequestOptions) -> Self {
        Self {
            method: options.method.unwrap_or(HttpMethod::Get),
            url,
            mode: options.mode.unwrap_or(RequestMode::Cors),
            cache: options.cache.unwrap_or(CachePolicy::Default),
            headers: options.headers.to_pairs(),
            body: options.body,
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }
}
