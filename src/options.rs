use crate::error::{Error, Result};
use crate::runtime::body::Body;
use crate::runtime::headers::{HeaderValue, Headers};
use crate::runtime::url;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Cors,
    NoCors,
    SameOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

/// Query attached to a request URL
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Query {
    /// Pre-encoded query appended verbatim (include the leading `?`)
    Raw(String),
    /// Structured params, form-encoded and appended as `?<query>`
    Params(Value),
}

impl Query {
    pub fn none() -> Self {
        Query::Raw(String::new())
    }

    /// Serialize any value into structured query params
    pub fn params<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Query::from(serde_json::to_value(value)?))
    }

    /// The URL with this query attached
    pub fn apply(&self, target: &str) -> String {
        match self {
            Query::Raw(raw) => format!("{}{}", target, raw),
            Query::Params(value) => url::append_encoded(target, &url::stringify(value)),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::none()
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Raw(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Raw(raw)
    }
}

impl From<Value> for Query {
    fn from(value: Value) -> Self {
        match value {
            Value::String(raw) => Query::Raw(raw),
            Value::Null => Query::none(),
            value => Query::Params(value),
        }
    }
}

impl From<Option<Query>> for Query {
    fn from(query: Option<Query>) -> Self {
        query.unwrap_or_default()
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

/// Per-request or default options.
///
/// Every scalar is optional so that merging can tell "not given" apart from
/// "given": when two option sets are merged, values present in the override
/// win and header maps are merged key-by-key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub mode: Option<RequestMode>,
    pub cache: Option<CachePolicy>,
    pub headers: Headers,
    #[serde(skip)]
    pub body: Option<Body>,
    #[serde(deserialize_with = "deserialize_millis")]
    pub timeout: Option<Duration>,
    pub query: Option<Query>,
    /// Text encoding label used by `fetch_file` for text resources
    pub encoding: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document (`timeout` in milliseconds)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Header whose value is produced when the request is built
    pub fn with_lazy_header<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.headers.set(name, HeaderValue::lazy(f));
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Merge `overrides` on top of `self`. Lazy header values are carried
    /// over untouched.
    pub fn merged_with(&self, overrides: &RequestOptions) -> RequestOptions {
        RequestOptions {
            method: overrides.method.or(self.method),
            mode: overrides.mode.or(self.mode),
            cache: overrides.cache.or(self.cache),
            headers: self.headers.merged_with(&overrides.headers),
            body: overrides.body.clone().or_else(|| self.body.clone()),
            timeout: overrides.timeout.or(self.timeout),
            query: overrides.query.clone().or_else(|| self.query.clone()),
            encoding: overrides.encoding.clone().or_else(|| self.encoding.clone()),
        }
    }

    pub fn content_type(&self) -> Option<String> {
        self.headers.get_value("Content-Type")
    }
}
