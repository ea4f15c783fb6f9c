use crate::error::Result;
use crate::runtime::blob::Blob;
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// A fully buffered response returned by a [`crate::Transport`]
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// True for 2xx statuses
    pub fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as a blob typed by the response Content-Type
    pub fn blob(&self) -> Blob {
        Blob::new(self.body.clone(), self.content_type().unwrap_or_default())
    }

    /// Raw body bytes
    pub fn array_buffer(&self) -> Bytes {
        self.body.clone()
    }
}
