use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Scheme prefix of every object URL handed out by [`ObjectUrlRegistry`]
pub const OBJECT_URL_SCHEME: &str = "blob:";

/// In-memory binary payload with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    mime: String,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// MIME type, empty when unknown
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Process-local store backing object URLs.
///
/// Cloning the registry shares the same store.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlRegistry {
    blobs: Arc<Mutex<HashMap<String, Blob>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return an opaque `blob:` URL referencing it
    pub fn create_object_url(&self, blob: Blob) -> String {
        let url = format!("{}null/{}", OBJECT_URL_SCHEME, uuid::Uuid::new_v4());
        log::debug!(
            "Created object URL {} ({} bytes, type '{}')",
            url,
            blob.size(),
            blob.mime()
        );
        self.lock().insert(url.clone(), blob);
        url
    }

    pub fn get(&self, url: &str) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Release the blob behind `url`. Returns false for unknown URLs.
    pub fn revoke(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Blob>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
