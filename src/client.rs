use crate::defaults::DefaultOptions;
use crate::error::{Error, Result};
use crate::file::FileType;
use crate::options::{HttpMethod, Query, RequestOptions};
use crate::runtime::blob::{Blob, ObjectUrlRegistry};
use crate::runtime::body::{Body, FormData, handle_content_type};
use crate::runtime::fetch::{FetchRequest, ReqwestTransport};
use crate::runtime::timers::PendingRequest;
use crate::runtime::url::{append_encoded, stringify};
use crate::runtime::{TransportHandle, text_encoding};
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Uniform calling convention over a [`crate::Transport`].
///
/// Every call merges its options over the client's defaults, encodes the body
/// from the resolved Content-Type and races the request against the resolved
/// timeout.
///
/// Defaults are read once per call. `set_default_options` and
/// `replace_default_options` are configuration-time operations: requests
/// already in flight keep the snapshot they started with.
pub struct RequestClient {
    transport: TransportHandle,
    defaults: RwLock<DefaultOptions>,
    object_urls: ObjectUrlRegistry,
}

impl Default for RequestClient {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), None)
    }
}

impl RequestClient {
    /// Create a client over `transport`. Initial options, when given, are
    /// layered over the built-in baseline.
    pub fn new(transport: TransportHandle, options: Option<RequestOptions>) -> Self {
        let mut defaults = DefaultOptions::baseline();
        if let Some(options) = options {
            defaults.push_layer(options);
        }

        Self {
            transport,
            defaults: RwLock::new(defaults),
            object_urls: ObjectUrlRegistry::new(),
        }
    }

    /// Client over a fresh [`ReqwestTransport`] with `options` layered over
    /// the baseline
    pub fn with_options(options: RequestOptions) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), Some(options))
    }

    fn read_defaults(&self) -> RwLockReadGuard<'_, DefaultOptions> {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_defaults(&self) -> RwLockWriteGuard<'_, DefaultOptions> {
        self.defaults.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Layer `options` over the current defaults. Later calls win over
    /// earlier ones, which win over the baseline.
    pub fn set_default_options(&self, options: RequestOptions) {
        self.write_defaults().push_layer(options);
    }

    /// Discard the baseline and every layer; defaults become exactly `options`
    pub fn replace_default_options(&self, options: RequestOptions) {
        self.write_defaults().replace(options);
    }

    /// The currently resolved defaults, lazy headers still deferred
    pub fn default_options(&self) -> RequestOptions {
        self.read_defaults().resolve()
    }

    /// Registry holding the blobs behind URLs returned by `fetch_file`
    pub fn object_urls(&self) -> &ObjectUrlRegistry {
        &self.object_urls
    }

    /// Merge `options` over the defaults and evaluate every lazy header
    pub fn merge_options(&self, options: &RequestOptions) -> RequestOptions {
        let mut merged = self.default_options().merged_with(options);
        merged.headers = merged.headers.resolved();
        merged
    }

    /// GET `url` with `query` attached and parse the response as JSON.
    ///
    /// Structured queries are form-encoded; string queries are appended
    /// verbatim.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: impl Into<Query>,
        options: RequestOptions,
    ) -> Result<T> {
        let url = query.into().apply(url);
        let options = self.merge_options(&options);
        self.fetch_json(url, options).await
    }

    /// POST `params`, encoded according to the resolved Content-Type, and
    /// parse the response as JSON. A `query` option is appended to the URL.
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        params: impl Into<Body>,
        options: RequestOptions,
    ) -> Result<T> {
        let options = self.merge_options(&options).with_method(HttpMethod::Post);
        self.send_post(url, params.into(), options).await
    }

    /// POST a multipart form. The Content-Type header is removed so the
    /// transport can write the multipart boundary itself.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        url: &str,
        form: FormData,
        options: RequestOptions,
    ) -> Result<T> {
        let mut options = self.merge_options(&options).with_method(HttpMethod::Post);
        options.headers.delete("Content-Type");
        self.send_post(url, Body::Form(form), options).await
    }

    /// Shared tail of `post` and `upload`; `options` must already be merged
    async fn send_post<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Body,
        mut options: RequestOptions,
    ) -> Result<T> {
        let content_type = options.content_type();
        options.body = Some(handle_content_type(content_type.as_deref(), params)?);

        let url = match options.query.take() {
            Some(Query::Params(value)) => append_encoded(url, &stringify(&value)),
            Some(Query::Raw(raw)) => append_encoded(url, &raw),
            None => url.to_string(),
        };

        self.fetch_json(url, options).await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: String,
        options: RequestOptions,
    ) -> Result<T> {
        let mut pending = PendingRequest::start(options.timeout);
        let request = FetchRequest::from_options(url, options);

        pending
            .settle(async {
                let response = self.transport.fetch(request).await?;
                response.json()
            })
            .await
    }

    /// Download a resource and decode it according to `file_type`.
    ///
    /// Text resolves to the decoded string (`encoding` option, UTF-8 by
    /// default); every other type resolves to an object URL registered in
    /// [`RequestClient::object_urls`]. Non-success statuses fail with
    /// [`Error::FileLoad`].
    pub async fn fetch_file(
        &self,
        url: &str,
        file_type: impl Into<FileType>,
        options: RequestOptions,
    ) -> Result<String> {
        let file_type = file_type.into();
        let options = self.merge_options(&options);
        let encoding = options.encoding.clone();

        let mut pending = PendingRequest::start(options.timeout);
        let request = FetchRequest::from_options(url.to_string(), options);

        let blob = pending
            .settle(async {
                let response = self.transport.fetch(request).await?;
                if !response.ok() {
                    return Err(Error::FileLoad {
                        status: response.status,
                    });
                }

                Ok(match file_type.media_mime() {
                    Some(mime) => Blob::new(response.array_buffer(), mime),
                    None => response.blob(),
                })
            })
            .await?;

        log::debug!("Loaded {} file from {} ({} bytes)", file_type, url, blob.size());

        Ok(match file_type {
            FileType::Text => text_encoding::decode(blob.bytes(), encoding.as_deref()),
            FileType::Image | FileType::Video | FileType::Audio | FileType::Other => {
                self.object_urls.create_object_url(blob)
            }
        })
    }
}
