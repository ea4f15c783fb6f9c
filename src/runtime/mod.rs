pub mod blob;
pub mod body;
pub mod fetch;
pub mod headers;
pub mod text_encoding;
pub mod timers;
pub mod url;

use crate::error::Result;
use fetch::{FetchRequest, FetchResponse};
use futures::future::BoxFuture;
use std::sync::Arc;

/// The underlying "perform network request" primitive.
///
/// Implementations send a fully prepared request and return the buffered
/// response. Non-success statuses are not errors at this level.
pub trait Transport: Send + Sync {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'_, Result<FetchResponse>>;
}

/// Shared handle to a transport
pub type TransportHandle = Arc<dyn Transport>;
