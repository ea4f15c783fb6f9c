//! Default request options owned by a [`crate::RequestClient`].
//!
//! Defaults are a base option set plus an ordered list of override layers.
//! Resolving folds the layers over the base in registration order, so the
//! most recent layer wins per key and header maps merge key-by-key.

use crate::options::{CachePolicy, HttpMethod, RequestMode, RequestOptions};
use std::time::Duration;

/// Token sent in the `authorization` header by the built-in baseline
pub const DEFAULT_AUTHORIZATION: &str = "5754415b44514b555343443a50372e57443d26553c";

/// Timeout applied by the built-in baseline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Built-in baseline: GET, cors, no-cache, JSON content type, fixed token,
/// 30s timeout, no body.
pub fn baseline_options() -> RequestOptions {
    RequestOptions::new()
        .with_method(HttpMethod::Get)
        .with_mode(RequestMode::Cors)
        .with_cache(CachePolicy::NoCache)
        .with_timeout(DEFAULT_TIMEOUT)
        .with_header("Content-Type", "application/json")
        .with_header("authorization", DEFAULT_AUTHORIZATION)
}

#[derive(Debug, Clone)]
pub struct DefaultOptions {
    base: RequestOptions,
    layers: Vec<RequestOptions>,
}

impl Default for DefaultOptions {
    fn default() -> Self {
        Self::baseline()
    }
}

impl DefaultOptions {
    pub fn baseline() -> Self {
        Self {
            base: baseline_options(),
            layers: Vec::new(),
        }
    }

    /// Add an override layer on top of every previous one
    pub fn push_layer(&mut self, options: RequestOptions) {
        self.layers.push(options);
    }

    /// Drop the base and every layer; `options` becomes the new base as-is
    pub fn replace(&mut self, options: RequestOptions) {
        self.base = options;
        self.layers.clear();
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Current defaults. Lazy header values are left deferred.
    pub fn resolve(&self) -> RequestOptions {
        self.layers
            .iter()
            .fold(self.base.clone(), |resolved, layer| resolved.merged_with(layer))
    }
}
