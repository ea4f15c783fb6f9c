pub mod client;
pub mod defaults;
pub mod error;
pub mod file;
pub mod options;
pub mod runtime;

// Core API
pub use client::RequestClient;
pub use error::{Error, Result};
pub use file::FileType;
pub use options::{CachePolicy, HttpMethod, Query, RequestMode, RequestOptions};

// Fetch plumbing
pub use runtime::blob::{Blob, OBJECT_URL_SCHEME, ObjectUrlRegistry};
pub use runtime::body::{Body, FormData, FormPart, FormValue, handle_content_type};
pub use runtime::fetch::{FetchRequest, FetchResponse, ReqwestTransport};
pub use runtime::headers::{HeaderValue, Headers};
pub use runtime::timers::{PendingRequest, RequestState};
pub use runtime::{Transport, TransportHandle};

// Defaults
pub use defaults::{DEFAULT_AUTHORIZATION, DEFAULT_TIMEOUT, DefaultOptions, baseline_options};
