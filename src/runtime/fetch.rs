pub mod request;
pub mod response;

pub use request::FetchRequest;
pub use response::FetchResponse;

use super::Transport;
use super::body::{Body, FormData, FormValue};
use crate::error::{Error, Result};
use crate::options::{CachePolicy, HttpMethod, RequestMode};
use bytes::BytesMut;
use futures::future::BoxFuture;
use futures_util::StreamExt;

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'_, Result<FetchResponse>> {
        Box::pin(execute_fetch(&self.client, request))
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

/// Headers a fetch implementation adds for the given cache mode
fn cache_headers(cache: CachePolicy) -> &'static [(&'static str, &'static str)] {
    match cache {
        CachePolicy::NoStore | CachePolicy::Reload => {
            &[("Cache-Control", "no-cache"), ("Pragma", "no-cache")]
        }
        CachePolicy::NoCache => &[("Cache-Control", "max-age=0")],
        CachePolicy::Default | CachePolicy::ForceCache | CachePolicy::OnlyIfCached => &[],
    }
}

fn to_multipart(form: FormData) -> Result<reqwest::multipart::Form> {
    let mut multipart = reqwest::multipart::Form::new();

    for part in form.parts() {
        multipart = match &part.value {
            FormValue::Text(value) => multipart.text(part.name.clone(), value.clone()),
            FormValue::File {
                bytes,
                file_name,
                mime,
            } => {
                let mut file = reqwest::multipart::Part::bytes(bytes.to_vec());
                if let Some(file_name) = file_name {
                    file = file.file_name(file_name.clone());
                }
                if let Some(mime) = mime {
                    file = file.mime_str(mime)?;
                }
                multipart.part(part.name.clone(), file)
            }
        };
    }

    Ok(multipart)
}

/// Execute a request with reqwest and buffer the whole response body
pub async fn execute_fetch(
    client: &reqwest::Client,
    request: FetchRequest,
) -> Result<FetchResponse> {
    let FetchRequest {
        method,
        url,
        mode,
        cache,
        headers,
        body,
    } = request;

    if mode != RequestMode::Cors {
        log::trace!("Request mode {:?} has no effect on a native transport", mode);
    }

    let has_header = |name: &str| headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name));

    let mut req_builder = client.request(to_reqwest_method(method), &url);

    // Add headers
    for (key, value) in cache_headers(cache) {
        if !has_header(*key) {
            req_builder = req_builder.header(*key, *value);
        }
    }
    for (key, value) in &headers {
        req_builder = req_builder.header(key, value);
    }

    // Add body if present
    match body {
        Some(Body::Text(text)) => req_builder = req_builder.body(text),
        Some(Body::Bytes(bytes)) => req_builder = req_builder.body(bytes),
        Some(Body::Form(form)) => req_builder = req_builder.multipart(to_multipart(form)?),
        Some(Body::Params(_)) => {
            let content_type = headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
                .map(|(_, value)| value.clone())
                .unwrap_or_default();
            return Err(Error::Encoding {
                content_type,
                body: "structured",
            });
        }
        None => {}
    }

    log::debug!("{} {}", method, url);

    // Execute request
    let response = req_builder.send().await?;

    // Extract response data
    let status = response.status().as_u16();
    let status_text = response
        .status()
        .canonical_reason()
        .unwrap_or("")
        .to_string();

    // Extract headers
    let headers = response
        .headers()
        .iter()
        .filter_map(|(key, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (key.to_string(), value.to_string()))
        })
        .collect();

    // Read body
    let mut body = BytesMut::new();
    let mut byte_stream = response.bytes_stream();
    while let Some(chunk) = byte_stream.next().await {
        body.extend_from_slice(&chunk?);
    }

    log::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

    Ok(FetchResponse {
        status,
        status_text,
        headers,
        body: body.freeze(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_headers() {
        assert_eq!(cache_headers(CachePolicy::NoCache), &[("Cache-Control", "max-age=0")]);
        assert_eq!(cache_headers(CachePolicy::Reload).len(), 2);
        assert!(cache_headers(CachePolicy::Default).is_empty());
    }

    #[test]
    fn test_multipart_conversion() {
        let form = FormData::new()
            .text("name", "avatar")
            .file("file", &b"data"[..], Some("a.png"), Some("image/png"));
        assert!(to_multipart(form).is_ok());

        let bad = FormData::new().file("file", &b"data"[..], None, Some("not a mime"));
        assert!(to_multipart(bad).is_err());
    }

    #[tokio::test]
    async fn test_structured_body_is_rejected() {
        let request = FetchRequest {
            url: "http://127.0.0.1:9/never".into(),
            body: Some(Body::Params(serde_json::json!({"a": 1}))),
            ..Default::default()
        };
        let err = execute_fetch(&reqwest::Client::new(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Encoding { body: "structured", .. }));
    }
}
