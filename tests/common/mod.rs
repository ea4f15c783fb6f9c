#![allow(dead_code)]

use futures::future::BoxFuture;
use openworkers_http_client::{
    FetchRequest, FetchResponse, RequestClient, RequestOptions, Result, Transport,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Reply = std::result::Result<FetchResponse, String>;

/// Transport that records every request and answers from a queue of replies.
/// An empty queue answers `200 {}`.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<FetchRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every reply is delivered after `delay`
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn reply(&self, response: FetchResponse) {
        self.replies.lock().unwrap().push_back(Ok(response));
    }

    pub fn reply_json(&self, status: u16, body: &Value) {
        self.reply(
            FetchResponse::new(status, body.to_string())
                .with_header("Content-Type", "application/json"),
        );
    }

    pub fn reply_bytes(&self, status: u16, content_type: &str, body: &'static [u8]) {
        self.reply(FetchResponse::new(status, body).with_header("Content-Type", content_type));
    }

    pub fn reply_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> FetchRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was dispatched")
    }
}

impl Transport for MockTransport {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'_, Result<FetchResponse>> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(FetchResponse::new(200, "{}")));
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            reply.map_err(openworkers_http_client::Error::Transport)
        })
    }
}

/// Client over `transport` with the built-in baseline defaults
pub fn client_with(transport: &Arc<MockTransport>) -> RequestClient {
    RequestClient::new(transport.clone(), None)
}

/// Client over `transport` with initial options layered over the baseline
pub fn client_with_options(transport: &Arc<MockTransport>, options: RequestOptions) -> RequestClient {
    RequestClient::new(transport.clone(), Some(options))
}

/// Raw HTTP request captured by [`TestServer`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// Minimal HTTP/1.1 server answering every connection with a fixed response
pub struct TestServer {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(status: u16, content_type: &str, body: &[u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let captured = Arc::new(Mutex::new(Vec::new()));

        let mut response = format!(
            "HTTP/1.1 {} TEST\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            content_type,
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);

        let sink = captured.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let sink = sink.clone();
                let response = response.clone();

                tokio::spawn(async move {
                    if let Some(request) = read_request(&mut socket).await {
                        sink.lock().unwrap().push(request);
                    }
                    let _ = socket.write_all(&response).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            captured,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).to_string();
    let request = CapturedRequest {
        head,
        body: Vec::new(),
    };
    let length = request
        .header("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[head_end..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest { body, ..request })
}
