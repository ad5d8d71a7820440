//! Mock HTTP client for testing.
//!
//! Streaming responses are scripted per URL as a queue: each `post_stream`
//! call pops the next script, so one mock can serve a whole multi-turn
//! conversation. Buffered GET responses are matched by URL.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Parse the body as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Configuration for a mock buffered response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response
    Success(Response),
    /// Fail before any response is produced
    Error(HttpError),
}

/// Script for a single streaming response.
#[derive(Debug, Clone)]
pub enum MockStream {
    /// Deliver these chunks, then end normally
    Chunks { status: u16, chunks: Vec<Bytes> },
    /// Deliver these chunks, then fail with a connection error
    ChunksThenError {
        chunks: Vec<Bytes>,
        error: HttpError,
    },
    /// Deliver these chunks, then never yield again
    ChunksThenHang { chunks: Vec<Bytes> },
    /// Respond with a status but no body at all
    NoBody { status: u16 },
    /// Fail before any response is produced
    ConnectError(HttpError),
}

impl MockStream {
    /// 200 response delivering `chunks` in order.
    pub fn ok<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        MockStream::Chunks {
            status: 200,
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }

    /// Non-streaming error response with a text body.
    pub fn status(status: u16, body: impl Into<Bytes>) -> Self {
        MockStream::Chunks {
            status,
            chunks: vec![body.into()],
        }
    }

    fn into_response(self) -> Result<StreamResponse, HttpError> {
        fn iter_body(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> {
            futures::stream::iter(chunks.into_iter().map(Ok))
        }

        match self {
            MockStream::Chunks { status, chunks } => {
                let body: ByteStream = Box::pin(iter_body(chunks));
                Ok(StreamResponse::new(status, body))
            }
            MockStream::ChunksThenError { chunks, error } => {
                use futures::StreamExt;
                let body: ByteStream =
                    Box::pin(iter_body(chunks).chain(futures::stream::once(async move {
                        Err(error)
                    })));
                Ok(StreamResponse::new(200, body))
            }
            MockStream::ChunksThenHang { chunks } => {
                use futures::StreamExt;
                let body: ByteStream = Box::pin(
                    iter_body(chunks).chain(futures::stream::pending::<Result<Bytes, HttpError>>()),
                );
                Ok(StreamResponse::new(200, body))
            }
            MockStream::NoBody { status } => Ok(StreamResponse::without_body(status)),
            MockStream::ConnectError(error) => Err(error),
        }
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use botchat::adapters::mock::{MockHttpClient, MockStream};
///
/// let client = MockHttpClient::new();
/// client.push_stream(
///     "http://chat.test/fn",
///     MockStream::ok(["data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n", "data: [DONE]\n"]),
/// );
///
/// let response = client.post_stream("http://chat.test/fn", "{}", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Buffered GET responses by URL
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Scripted streaming responses by URL, consumed in order
    streams: Arc<Mutex<HashMap<String, VecDeque<MockStream>>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffered response for a URL (exact match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Queue a streaming response for the next POST to `url`.
    pub fn push_stream(&self, url: &str, stream: MockStream) {
        let mut streams = self.streams.lock().unwrap();
        streams.entry(url.to_string()).or_default().push_back(stream);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of queued streaming responses not yet consumed.
    pub fn pending_streams(&self) -> usize {
        self.streams.lock().unwrap().values().map(VecDeque::len).sum()
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);

        let response = self.responses.lock().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        let script = self
            .streams
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);
        match script {
            Some(script) => script.into_response(),
            None => Err(HttpError::Other(format!("No mock stream for URL: {}", url))),
        }
    }
}
