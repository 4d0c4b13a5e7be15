//! HTTP transport used by the fetcher.
//!
//! The fetcher only needs "send this request, give me status and body", so
//! the network sits behind the [`Transport`] trait. [`HttpTransport`] is the
//! reqwest-backed implementation used in production.

use super::error::TransportError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};

/// Caller-supplied request options, re-sent unchanged on every attempt
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// A request as handed to the fetcher
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub options: RequestOptions,
}

impl FetchRequest {
    /// Plain GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }
}

/// Status and fully-read body of a response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Something that can dispatch a single HTTP request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &FetchRequest) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport
///
/// No request timeout is set; a dispatched request runs until the server
/// answers or the connection fails.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given user agent
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &FetchRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.options.method.clone(), &request.url)
            .headers(request.options.headers.clone());

        if let Some(body) = &request.options.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}
