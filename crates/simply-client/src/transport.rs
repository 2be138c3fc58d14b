//! The wire seam: one JSON POST, then reading the reply body.
//!
//! [`ApiClient`](crate::ApiClient) is generic over [`Transport`] so the chat
//! and deploy orchestration can be driven without a network.

use std::future::Future;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use simply_core::payload::RequestPayload;

#[derive(Error, Debug)]
pub enum TransportError {
    /// The request never got a response: DNS, refused, reset, TLS.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("request failed: {0}")]
    Other(String),
}

pub trait Transport: Send + Sync {
    type Response: ResponseBody;

    /// Resolves once the response headers have arrived.
    fn post_json(
        &self,
        url: &str,
        payload: &RequestPayload,
    ) -> impl Future<Output = Result<Self::Response, TransportError>> + Send;
}

/// A response whose headers are in and whose body may still be streaming.
pub trait ResponseBody: Send {
    fn status(&self) -> u16;

    fn text(self) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// reqwest-backed transport. Sets `Content-Type: application/json`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        // No client-level timeout: ApiClient owns the deadline, and it ends
        // when the headers arrive.
        let client = Client::builder()
            .user_agent(concat!("simply/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    type Response = reqwest::Response;

    async fn post_json(
        &self,
        url: &str,
        payload: &RequestPayload,
    ) -> Result<reqwest::Response, TransportError> {
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(classify)?;
        debug!(status = resp.status().as_u16(), "Webhook responded");
        Ok(resp)
    }
}

impl ResponseBody for reqwest::Response {
    fn status(&self) -> u16 {
        reqwest::Response::status(self).as_u16()
    }

    async fn text(self) -> Result<String, TransportError> {
        reqwest::Response::text(self)
            .await
            .map_err(|e| TransportError::Other(format!("failed to read body: {e}")))
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_request() || err.is_timeout() {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
