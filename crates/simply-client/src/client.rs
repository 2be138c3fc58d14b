//! API client for the generation webhook.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, trace};

use simply_core::outcome::{ApiResult, DeployData, Failure, GenerationData};
use simply_core::payload::RequestPayload;

use crate::protocol::ResponseEnvelope;
use crate::transport::{HttpTransport, ResponseBody, Transport, TransportError};

/// Default deadline for one call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Wraps the single webhook endpoint. Every outcome, including transport
/// errors and timeouts, comes back as an [`ApiResult`]; rendering it is the
/// caller's job.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    endpoint: String,
    timeout: Duration,
}

impl ApiClient<HttpTransport> {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self::with_transport(HttpTransport::new(), endpoint, timeout)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, endpoint: String, timeout: Duration) -> Self {
        Self {
            transport,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a chat turn.
    pub async fn call_chat(&self, payload: &RequestPayload) -> ApiResult<GenerationData> {
        self.call(payload).await
    }

    /// Send a deploy request.
    pub async fn call_deploy(&self, payload: &RequestPayload) -> ApiResult<DeployData> {
        self.call(payload).await
    }

    /// POST `payload` and fold the outcome into an [`ApiResult`].
    ///
    /// The deadline runs until the response headers arrive. When it passes
    /// the transport future is dropped, which aborts the request, so a late
    /// response has no effect. Reading the body is not timed.
    #[instrument(skip(self, payload), fields(session = %payload.session_id, deploy = payload.is_deploy()))]
    pub async fn call<D: DeserializeOwned>(&self, payload: &RequestPayload) -> ApiResult<D> {
        debug!(
            chat = %payload.chat,
            code_language = %payload.code_language,
            domain_type = %payload.domain_type,
            "Sending request"
        );
        let started = Instant::now();

        let outcome =
            tokio::time::timeout(self.timeout, self.transport.post_json(&self.endpoint, payload))
                .await;

        let response = match outcome {
            Err(_) => {
                error!(timeout_secs = self.timeout.as_secs(), "Request exceeded timeout limit");
                return ApiResult::Failure(Failure::timeout());
            }
            Ok(Err(TransportError::Unreachable(e))) => {
                error!("Failed to reach server: {}", e);
                return ApiResult::Failure(Failure::unreachable());
            }
            Ok(Err(TransportError::Other(e))) => {
                error!("Unexpected request error: {}", e);
                return ApiResult::Failure(Failure::unknown());
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(status, "Failed to read response: {}", e);
                return ApiResult::Failure(Failure::unknown());
            }
        };

        info!(
            status,
            duration = %format!("{:.2}s", started.elapsed().as_secs_f64()),
            "Response received"
        );
        trace!(body = %body, "Response body");

        match ResponseEnvelope::parse(&body) {
            Some(envelope) => {
                if !envelope.is_success() {
                    error!(msg = ?envelope.message(), "Application error");
                }
                envelope.into_result()
            }
            None => {
                error!("Response body is not a JSON object");
                ApiResult::Failure(Failure::unknown())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simply_core::outcome::{FailureKind, TIMEOUT_MESSAGE, UNREACHABLE_MESSAGE};
    use simply_core::session::{Session, Target};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Reply {
        Body(&'static str),
        Unreachable,
        Broken,
    }

    /// A reply whose body arrives `delay` after the headers.
    struct CannedResponse {
        body: String,
        delay: Duration,
    }

    impl ResponseBody for CannedResponse {
        fn status(&self) -> u16 {
            200
        }

        async fn text(self) -> Result<String, TransportError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.body)
        }
    }

    /// Answers every POST after `delay` with a canned reply.
    struct FakeTransport {
        reply: Reply,
        delay: Duration,
        body_delay: Duration,
        calls: Arc<AtomicUsize>,
        completed: Arc<AtomicBool>,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                delay: Duration::ZERO,
                body_delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
                completed: Arc::new(AtomicBool::new(false)),
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn slow_body(mut self, delay: Duration) -> Self {
            self.body_delay = delay;
            self
        }
    }

    impl Transport for FakeTransport {
        type Response = CannedResponse;

        async fn post_json(
            &self,
            _url: &str,
            _payload: &RequestPayload,
        ) -> Result<CannedResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.completed.store(true, Ordering::SeqCst);
            match self.reply {
                Reply::Body(body) => Ok(CannedResponse {
                    body: body.to_string(),
                    delay: self.body_delay,
                }),
                Reply::Unreachable => Err(TransportError::Unreachable("refused".into())),
                Reply::Broken => Err(TransportError::Other("stream closed".into())),
            }
        }
    }

    fn client(transport: FakeTransport) -> ApiClient<FakeTransport> {
        ApiClient::with_transport(transport, "http://fake/webhook".into(), DEFAULT_TIMEOUT)
    }

    fn chat_payload() -> RequestPayload {
        RequestPayload::chat(&Session::start(Target::HtmlCss), "build a hero section")
    }

    #[tokio::test]
    async fn success_returns_generation_data() {
        let client = client(FakeTransport::new(Reply::Body(
            r#"{"status":"success","data":{"code":"<h1>Hi</h1>","keynode":"bold title"}}"#,
        )));
        let result = client.call_chat(&chat_payload()).await;
        let ApiResult::Success(data) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(data.code.as_deref(), Some("<h1>Hi</h1>"));
        assert_eq!(data.keynode.as_deref(), Some("bold title"));
    }

    #[tokio::test]
    async fn deploy_success_returns_url() {
        let client = client(FakeTransport::new(Reply::Body(
            r#"{"status":"success","data":{"url":"https://x.example/site"}}"#,
        )));
        let session = Session::start(Target::HtmlCss);
        let result = client
            .call_deploy(&RequestPayload::deploy(&session, "x"))
            .await;
        assert_eq!(
            result,
            ApiResult::Success(DeployData {
                url: "https://x.example/site".into()
            })
        );
    }

    #[tokio::test]
    async fn application_error_keeps_server_message() {
        let client = client(FakeTransport::new(Reply::Body(
            r#"{"status":"error","msg":"quota exceeded"}"#,
        )));
        let result = client.call_chat(&chat_payload()).await;
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Application);
        assert_eq!(failure.message.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn unreachable_maps_to_fixed_message() {
        let client = client(FakeTransport::new(Reply::Unreachable));
        let result = client.call_chat(&chat_payload()).await;
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Unreachable);
        assert_eq!(failure.message.as_deref(), Some(UNREACHABLE_MESSAGE));
    }

    #[tokio::test]
    async fn malformed_body_is_unknown_without_message() {
        let client = client(FakeTransport::new(Reply::Body("<html>oops</html>")));
        let result = client.call_chat(&chat_payload()).await;
        assert_eq!(result, ApiResult::Failure(Failure::unknown()));
    }

    #[tokio::test]
    async fn other_transport_error_is_unknown() {
        let client = client(FakeTransport::new(Reply::Broken));
        let result = client.call_chat(&chat_payload()).await;
        assert_eq!(result, ApiResult::Failure(Failure::unknown()));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_server_times_out_and_request_is_aborted() {
        let transport = FakeTransport::new(Reply::Body(r#"{"status":"success","data":{}}"#))
            .delayed(DEFAULT_TIMEOUT + Duration::from_secs(60));
        let completed = transport.completed.clone();
        let calls = transport.calls.clone();
        let client = client(transport);

        let result = client.call_chat(&chat_payload()).await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.message.as_deref(), Some(TIMEOUT_MESSAGE));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Well past the server's reply time: the dropped request never finishes.
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn reply_just_inside_deadline_succeeds() {
        let transport = FakeTransport::new(Reply::Body(
            r#"{"status":"success","data":{"code":"<p>late</p>"}}"#,
        ))
        .delayed(DEFAULT_TIMEOUT - Duration::from_secs(1));
        let client = client(transport);
        let result = client.call_chat(&chat_payload()).await;
        assert!(result.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_body_after_headers_is_not_cut_off() {
        let transport = FakeTransport::new(Reply::Body(
            r#"{"status":"success","data":{"code":"<p>big</p>"}}"#,
        ))
        .delayed(Duration::from_secs(1))
        .slow_body(DEFAULT_TIMEOUT + Duration::from_secs(60));
        let client = client(transport);
        let result = client.call_chat(&chat_payload()).await;
        let ApiResult::Success(data) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(data.code.as_deref(), Some("<p>big</p>"));
    }

    #[tokio::test]
    async fn real_http_round_trip() {
        let (url, _req) = crate::transport::tests::serve_once(
            r#"{"status":"success","data":{"code":"<h1>Hi</h1>"}}"#,
        )
        .await;
        let client = ApiClient::new(url, DEFAULT_TIMEOUT);
        let result = client.call_chat(&chat_payload()).await;
        let ApiResult::Success(data) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(data.code.as_deref(), Some("<h1>Hi</h1>"));
    }
}
