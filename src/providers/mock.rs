/*!
 * Mock transport implementation for testing.
 *
 * This module provides a transport that simulates the translation endpoint:
 * - `MockTransport::translating()` - Answers every request with a fake translation
 * - `MockTransport::rate_limited()` - Always answers with a throttling status
 * - `MockTransport::failing(status)` - Always answers with the given status
 * - `MockTransport::malformed()` - Answers with a body that is not JSON
 * - `MockTransport::timing_out()` - Fails every request with a timeout
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Transport, TransportResponse};

/// Key returned by the mock host page
pub const MOCK_TKK: &str = "448487.932609646";

/// Decoded view of a request seen by the mock
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Request path
    pub path: String,
    /// The `q` parameter
    pub text: String,
    /// The `sl` parameter
    pub source_language: String,
    /// The `tl` parameter
    pub target_language: String,
    /// The `tk` parameter, when signed
    pub token: Option<String>,
}

impl MockRequest {
    fn from_url(url: &Url) -> Self {
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };
        Self {
            path: url.path().to_string(),
            text: param("q").unwrap_or_default(),
            source_language: param("sl").unwrap_or_default(),
            target_language: param("tl").unwrap_or_default(),
            token: param("tk"),
        }
    }

    /// Whether this is a translation call rather than a host page fetch
    pub fn is_translation(&self) -> bool {
        self.path.ends_with("/translate_a/single")
    }
}

/// Behavior mode for the mock transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a fake translation
    Translating,
    /// Always answers 429
    RateLimited,
    /// Always answers with the given status and an empty body
    Status(u16),
    /// Answers 200 with a body that is not JSON
    Malformed,
    /// Fails every request with a timeout
    TimingOut,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock transport for testing endpoint behavior
#[derive(Debug, Clone)]
pub struct MockTransport {
    /// Behavior mode
    behavior: MockBehavior,
    /// Responses served before falling back to the behavior
    script: Arc<Mutex<VecDeque<TransportResponse>>>,
    /// Every request seen, in order
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Custom translation generator (optional)
    custom_response: Option<fn(&MockRequest) -> TransportResponse>,
}

impl MockTransport {
    /// Create a new mock transport with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// A transport that translates everything
    pub fn translating() -> Self {
        Self::new(MockBehavior::Translating)
    }

    /// A transport that is always rate-limited
    pub fn rate_limited() -> Self {
        Self::new(MockBehavior::RateLimited)
    }

    /// A transport that always answers with `status`
    pub fn failing(status: u16) -> Self {
        Self::new(MockBehavior::Status(status))
    }

    /// A transport that answers with undecodable bodies
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// A transport whose requests all time out
    pub fn timing_out() -> Self {
        Self::new(MockBehavior::TimingOut)
    }

    /// A translating transport that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Queue responses that are served before the behavior applies
    pub fn with_script(self, responses: Vec<TransportResponse>) -> Self {
        self.script.lock().extend(responses);
        self
    }

    /// Set a custom response generator for translation requests
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> TransportResponse) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    /// Fake translation used by the translating behavior
    pub fn fake_translation(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    /// Build an endpoint body with a primary translation split into chunks and
    /// optional alternate groups
    pub fn translation_body(chunks: &[&str], alternates: &[Vec<&str>]) -> String {
        let segments: Vec<Value> = chunks
            .iter()
            .map(|chunk| json!([chunk, chunk, null, null, 10]))
            .collect();
        let groups: Value = if alternates.is_empty() {
            Value::Null
        } else {
            Value::Array(
                alternates
                    .iter()
                    .map(|alts| {
                        let readings: Vec<Value> = alts.iter().map(|a| json!([a, 0, true, false])).collect();
                        json!(["source", null, readings, [[0, 6]], "source", 0, 0])
                    })
                    .collect(),
            )
        };
        json!([segments, null, "en", null, null, groups, 1.0, [], [["en"], null, [1.0], ["en"]]]).to_string()
    }

    /// Host page carrying a signing key
    pub fn host_page(tkk: &str) -> String {
        format!("<html><script>window.config={{tkk:'{}',lang:'en'}};</script></html>", tkk)
    }

    fn translate(&self, request: &MockRequest) -> TransportResponse {
        if let Some(generator) = self.custom_response {
            return generator(request);
        }
        let translation = Self::fake_translation(&request.text, &request.target_language);
        TransportResponse::new(200, Self::translation_body(&[translation.as_str()], &[]))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest::from_url(url);
        self.requests.lock().push(request.clone());

        if let Some(response) = self.script.lock().pop_front() {
            return Ok(response);
        }

        if !request.is_translation() {
            return Ok(TransportResponse::new(200, Self::host_page(MOCK_TKK)));
        }

        match self.behavior {
            MockBehavior::Translating => Ok(self.translate(&request)),
            MockBehavior::RateLimited => Ok(TransportResponse::new(429, "Too Many Requests")),
            MockBehavior::Status(status) => Ok(TransportResponse::new(status, "Simulated endpoint failure")),
            MockBehavior::Malformed => Ok(TransportResponse::new(200, "<html>captcha</html>")),
            MockBehavior::TimingOut => Err(ProviderError::BadNetwork("simulated timeout".to_string())),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.translate(&request))
            }
        }
    }
}
