/*!
 * Tests for the endpoint client over the mock transport
 */

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use paratrans::errors::ProviderError;
use paratrans::providers::google::{GoogleTranslate, TranslateParams};
use paratrans::providers::mock::{MockRequest, MockTransport, MOCK_TKK};
use paratrans::providers::token::{sign_with_key, Clock, TokenCipher};
use paratrans::providers::TransportResponse;

fn client(transport: &MockTransport) -> GoogleTranslate {
    GoogleTranslate::new(Arc::new(transport.clone()), "example.com")
}

fn params(tries: u32) -> TranslateParams {
    TranslateParams::new("en", "fr").with_retry(tries, Duration::from_millis(1))
}

#[derive(Debug)]
struct FixedClock(chrono::DateTime<chrono::Utc>);

impl Clock for FixedClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.0
    }
}

fn clock_for_key(key: &str) -> Arc<FixedClock> {
    let hour: i64 = key.split('.').next().unwrap().parse().unwrap();
    let time = chrono::DateTime::from_timestamp_millis(hour * 3_600_000 + 60_000).unwrap();
    Arc::new(FixedClock(time))
}

#[test]
fn test_build_url_shouldCarryEveryQueryParameter() {
    let transport = MockTransport::translating();
    let url = client(&transport)
        .build_url("a & b", "en", "fr", Some("1.2"))
        .unwrap();

    assert_eq!(url.host_str(), Some("translate.example.com"));
    assert_eq!(url.path(), "/translate_a/single");

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |name: &str| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
    assert_eq!(get("client"), Some("gtx"));
    assert_eq!(get("sl"), Some("en"));
    assert_eq!(get("tl"), Some("fr"));
    assert_eq!(get("hl"), Some("fr"));
    assert_eq!(get("ie"), Some("UTF-8"));
    assert_eq!(get("oe"), Some("UTF-8"));
    assert_eq!(get("otf"), Some("1"));
    assert_eq!(get("kc"), Some("7"));
    assert_eq!(get("q"), Some("a & b"));
    assert_eq!(get("tk"), Some("1.2"));

    let data_types: Vec<&str> = pairs.iter().filter(|(k, _)| k == "dt").map(|(_, v)| v.as_str()).collect();
    assert_eq!(data_types, vec!["at", "bd", "ex", "ld", "md", "qca", "rw", "rm", "ss", "t"]);
}

#[tokio::test]
async fn test_translate_withWorkingEndpoint_shouldReturnPrimarySlot() {
    let transport = MockTransport::translating();

    let slots = client(&transport).translate("Hello.", &params(2)).await.unwrap();

    assert_eq!(slots, vec!["[fr] Hello.".to_string()]);
    assert_eq!(transport.request_count(), 1);
    assert!(transport.requests()[0].token.is_none());
}

#[tokio::test]
async fn test_translate_withAlwaysRateLimited_shouldStopAfterExactlyTries() {
    for tries in [1u32, 2, 5] {
        let transport = MockTransport::rate_limited();

        let result = client(&transport).translate("Hello.", &params(tries)).await;

        assert!(matches!(result, Err(ProviderError::RateLimitExceeded { attempts }) if attempts == tries));
        assert_eq!(transport.request_count(), tries as usize);
    }
}

#[tokio::test]
async fn test_translate_withZeroTries_shouldUseDefaultOfTwo() {
    let transport = MockTransport::rate_limited();

    let result = client(&transport).translate("Hello.", &params(0)).await;

    assert!(matches!(result, Err(ProviderError::RateLimitExceeded { attempts: 2 })));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_translate_withRateLimitThenSuccess_shouldRetry() {
    let transport = MockTransport::translating().with_script(vec![
        TransportResponse::new(403, "Forbidden"),
        TransportResponse::new(429, "Too Many Requests"),
    ]);

    let slots = client(&transport).translate("Hi", &params(3)).await.unwrap();

    assert_eq!(slots[0], "[fr] Hi");
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_translate_withServerError_shouldNotRetry() {
    let transport = MockTransport::failing(503);

    let result = client(&transport).translate("Hi", &params(3)).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 503, .. })));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withTimeout_shouldBeBadNetwork() {
    let transport = MockTransport::timing_out();

    let result = client(&transport).translate("Hi", &params(3)).await;

    assert!(matches!(result, Err(ProviderError::BadNetwork(_))));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withMalformedBody_shouldBeParseError() {
    let transport = MockTransport::malformed();

    let result = client(&transport).translate("Hi", &params(2)).await;

    assert!(matches!(result, Err(ProviderError::ParseError(_))));
}

#[tokio::test]
async fn test_translate_withInvalidLanguages_shouldSubstituteFallbacks() {
    let transport = MockTransport::translating();
    let params = TranslateParams::new("not a tag", "???").with_retry(1, Duration::from_millis(1));

    let slots = client(&transport).translate("Hi", &params).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.source_language, "auto");
    assert_eq!(request.target_language, "en");
    assert_eq!(slots[0], "[en] Hi");
}

#[tokio::test]
async fn test_translate_withAlternates_shouldExposeSecondarySlots() {
    fn with_alternates(_: &MockRequest) -> TransportResponse {
        TransportResponse::new(
            200,
            MockTransport::translation_body(&["Bonjour ", "le monde"], &[vec!["Salut ", "Coucou "], vec!["la terre"]]),
        )
    }
    let transport = MockTransport::translating().with_custom_response(with_alternates);

    let slots = client(&transport).translate("Hello world", &params(1)).await.unwrap();

    assert_eq!(
        slots,
        vec!["Bonjour le monde".to_string(), "Salut la terre".to_string(), "Coucou ".to_string()]
    );
}

#[tokio::test]
async fn test_translate_withSigning_shouldAttachToken() {
    let transport = MockTransport::translating();
    let client = client(&transport).with_signing(clock_for_key(MOCK_TKK));

    client.translate("Hello, world", &params(1)).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].is_translation());
    assert_eq!(requests[1].token.as_deref(), Some(sign_with_key("Hello, world", MOCK_TKK).as_str()));
    assert_eq!(requests[1].token.as_deref(), Some("685460.828019"));
}

#[tokio::test]
async fn test_translate_withSharedCipher_shouldFetchKeyOncePerHour() {
    let transport = MockTransport::translating();
    let cipher = Arc::new(TokenCipher::new(
        Arc::new(transport.clone()),
        "example.com",
        clock_for_key(MOCK_TKK),
    ));
    let client = client(&transport).with_cipher(cipher.clone());

    client.translate("one", &params(1)).await.unwrap();
    client.translate("two", &params(1)).await.unwrap();

    let page_fetches = transport.requests().iter().filter(|r| !r.is_translation()).count();
    assert_eq!(page_fetches, 1);
    assert!(cipher.last_refreshed().await.is_some());
}

#[tokio::test]
async fn test_translate_sentences_shouldDeduplicateTranslations() {
    fn repeated(request: &MockRequest) -> TransportResponse {
        let text = format!("<{}>", request.text);
        TransportResponse::new(
            200,
            MockTransport::translation_body(&[text.as_str()], &[vec![text.as_str(), "other"]]),
        )
    }
    let transport = MockTransport::translating().with_custom_response(repeated);

    let columns = client(&transport)
        .translate_sentences("One. Two", &params(1))
        .await
        .unwrap();

    assert_eq!(columns, vec!["One.: <One.> other".to_string(), "Two: <Two> other".to_string()]);
}

#[tokio::test]
async fn test_vocabulary_shouldSkipStopWordsAndRepeats() {
    let transport = MockTransport::translating();
    let stop_words: HashSet<String> = ["the".to_string()].into_iter().collect();

    let columns = client(&transport)
        .vocabulary("The cat, the Cat!", &params(1), &stop_words)
        .await
        .unwrap();

    assert_eq!(columns, vec!["cat: [fr] cat.".to_string()]);
    assert_eq!(transport.request_count(), 1);
}
