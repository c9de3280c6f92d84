/*!
 * Client for the web translation endpoint.
 *
 * `GoogleTranslate` builds the query for `translate_a/single`, runs it through a
 * `Transport` with a bounded retry loop on rate-limiting statuses, and decodes
 * the positional response into translation slots (slot 0 is the primary
 * translation, further slots hold alternates).
 */

use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::EndpointConfig;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::decoder;
use crate::providers::token::{Clock, SystemClock, TokenCipher};
use crate::providers::Transport;
use crate::text_segmenter;

/// Attempts used when a caller passes `tries == 0`
pub const DEFAULT_TRIES: u32 = 2;

const TRANSLATE_PATH: &str = "translate_a/single";
const DATA_TYPES: [&str; 10] = ["at", "bd", "ex", "ld", "md", "qca", "rw", "rm", "ss", "t"];

/// Parameters of one translation call
#[derive(Debug, Clone)]
pub struct TranslateParams {
    /// Source language tag, or "auto"
    pub from: String,
    /// Target language tag
    pub to: String,
    /// Attempts while rate-limited
    pub tries: u32,
    /// Pause between rate-limited attempts
    pub delay: Duration,
}

impl TranslateParams {
    /// Create parameters with the default retry policy
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            tries: DEFAULT_TRIES,
            delay: Duration::from_millis(500),
        }
    }

    /// Override the retry policy
    pub fn with_retry(mut self, tries: u32, delay: Duration) -> Self {
        self.tries = tries;
        self.delay = delay;
        self
    }

    /// Parameters for an endpoint configuration
    pub fn from_config(from: &str, to: &str, config: &EndpointConfig) -> Self {
        Self::new(from, to).with_retry(config.tries, config.retry_delay())
    }

    fn attempts(&self) -> u32 {
        if self.tries == 0 { DEFAULT_TRIES } else { self.tries }
    }
}

/// Endpoint client
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// Transport used for every request
    transport: Arc<dyn Transport>,
    /// Host suffix, requests go to translate.<host>
    host: String,
    /// Signing cipher, when requests are signed
    cipher: Option<Arc<TokenCipher>>,
}

impl GoogleTranslate {
    /// Create an unsigned client
    pub fn new(transport: Arc<dyn Transport>, host: impl Into<String>) -> Self {
        Self {
            transport,
            host: host.into(),
            cipher: None,
        }
    }

    /// Create a client from the endpoint configuration
    pub fn from_config(transport: Arc<dyn Transport>, config: &EndpointConfig) -> Self {
        let client = Self::new(transport, config.host.clone());
        if config.sign_requests {
            client.with_signing(Arc::new(SystemClock))
        } else {
            client
        }
    }

    /// Sign every request with a `tk` token, refreshing the key through `clock`
    pub fn with_signing(mut self, clock: Arc<dyn Clock>) -> Self {
        let cipher = TokenCipher::new(self.transport.clone(), self.host.clone(), clock);
        self.cipher = Some(Arc::new(cipher));
        self
    }

    /// Sign with an already configured cipher
    pub fn with_cipher(mut self, cipher: Arc<TokenCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Build the request URL for one call
    pub fn build_url(&self, text: &str, from: &str, to: &str, token: Option<&str>) -> Result<Url, ProviderError> {
        let base = format!("https://translate.{}/{}", self.host, TRANSLATE_PATH);
        let mut url = Url::parse(&base)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint URL '{}': {}", base, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client", "gtx")
                .append_pair("sl", from)
                .append_pair("tl", to)
                .append_pair("hl", to)
                .append_pair("ie", "UTF-8")
                .append_pair("oe", "UTF-8")
                .append_pair("otf", "1")
                .append_pair("ssel", "0")
                .append_pair("tsel", "0")
                .append_pair("kc", "7")
                .append_pair("q", text);
            for data_type in DATA_TYPES {
                query.append_pair("dt", data_type);
            }
            if let Some(token) = token {
                query.append_pair("tk", token);
            }
        }

        Ok(url)
    }

    /// Translate `text`; returns the primary translation followed by alternate slots
    pub async fn translate(&self, text: &str, params: &TranslateParams) -> Result<Vec<String>, ProviderError> {
        let from = language_utils::resolve_source_language(&params.from);
        let to = language_utils::resolve_target_language(&params.to);

        let token = match &self.cipher {
            Some(cipher) => Some(cipher.get(text).await),
            None => None,
        };
        let url = self.build_url(text, &from, &to, token.as_deref())?;

        let attempts = params.attempts();
        for attempt in 1..=attempts {
            let response = self.transport.get(&url).await?;

            if response.is_rate_limited() {
                warn!(
                    "Endpoint rate-limited the request (status {}) - attempt {}/{}",
                    response.status, attempt, attempts
                );
                if attempt < attempts {
                    tokio::time::sleep(params.delay).await;
                }
                continue;
            }

            if !response.is_success() {
                return Err(ProviderError::ApiError {
                    status_code: response.status,
                    message: response.body,
                });
            }

            debug!("Translated {} chars {} -> {}", text.len(), from, to);
            return decoder::decode(&response.body);
        }

        Err(ProviderError::RateLimitExceeded { attempts })
    }

    /// Translate each sentence of `text` on its own, one `"<sentence>: <t1> <t2>"` column per sentence
    pub async fn translate_sentences(&self, text: &str, params: &TranslateParams) -> Result<Vec<String>, ProviderError> {
        let mut columns = Vec::new();

        for sentence in text_segmenter::split_into_sentences(text) {
            let slots = self.translate(&sentence, params).await?;

            let mut seen = HashSet::new();
            let unique: Vec<&str> = slots
                .iter()
                .map(String::as_str)
                .filter(|t| !t.is_empty() && seen.insert(*t))
                .collect();

            columns.push(format!("{}: {}", sentence, unique.join(" ")));
        }

        Ok(columns)
    }

    /// Translate each distinct non-stop word of `text`, one `"<word>: <t1>,<t2>."` column per word
    pub async fn vocabulary(
        &self,
        text: &str,
        params: &TranslateParams,
        stop_words: &HashSet<String>,
    ) -> Result<Vec<String>, ProviderError> {
        let mut columns = Vec::new();

        for word in text_segmenter::unique_words(text, stop_words) {
            let slots = self.translate(&word, params).await?;
            let meanings: Vec<&str> = slots
                .iter()
                .map(String::as_str)
                .filter(|t| !t.is_empty())
                .collect();

            columns.push(format!("{}: {}.", word, meanings.join(",")));
        }

        Ok(columns)
    }
}
