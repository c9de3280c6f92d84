/*!
 * Translation endpoint integration.
 *
 * This module contains the pieces that talk to the web translation endpoint:
 * - `http`: reqwest-backed transport
 * - `mock`: scripted transport for tests
 * - `decoder`: positional decoding of the endpoint's nested-array responses
 * - `token`: request-signing key cache and cipher
 * - `google`: the endpoint client with its rate-limit retry policy
 */

use async_trait::async_trait;
use std::fmt::Debug;
use url::Url;

use crate::errors::ProviderError;

/// Raw HTTP answer handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the endpoint throttled the caller
    pub fn is_rate_limited(&self) -> bool {
        self.status == 403 || self.status == 429
    }
}

/// Common trait for everything that can execute a GET against the endpoint
///
/// The endpoint client and the token cipher are written against this trait so
/// that tests can script responses without a network.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Issue a GET request
    ///
    /// # Arguments
    /// * `url` - Fully built request URL
    ///
    /// # Returns
    /// * `Result<TransportResponse, ProviderError>` - Status and body, or a transport failure
    async fn get(&self, url: &Url) -> Result<TransportResponse, ProviderError>;
}

pub mod decoder;
pub mod google;
pub mod http;
pub mod mock;
pub mod token;
