/*!
 * Request-signing token cipher.
 *
 * The endpoint can validate requests with a `tk` parameter derived from the
 * request text and a key (`tkk`) published on the endpoint's host page. The
 * key's integer prefix is the number of hours since the Unix epoch, so a key is
 * stale once the hour rolls over.
 *
 * `TokenCipher` owns the cached key, refreshes it at most once per hour through
 * an injected transport and clock, and computes signatures with `sign_with_key`,
 * which is pure and usable on its own.
 */

use chrono::{DateTime, Utc};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Transport;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const PER_UNIT_PROGRAM: &str = "+-a^+6";
const FINAL_PROGRAM: &str = "+-3^+b+-f";
const INITIAL_KEY: &str = "0";

static TKK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tkk:\s?'(.+?)'").expect("tkk pattern is a valid regex"));

/// Source of the current time
pub trait Clock: Send + Sync + Debug {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct KeyState {
    key: String,
    last_refreshed: Option<DateTime<Utc>>,
    // Last fetch attempt, successful or not; at most one per hour
    last_attempt: Option<DateTime<Utc>>,
}

/// Cached signing key plus the cipher that uses it
#[derive(Debug)]
pub struct TokenCipher {
    transport: Arc<dyn Transport>,
    host: String,
    clock: Arc<dyn Clock>,
    state: Mutex<KeyState>,
}

impl TokenCipher {
    /// Create a cipher with the initial key `"0"`
    pub fn new(transport: Arc<dyn Transport>, host: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            host: host.into(),
            clock,
            state: Mutex::new(KeyState {
                key: INITIAL_KEY.to_string(),
                last_refreshed: None,
                last_attempt: None,
            }),
        }
    }

    /// Seed the cache with a known key
    pub fn with_key(self, key: impl Into<String>) -> Self {
        let now = self.clock.now();
        let state = KeyState {
            key: key.into(),
            last_refreshed: Some(now),
            last_attempt: Some(now),
        };
        Self {
            state: Mutex::new(state),
            ..self
        }
    }

    /// The cached key
    pub async fn key(&self) -> String {
        self.state.lock().await.key.clone()
    }

    /// When the key was last fetched or seeded
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_refreshed
    }

    /// Refresh the key if its hour has passed; returns whether a fetch happened
    ///
    /// Only one fetch is attempted per hour: after a failed attempt the cached
    /// key is kept until the hour rolls over.
    pub async fn update(&self) -> Result<bool, ProviderError> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        if !is_stale(&state.key, now) {
            return Ok(false);
        }
        if state.last_attempt.is_some_and(|attempt| same_hour(attempt, now)) {
            return Ok(false);
        }
        state.last_attempt = Some(now);

        let url = Url::parse(&format!("https://translate.{}", self.host))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid host '{}': {}", self.host, e)))?;
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(ProviderError::ApiError {
                status_code: response.status,
                message: "failed to fetch signing key page".to_string(),
            });
        }

        let key = extract_key(&response.body)
            .ok_or_else(|| ProviderError::ParseError("no tkk value on host page".to_string()))?;
        debug!("Signing key refreshed: {}", key);
        state.key = key;
        state.last_refreshed = Some(now);
        Ok(true)
    }

    /// Refresh if needed, then sign `text`; a failed refresh signs with the cached key
    pub async fn get(&self, text: &str) -> String {
        if let Err(e) = self.update().await {
            warn!("Could not refresh signing key, using cached key: {}", e);
        }
        let key = self.key().await;
        sign_with_key(text, &key)
    }
}

/// Pull the `tkk:'...'` value out of a host page
pub fn extract_key(page: &str) -> Option<String> {
    TKK_PATTERN
        .captures(page)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Integer part of a key, `0` when it does not parse
pub fn key_prefix(key: &str) -> i64 {
    key.split('.')
        .next()
        .and_then(|prefix| prefix.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Whether a key belongs to an hour other than the one containing `now`
pub fn is_stale(key: &str, now: DateTime<Utc>) -> bool {
    key_prefix(key) != now.timestamp_millis().div_euclid(MILLIS_PER_HOUR)
}

fn same_hour(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.timestamp_millis().div_euclid(MILLIS_PER_HOUR) == b.timestamp_millis().div_euclid(MILLIS_PER_HOUR)
}

/// Compute the `tk` signature of `text` under `key`
pub fn sign_with_key(text: &str, key: &str) -> String {
    let prefix = key_prefix(key) as u32;

    let mut acc = prefix;
    for unit in utf8_units(text) {
        acc = transform(acc.wrapping_add(unit), PER_UNIT_PROGRAM);
    }
    acc = transform(acc, FINAL_PROGRAM);
    acc ^= prefix;

    let result = acc % 1_000_000;
    format!("{}.{}", result, result ^ prefix)
}

// UTF-16 code units re-encoded as UTF-8 byte values, joining surrogate pairs
fn utf8_units(text: &str) -> Vec<u32> {
    let units: Vec<u32> = text.encode_utf16().map(u32::from).collect();
    let mut out = Vec::with_capacity(units.len() * 3);

    let mut i = 0;
    while i < units.len() {
        let mut c = units[i];
        if c < 0x80 {
            out.push(c);
        } else {
            if c < 0x800 {
                out.push((c >> 6) | 0xC0);
            } else {
                let next_is_low = units.get(i + 1).is_some_and(|n| n & 0xFC00 == 0xDC00);
                if c & 0xFC00 == 0xD800 && next_is_low {
                    c = 0x10000 + ((c & 0x3FF) << 10) + (units[i + 1] & 0x3FF);
                    i += 1;
                    out.push((c >> 18) | 0xF0);
                    out.push(((c >> 12) & 0x3F) | 0x80);
                } else {
                    out.push((c >> 12) | 0xE0);
                }
                out.push(((c >> 6) & 0x3F) | 0x80);
            }
            out.push((c & 0x3F) | 0x80);
        }
        i += 1;
    }

    out
}

// Each 3-char group is (op, direction, amount): '+' op adds, otherwise xor;
// '+' direction shifts right (logical), otherwise left; amount is a digit or a letter from 'a' = 10
fn transform(mut acc: u32, program: &str) -> u32 {
    for op in program.as_bytes().chunks_exact(3) {
        let amount = if op[2] >= b'a' {
            u32::from(op[2] - 87)
        } else {
            u32::from(op[2].wrapping_sub(b'0'))
        };
        let shifted = if op[1] == b'+' {
            acc.checked_shr(amount).unwrap_or(0)
        } else {
            acc.checked_shl(amount).unwrap_or(0)
        };
        acc = if op[0] == b'+' {
            acc.wrapping_add(shifted)
        } else {
            acc ^ shifted
        };
    }
    acc
}
