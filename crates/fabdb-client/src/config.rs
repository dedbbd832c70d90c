//! Client configuration types.

use fabdb_core::{FabDbError, Result};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the public API key
pub const API_KEY_ENV: &str = "FABDB_API_KEY";

/// Environment variable holding the secret key
pub const SECRET_KEY_ENV: &str = "FABDB_SECRET_KEY";

/// API key pair used to sign requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create credentials from a public key and its secret
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Combine optional halves; both or neither must be given
    pub fn from_parts(api_key: Option<String>, secret_key: Option<String>) -> Result<Option<Self>> {
        match (api_key, secret_key) {
            (Some(key), Some(secret)) => Ok(Some(Self::new(key, secret))),
            (None, None) => Ok(None),
            _ => Err(FabDbError::Config(
                "api key and secret key must be provided together".into(),
            )),
        }
    }

    /// Read `FABDB_API_KEY` and `FABDB_SECRET_KEY`
    pub fn from_env() -> Result<Option<Self>> {
        let read = |name| std::env::var(name).ok().filter(|v: &String| !v.is_empty());
        Self::from_parts(read(API_KEY_ENV), read(SECRET_KEY_ENV))
    }

    /// The public API key
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request sent at `time` (unix seconds)
    #[must_use]
    pub fn sign(&self, time: i64) -> Signature {
        let digest = ring::digest::digest(
            &ring::digest::SHA512,
            format!("{}{time}", self.secret_key).as_bytes(),
        );

        Signature {
            authorization: format!("Bearer {}", self.api_key),
            time: time.to_string(),
            hash: hex::encode(digest.as_ref()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Request signature for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Value of the `Authorization` header
    pub authorization: String,
    /// `time` query parameter
    pub time: String,
    /// `hash` query parameter
    pub hash: String,
}

/// Retry configuration for failed requests
///
/// Retries are off by default; the pager never retries on its own.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Whether to retry on rate limit errors
    pub retry_on_rate_limit: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Create a new retry configuration with retries disabled
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_on_rate_limit: true,
        }
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set initial backoff duration
    #[must_use]
    pub const fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set maximum backoff duration
    #[must_use]
    pub const fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate backoff for a given attempt
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let initial = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let backoff = initial.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(backoff.min(max))
    }

    /// Whether a failed attempt with this status should be retried
    #[must_use]
    pub fn should_retry(&self, status: Option<u16>) -> bool {
        match status {
            None => true,
            Some(429) => self.retry_on_rate_limit,
            Some(s) => (500..600).contains(&s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_must_pair() {
        assert!(Credentials::from_parts(None, None).unwrap().is_none());
        assert!(Credentials::from_parts(Some("k".into()), Some("s".into()))
            .unwrap()
            .is_some());
        assert!(matches!(
            Credentials::from_parts(Some("k".into()), None),
            Err(FabDbError::Config(_))
        ));
        assert!(Credentials::from_parts(None, Some("s".into())).is_err());
    }

    #[test]
    fn test_signature() {
        let creds = Credentials::new("public", "secret");
        let sig = creds.sign(1_700_000_000);

        assert_eq!(sig.authorization, "Bearer public");
        assert_eq!(sig.time, "1700000000");
        assert_eq!(sig.hash.len(), 128);
        assert!(sig.hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(sig, creds.sign(1_700_000_000));
        assert_ne!(sig.hash, creds.sign(1_700_000_001).hash);
    }

    #[test]
    fn test_signature_hash_is_sha512_of_secret_then_time() {
        // sha512("secret1700000000"), lowercase hex
        let expected = hex::encode(
            ring::digest::digest(&ring::digest::SHA512, b"secret1700000000").as_ref(),
        );
        let sig = Credentials::new("public", "secret").sign(1_700_000_000);
        assert_eq!(sig.hash, expected);
        assert_eq!(sig.hash, sig.hash.to_lowercase());
        assert_eq!(hex::decode(&sig.hash).unwrap().len(), 64);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", Credentials::new("public", "hunter2"));
        assert!(rendered.contains("public"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_backoff() {
        let retry = RetryConfig::new()
            .initial_backoff(Duration::from_millis(100))
            .max_backoff(Duration::from_millis(500));
        assert_eq!(retry.backoff_for(0), Duration::from_millis(100));
        assert_eq!(retry.backoff_for(2), Duration::from_millis(400));
        assert_eq!(retry.backoff_for(10), Duration::from_millis(500));
    }

    #[test]
    fn test_should_retry() {
        let retry = RetryConfig::new();
        assert!(retry.should_retry(None));
        assert!(retry.should_retry(Some(503)));
        assert!(retry.should_retry(Some(429)));
        assert!(!retry.should_retry(Some(404)));
    }
}
