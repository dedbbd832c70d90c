//! Request/response exchange with the remote API.

use crate::config::{Credentials, RetryConfig};
use async_trait::async_trait;
use fabdb_core::{FabDbError, Result};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Performs one GET exchange and returns the decoded JSON payload
///
/// Implementations own host, authentication, headers, timeouts and any retry
/// policy. Non-success answers fail with [`FabDbError::Transport`] carrying
/// the HTTP status.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `path` (relative to the API root) with the given query parameters
    async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value>;
}

/// [`Transport`] backed by reqwest
pub struct HttpTransport {
    http: HttpClient,
    base_url: String,
    credentials: Option<Credentials>,
    retry: RetryConfig,
}

impl HttpTransport {
    pub(crate) fn new(
        http: HttpClient,
        base_url: String,
        credentials: Option<Credentials>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            retry,
        }
    }

    /// Build a URL with query parameters (including the request signature)
    fn build_url(&self, path: &str, params: &[(String, String)]) -> Result<(Url, Option<String>)> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| FabDbError::InvalidUrl(format!("{raw}: {e}")))?;

        let signature = self
            .credentials
            .as_ref()
            .map(|c| c.sign(chrono::Utc::now().timestamp()));

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(sig) = &signature {
                query.append_pair("time", &sig.time);
                query.append_pair("hash", &sig.hash);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok((url, signature.map(|s| s.authorization)))
    }

    async fn fetch_once(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let (url, authorization) = self.build_url(path, params)?;
        debug!(url = %redact(&url), "GET request");

        let mut request = self.http.get(url);
        if let Some(auth) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await.map_err(|e| FabDbError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        Self::handle_response(response).await
    }

    /// Handle an API response that returns JSON
    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| FabDbError::Transport {
                status: Some(status.as_u16()),
                message: e.to_string(),
            })?;
            serde_json::from_str(&body)
                .map_err(|e| FabDbError::MalformedResponse(format!("body is not JSON: {e}")))
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a transport error
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        // Try to parse error message from JSON
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or(body);

        if status == 429 {
            warn!("Rate limited by fabdb API");
        }

        Err(FabDbError::Transport {
            status: Some(status),
            message,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(path, params).await {
                Err(FabDbError::Transport { status, message })
                    if attempt < self.retry.max_retries && self.retry.should_retry(status) =>
                {
                    let backoff = self.retry.backoff_for(attempt);
                    warn!(?status, %message, attempt, ?backoff, "request failed, retrying");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Strip the signature hash from a URL before it is logged
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "hash" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if !pairs.is_empty() {
        shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer, credentials: Option<Credentials>, retry: RetryConfig) -> HttpTransport {
        HttpTransport::new(HttpClient::new(), server.uri(), credentials, retry)
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_repeated_params_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cards"))
            .and(query_param("pitch", "1"))
            .and(query_param("pitch", "2"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server, None, RetryConfig::new());
        let body = t
            .fetch("cards", &params(&[("pitch", "1"), ("pitch", "2"), ("page", "1")]))
            .await
            .unwrap();
        assert_eq!(body, json!({"data": []}));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("pitch=1&pitch=2&page=1"));
    }

    #[tokio::test]
    async fn test_signed_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/decks/bYDmozyB"))
            .and(header("authorization", "Bearer public"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slug": "bYDmozyB"})))
            .mount(&server)
            .await;

        let t = transport(
            &server,
            Some(Credentials::new("public", "secret")),
            RetryConfig::new(),
        );
        t.fetch("decks/bYDmozyB", &[]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let query: Vec<_> = requests[0].url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(query, vec!["time", "hash"]);
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "Server Error"})),
            )
            .mount(&server)
            .await;

        let err = transport(&server, None, RetryConfig::new())
            .fetch("cards", &[])
            .await
            .unwrap_err();
        match err {
            FabDbError::Transport { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Server Error");
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = transport(&server, None, RetryConfig::new())
            .fetch("cards", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FabDbError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_retry_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .with_priority(2)
            .mount(&server)
            .await;

        let retry = RetryConfig::new()
            .max_retries(2)
            .initial_backoff(Duration::from_millis(1));
        let body = transport(&server, None, retry).fetch("cards", &[]).await.unwrap();
        assert_eq!(body, json!({"data": []}));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        assert!(transport(&server, None, RetryConfig::new())
            .fetch("cards", &[])
            .await
            .is_err());
    }

    #[test]
    fn test_redact_hides_hash() {
        let url = Url::parse("https://api.fabdb.net/cards?page=1&time=1&hash=abcdef").unwrap();
        let shown = redact(&url);
        assert!(shown.contains("page=1"));
        assert!(!shown.contains("abcdef"));
    }
}
