//! Main fabdb.net API client implementation.

use crate::api::{CardsApi, DecksApi};
use crate::config::{Credentials, RetryConfig};
use crate::paginate::Paginated;
use crate::transport::{HttpTransport, Transport};
use fabdb_core::{Card, Deck, Query, Result};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The fabdb.net API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.fabdb.net";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Main fabdb.net API client
///
/// Cheap to clone; clones share the same transport.
#[derive(Clone)]
pub struct FabDbClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    page_size: u32,
}

impl FabDbClient {
    /// Create an unauthenticated client using default settings
    #[must_use]
    pub fn new() -> Self {
        FabDbClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> FabDbClientBuilder {
        FabDbClientBuilder::new()
    }

    /// Create a client on top of any [`Transport`]
    #[must_use]
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        FabDbClientBuilder::new().transport(transport).build()
    }

    /// Access card endpoints
    #[must_use]
    pub const fn cards(&self) -> CardsApi<'_> {
        CardsApi::new(self)
    }

    /// Access deck endpoints
    #[must_use]
    pub const fn decks(&self) -> DecksApi<'_> {
        DecksApi::new(self)
    }

    /// Shortcut for `cards().get(identifier)`
    pub async fn get_card(&self, identifier: &str) -> Result<Card> {
        self.cards().get(identifier).await
    }

    /// Shortcut for `cards().search(query)`
    pub fn search_cards(&self, query: Query) -> Result<Paginated<Card>> {
        self.cards().search(query)
    }

    /// Shortcut for `decks().get(slug)`
    pub async fn get_deck(&self, slug: &str) -> Result<Deck> {
        self.decks().get(slug).await
    }

    /// Records requested per page
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn shared_transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.inner.transport)
    }
}

impl Default for FabDbClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FabDbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabDbClient")
            .field("page_size", &self.inner.page_size)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`FabDbClient`]
pub struct FabDbClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    page_size: u32,
    credentials: Option<Credentials>,
    retry_config: RetryConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl FabDbClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("fabdb-rust/{}", env!("CARGO_PKG_VERSION")),
            page_size: DEFAULT_PAGE_SIZE,
            credentials: None,
            retry_config: RetryConfig::default(),
            transport: None,
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the page size used by searches (clamped to at least 1)
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sign requests with an API key pair
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set credentials only if some were found
    #[must_use]
    pub fn maybe_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set retry configuration
    #[must_use]
    pub const fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Use a custom transport instead of HTTP
    ///
    /// Base URL, timeout, user agent, credentials and retry settings are
    /// ignored when a transport is supplied.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> FabDbClient {
        let transport = self.transport.unwrap_or_else(|| {
            let http = HttpClient::builder()
                .timeout(self.timeout)
                .user_agent(&self.user_agent)
                .gzip(true)
                .build()
                .expect("Failed to build HTTP client");

            debug!(
                base_url = %self.base_url,
                signed = self.credentials.is_some(),
                "building HTTP transport"
            );
            Arc::new(HttpTransport::new(
                http,
                self.base_url,
                self.credentials,
                self.retry_config,
            ))
        });

        FabDbClient {
            inner: Arc::new(ClientInner {
                transport,
                page_size: self.page_size,
            }),
        }
    }
}

impl Default for FabDbClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
