//! Command implementations.

pub mod config;
pub mod deck;
pub mod diff;
pub mod search;
pub mod show;

use anyhow::{Context as _, Result};
use fabdb::{Credentials, FabDbClient};
use url::Url;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Public API key
    pub api_key: Option<String>,

    /// Secret paired with the API key
    pub secret_key: Option<String>,

    /// API root override
    pub base_url: Option<String>,

    /// Records per search page
    pub page_size: Option<u32>,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    /// Create a client; requests are signed when both keys are known.
    pub fn client(&self) -> Result<FabDbClient> {
        let credentials = Credentials::from_parts(self.api_key.clone(), self.secret_key.clone())
            .context(
                "Set both keys with one of:\n  \
                 1. --api-key <KEY> --secret-key <SECRET>\n  \
                 2. FABDB_API_KEY and FABDB_SECRET_KEY environment variables\n  \
                 3. fabdb config set api_key <KEY> / fabdb config set secret_key <SECRET>",
            )?;

        let mut builder = FabDbClient::builder().maybe_credentials(credentials);
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(size) = self.page_size {
            builder = builder.page_size(size);
        }
        Ok(builder.build())
    }
}

/// Extract a deck slug from a slug or a fabdb.net deck URL
///
/// `https://fabdb.net/decks/bYDmozyB` and `bYDmozyB` both give `bYDmozyB`.
pub fn deck_slug(input: &str) -> Result<String> {
    let input = input.trim();
    let path = Url::parse(input).map_or_else(|_| input.to_string(), |url| url.path().to_string());

    path.split('/')
        .rfind(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no deck slug in `{input}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_slug() {
        assert_eq!(deck_slug("bYDmozyB").unwrap(), "bYDmozyB");
        assert_eq!(deck_slug("https://fabdb.net/decks/bYDmozyB").unwrap(), "bYDmozyB");
        assert_eq!(deck_slug("https://fabdb.net/decks/bYDmozyB/").unwrap(), "bYDmozyB");
        assert_eq!(deck_slug("fabdb.net/decks/bYDmozyB").unwrap(), "bYDmozyB");
        assert_eq!(
            deck_slug("https://fabdb.net/decks/bYDmozyB?tab=list").unwrap(),
            "bYDmozyB"
        );
        assert!(deck_slug("https://fabdb.net/").is_err());
        assert!(deck_slug("  ").is_err());
    }

    #[test]
    fn test_client_needs_both_keys() {
        let ctx = Context {
            api_key: Some("public".into()),
            ..Context::default()
        };
        assert!(ctx.client().is_err());

        let ctx = Context {
            api_key: Some("public".into()),
            secret_key: Some("secret".into()),
            page_size: Some(10),
            ..Context::default()
        };
        assert_eq!(ctx.client().unwrap().page_size(), 10);
    }
}
