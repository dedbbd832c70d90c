//! Deck endpoints.

use crate::fetch::fetch_one;
use crate::FabDbClient;
use fabdb_core::{validate_identifier, Deck, Result};

/// Deck endpoints
pub struct DecksApi<'a> {
    client: &'a FabDbClient,
}

impl<'a> DecksApi<'a> {
    pub(crate) const fn new(client: &'a FabDbClient) -> Self {
        Self { client }
    }

    /// Get a deck by its slug, with every card fully materialized
    pub async fn get(&self, slug: &str) -> Result<Deck> {
        validate_identifier("slug", slug)?;
        fetch_one(self.client.transport(), &format!("decks/{slug}")).await
    }
}
