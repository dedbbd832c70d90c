//! Card endpoints.

use crate::fetch::fetch_one;
use crate::paginate::Paginated;
use crate::FabDbClient;
use fabdb_core::{validate_identifier, Card, Query, Result};

/// Card endpoints
pub struct CardsApi<'a> {
    client: &'a FabDbClient,
}

impl<'a> CardsApi<'a> {
    pub(crate) const fn new(client: &'a FabDbClient) -> Self {
        Self { client }
    }

    /// Get a single card by identifier
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let card = client.cards().get("WTR167").await?;
    /// println!("{} costs {:?}", card.name, card.cost());
    /// ```
    pub async fn get(&self, identifier: &str) -> Result<Card> {
        validate_identifier("identifier", identifier)?;
        fetch_one(self.client.transport(), &format!("cards/{identifier}")).await
    }

    /// Search cards, lazily walking every result page
    ///
    /// Filter names are checked immediately; no request is made until the
    /// first result is asked for.
    ///
    /// ```rust,ignore
    /// let mut results = client.cards().search(Query::new().class("ranger").pitch(2))?;
    /// while let Some(card) = results.next().await? {
    ///     println!("{card}");
    /// }
    /// ```
    pub fn search(&self, query: Query) -> Result<Paginated<Card>> {
        Paginated::new(
            self.client.shared_transport(),
            "cards",
            query,
            self.client.page_size(),
        )
    }
}
