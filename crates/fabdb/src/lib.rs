//! Rust client for the fabdb.net Flesh and Blood card database.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabdb::{FabDbClient, Query};
//!
//! #[tokio::main]
//! async fn main() -> fabdb::Result<()> {
//!     let client = FabDbClient::new();
//!
//!     // Look up one card
//!     let card = client.get_card("WTR167").await?;
//!     println!("{card}: {:?}", card.text);
//!
//!     // Walk every blue ninja card, one page at a time
//!     let mut results = client.search_cards(Query::new().class("ninja").pitch(3))?;
//!     while let Some(card) = results.next().await? {
//!         println!("{card}");
//!     }
//!
//!     // Fetch a deck with its cards
//!     let deck = client.get_deck("bYDmozyB").await?;
//!     println!("{} ({} cards)", deck.name, deck.card_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/fabdb/0.2.0")]

// Re-export core types
pub use fabdb_core::*;

// Re-export client
pub use fabdb_client::{
    api, Credentials, FabDbClient, FabDbClientBuilder, HttpTransport, Paginated, RetryConfig,
    Transport, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, SECRET_KEY_ENV,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
