//! Core types for the fabdb.net API client.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Types**: [`Card`], [`Deck`] and friends, built from raw records through
//!   [`FromRecord`]
//! - **Decoding**: [`Page::decode`] splits a page payload into records and
//!   pagination metadata
//! - **Queries**: [`Query`] encodes search filters into wire parameters
//! - **Filters**: [`CardFilter`] narrows already-fetched cards
//! - **Errors**: [`FabDbError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use fabdb_core::{Card, FromRecord, Result};
//!
//! fn parse(raw: &serde_json::Value) -> Result<()> {
//!     let card = Card::from_record(raw)?;
//!     println!("{} pitches {}", card.name, card.pitch());
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/fabdb-core/0.2.0")]

mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod types;

pub use error::{FabDbError, Result};
pub use filter::{CardField, CardFilter, CardMultiFilter, Comparison, Operator};
pub use query::{Filter, FilterValue, Query};
pub use record::{validate_identifier, FromRecord, RawRecord};
pub use types::*;
