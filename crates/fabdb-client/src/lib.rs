//! HTTP client for the fabdb.net API.
//!
//! This crate provides the main [`FabDbClient`] for looking up cards and
//! decks and for walking card searches page by page through [`Paginated`].
//! The network is reached through the [`Transport`] trait; [`HttpTransport`]
//! is the reqwest-backed default.

#![doc(html_root_url = "https://docs.rs/fabdb-client/0.2.0")]

mod client;
mod config;
mod fetch;
mod paginate;
mod transport;
pub mod api;

pub use client::{FabDbClient, FabDbClientBuilder, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use config::*;
pub use paginate::Paginated;
pub use transport::{HttpTransport, Transport};
pub use fabdb_core::{FabDbError, Result};
