//! # fabdb-cli
//!
//! Command-line interface for the fabdb.net card database.
//!
//! ## Features
//!
//! - **Cards**: `fabdb show WTR167 --long`
//! - **Decks**: `fabdb deck bYDmozyB`, or paste a fabdb.net deck URL
//! - **Search**: `fabdb search --class ninja --pitch 1 --limit 10`
//! - **Diffs**: `fabdb diff <deck-a> <deck-b>`
//! - **Output formats**: pretty (colored rules text), JSON, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
