//! API endpoint modules.

mod cards;
mod decks;

pub use cards::CardsApi;
pub use decks::DecksApi;
