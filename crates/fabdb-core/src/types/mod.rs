mod card;
mod deck;
mod diff;
mod page;

pub use card::*;
pub use deck::*;
pub use diff::*;
pub use page::*;
