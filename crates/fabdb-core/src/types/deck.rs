use super::card::{Card, PitchValue};
use crate::record::{Fields, FromRecord, RawRecord};
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A card as it appears in a deck list, with its copy count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckCard {
    /// The card itself
    #[serde(flatten)]
    pub card: Card,
    /// Number of copies in the deck
    pub total: u32,
}

impl DeckCard {
    fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        let total = fields.opt_u32("total")?.unwrap_or(1);
        let mut card = Card::from_fields(fields)?;
        card.extra.remove("total");
        Ok(Self { card, total })
    }

    /// Section this card belongs to when a deck is laid out
    #[must_use]
    pub fn section(&self) -> DeckSection {
        if self.card.has_keyword("hero") {
            DeckSection::Hero
        } else if self.card.has_keyword("weapon") {
            DeckSection::Weapons
        } else if self.card.has_keyword("equipment") {
            DeckSection::Equipment
        } else {
            DeckSection::Main
        }
    }
}

impl std::ops::Deref for DeckCard {
    type Target = Card;

    fn deref(&self) -> &Card {
        &self.card
    }
}

impl fmt::Display for DeckCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.total, self.card)
    }
}

/// Where a deck card is placed when the deck is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckSection {
    /// The hero card
    Hero,
    /// Weapons
    Weapons,
    /// Equipment
    Equipment,
    /// Everything else in the main deck
    Main,
}

/// A deck of cards as returned by fabdb
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    /// Stable deck identifier (the URL slug)
    pub slug: String,
    /// Deck name
    pub name: String,
    /// Game format, e.g. `blitz` or `constructed`
    pub format: Option<String>,
    /// Author notes
    pub notes: Option<String>,
    /// `public`, `private` or `unlisted`
    pub visibility: Option<String>,
    /// Card back identifier
    pub card_back: Option<i64>,
    /// Creation timestamp as sent by the server
    pub created: Option<String>,
    /// Community votes
    pub total_votes: Option<i64>,
    /// Whether the authenticated user voted for this deck
    pub my_vote: Option<bool>,
    /// Main deck cards in payload order, including hero, weapons and equipment
    pub cards: Vec<DeckCard>,
    /// Sideboard cards in payload order
    pub sideboard: Vec<DeckCard>,
    /// Fields not individually modeled
    pub extra: RawRecord,
}

impl Deck {
    const KNOWN_FIELDS: &'static [&'static str] = &[
        "slug",
        "name",
        "format",
        "notes",
        "visibility",
        "cardBack",
        "createdAt",
        "totalVotes",
        "myVote",
        "cards",
        "sideboard",
    ];

    fn load_cards(fields: &Fields<'_>, key: &str) -> Result<Vec<DeckCard>> {
        fields
            .list(key)?
            .iter()
            .enumerate()
            .map(|(i, record)| {
                DeckCard::from_fields(&Fields::new(record, &format!("{}[{i}]", fields.path(key)))?)
            })
            .collect()
    }

    /// The hero card, if the deck has one
    #[must_use]
    pub fn hero(&self) -> Option<&DeckCard> {
        self.cards.iter().find(|c| c.section() == DeckSection::Hero)
    }

    /// Weapon cards, in payload order
    pub fn weapons(&self) -> impl Iterator<Item = &DeckCard> {
        self.section(DeckSection::Weapons)
    }

    /// Equipment cards, in payload order
    pub fn equipment(&self) -> impl Iterator<Item = &DeckCard> {
        self.section(DeckSection::Equipment)
    }

    /// Main deck cards excluding hero, weapons and equipment
    pub fn main_deck(&self) -> impl Iterator<Item = &DeckCard> {
        self.section(DeckSection::Main)
    }

    /// Cards of one section, in payload order
    pub fn section(&self, section: DeckSection) -> impl Iterator<Item = &DeckCard> {
        self.cards.iter().filter(move |c| c.section() == section)
    }

    /// Total number of physical cards in the main deck
    #[must_use]
    pub fn card_count(&self) -> u32 {
        self.cards.iter().map(|c| c.total).sum()
    }
}

impl FromRecord for Deck {
    const KIND: &'static str = "deck";

    fn from_record(record: &Value) -> Result<Self> {
        let fields = Fields::new(record, "")?;
        let slug = fields.required_str("slug")?;
        let name = fields.required_str("name")?;

        let cards = Self::load_cards(&fields, "cards")?;
        let sideboard = Self::load_cards(&fields, "sideboard")?;

        Ok(Self {
            slug,
            name,
            format: fields.opt_str("format")?,
            notes: fields.opt_str("notes")?,
            visibility: fields.opt_str("visibility")?,
            card_back: fields.opt_i64("cardBack")?,
            created: fields.opt_str("createdAt")?,
            total_votes: fields.opt_i64("totalVotes")?,
            my_vote: fields.opt_bool("myVote")?,
            cards,
            sideboard,
            extra: fields.extra(Self::KNOWN_FIELDS),
        })
    }

    fn id(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Sort deck cards by pitch value, then name
pub fn sorted_by_pitch_then_name<'a>(
    cards: impl IntoIterator<Item = &'a DeckCard>,
) -> Vec<&'a DeckCard> {
    let mut cards: Vec<_> = cards.into_iter().collect();
    cards.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    cards
}

pub(crate) fn sort_key(card: &DeckCard) -> (PitchValue, &str) {
    (card.pitch(), card.name.as_str())
}
