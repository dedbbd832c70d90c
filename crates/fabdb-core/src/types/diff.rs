use super::card::{Card, PitchValue};
use super::deck::{Deck, DeckCard, DeckSection};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// How one card's count changed between two decks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDiff {
    /// The card (taken from the newer deck when present in both)
    pub card: Card,
    /// Copies in the first deck
    pub before: u32,
    /// Copies in the second deck
    pub after: u32,
}

impl CardDiff {
    /// Signed change in copies
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.after) - i64::from(self.before)
    }

    /// Returns true if the count did not change
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.before == self.after
    }

    /// `+` or `-` repeated once per copy added or removed
    #[must_use]
    pub fn marker(&self) -> String {
        let delta = self.delta();
        let symbol = if delta > 0 { "+" } else { "-" };
        symbol.repeat(usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX))
    }
}

impl fmt::Display for CardDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.before, self.after) {
            (b, a) if b == a => write!(f, "  {a} x {}", self.card),
            (0, a) => write!(f, "+ {a} x {}", self.card),
            (b, 0) => write!(f, "- {b} x {}", self.card),
            (b, a) => write!(f, "- {b} x {}\n+ {a} x {}", self.card, self.card),
        }
    }
}

/// Section-by-section comparison of two decks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckDiff {
    /// Hero changes
    pub hero: Vec<CardDiff>,
    /// Weapon changes
    pub weapons: Vec<CardDiff>,
    /// Equipment changes
    pub equipment: Vec<CardDiff>,
    /// Main deck changes
    pub cards: Vec<CardDiff>,
    /// Sideboard changes
    pub sideboard: Vec<CardDiff>,
}

impl DeckDiff {
    /// Compare deck `a` (before) against deck `b` (after)
    #[must_use]
    pub fn new(a: &Deck, b: &Deck) -> Self {
        Self {
            hero: diff_cards(a.section(DeckSection::Hero), b.section(DeckSection::Hero)),
            weapons: diff_cards(a.weapons(), b.weapons()),
            equipment: diff_cards(a.equipment(), b.equipment()),
            cards: diff_cards(a.main_deck(), b.main_deck()),
            sideboard: diff_cards(a.sideboard.iter(), b.sideboard.iter()),
        }
    }

    /// All sections with their display names
    #[must_use]
    pub fn sections(&self) -> [(&'static str, &[CardDiff]); 5] {
        [
            ("Hero", self.hero.as_slice()),
            ("Weapons", self.weapons.as_slice()),
            ("Equipment", self.equipment.as_slice()),
            ("Deck", self.cards.as_slice()),
            ("Sideboard", self.sideboard.as_slice()),
        ]
    }

    /// Returns true if the two decks have identical lists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections()
            .iter()
            .all(|(_, diffs)| diffs.iter().all(CardDiff::is_unchanged))
    }
}

/// Merge two card lists keyed by (pitch, name), ordered by the same key
fn diff_cards<'a>(
    a: impl Iterator<Item = &'a DeckCard>,
    b: impl Iterator<Item = &'a DeckCard>,
) -> Vec<CardDiff> {
    let mut merged: BTreeMap<(PitchValue, String), CardDiff> = BTreeMap::new();

    for card in a {
        merged
            .entry((card.pitch(), card.name.clone()))
            .and_modify(|d| d.before += card.total)
            .or_insert_with(|| CardDiff {
                card: card.card.clone(),
                before: card.total,
                after: 0,
            });
    }

    for card in b {
        merged
            .entry((card.pitch(), card.name.clone()))
            .and_modify(|d| {
                d.after += card.total;
                d.card = card.card.clone();
            })
            .or_insert_with(|| CardDiff {
                card: card.card.clone(),
                before: 0,
                after: card.total,
            });
    }

    merged.into_values().collect()
}
