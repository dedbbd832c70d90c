use crate::record::{Fields, FromRecord, RawRecord};
use crate::{FabDbError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Every card supertype, in the order they are searched for in a keyword list
pub const CARD_TYPES: [&str; 8] = [
    "action",
    "reaction",
    "equipment",
    "hero",
    "instant",
    "item",
    "weapon",
    "resource",
];

/// Pitch value of a card, carried on the wire as `stats.resource`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PitchValue {
    /// No pitch (heroes, weapons, equipment)
    #[default]
    None,
    /// Pitches for one resource
    Red,
    /// Pitches for two resources
    Yellow,
    /// Pitches for three resources
    Blue,
}

impl PitchValue {
    /// Numeric value, 0 through 3
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Red => 1,
            Self::Yellow => 2,
            Self::Blue => 3,
        }
    }

    /// Convert from the numeric wire value
    #[must_use]
    pub const fn from_value(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Red),
            2 => Some(Self::Yellow),
            3 => Some(Self::Blue),
            _ => None,
        }
    }

    /// Colour name, as used on the physical card
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for PitchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Artist credited for a card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artist {
    /// Artist name
    pub name: Option<String>,
    /// Short biography
    pub blurb: Option<String>,
    /// Portrait URL
    pub image_url: Option<String>,
    /// URL slug on fabdb
    pub slug: Option<String>,
}

impl Artist {
    fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            name: fields.opt_str("name")?,
            blurb: fields.opt_str("blurb")?,
            image_url: fields.opt_str("image")?,
            slug: fields.opt_str("slug")?,
        })
    }
}

/// A single official ruling attached to a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ruling {
    /// Ruling text
    pub description: Option<String>,
    /// Where the ruling was published
    pub source: Option<String>,
    /// Creation timestamp as sent by the server
    pub created: Option<String>,
    /// Last update timestamp as sent by the server
    pub updated: Option<String>,
    /// Card the ruling belongs to
    pub card_id: Option<i64>,
    /// Ruling identifier
    pub ruling_id: Option<i64>,
}

impl Ruling {
    fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        let (card_id, ruling_id) = match fields.get("pivot") {
            Some(pivot) => {
                let pivot = Fields::new(pivot, &fields.path("pivot"))?;
                (pivot.opt_i64("card_id")?, pivot.opt_i64("ruling_id")?)
            }
            None => (None, None),
        };

        Ok(Self {
            description: fields.opt_str("description")?,
            source: fields.opt_str("source")?,
            created: fields.opt_str("createdAt")?,
            updated: fields.opt_str("updatedAt")?,
            card_id,
            ruling_id,
        })
    }
}

impl fmt::Display for Ruling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.ruling_id.map(|id| id.to_string()).unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
            self.source.as_deref().unwrap_or_default()
        )
    }
}

/// Numeric card statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CardStats {
    /// Resource cost to play
    pub cost: Option<i64>,
    /// Attack (power) value
    pub attack: Option<i64>,
    /// Defense value
    pub defense: Option<i64>,
    /// Pitch value
    pub pitch: PitchValue,
    /// Starting life total (heroes)
    pub life: Option<i64>,
    /// Intellect (heroes)
    pub intellect: Option<i64>,
}

impl CardStats {
    fn from_value(stats: Option<&Value>, prefix: &str) -> Result<Self> {
        let stats = match stats {
            None => return Ok(Self::default()),
            // some responses send `"stats": []` for cards without stats
            Some(Value::Array(items)) if items.is_empty() => return Ok(Self::default()),
            Some(v) => Fields::new(v, prefix)?,
        };

        let pitch = match stats.opt_i64("resource")? {
            None => PitchValue::None,
            Some(n) => PitchValue::from_value(n)
                .ok_or_else(|| FabDbError::invalid(stats.path("resource"), &Value::from(n)))?,
        };

        Ok(Self {
            cost: stats.opt_i64("cost")?,
            attack: stats.opt_i64("attack")?,
            defense: stats.opt_i64("defense")?,
            pitch,
            life: stats.opt_i64("life")?,
            intellect: stats.opt_i64("intellect")?,
        })
    }
}

/// A single Flesh and Blood card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// Stable card identifier, e.g. `ARC000`
    pub identifier: String,
    /// Card name
    pub name: String,
    /// Rarity code
    pub rarity: Option<String>,
    /// Raw keyword list (talents, class, supertype, subtypes)
    pub keywords: Vec<String>,
    /// Rules text
    pub text: Option<String>,
    /// Flavour text
    pub flavor: Option<String>,
    /// Community comments
    pub comments: Option<String>,
    /// Card image URL
    pub image_url: Option<String>,
    /// Format legality, kept as sent
    pub legality: Option<Value>,
    /// Credited artist
    pub artist: Artist,
    /// Official rulings
    pub rulings: Vec<Ruling>,
    /// Numeric statistics
    pub stats: CardStats,
    /// Supertype derived from keywords, e.g. `action` or `attack reaction`
    pub card_type: Option<String>,
    /// Keywords before the supertype (talents and class)
    pub talents: Vec<String>,
    /// Keywords after the supertype
    pub subtypes: Vec<String>,
    /// Fields not individually modeled
    pub extra: RawRecord,
}

impl Card {
    pub(crate) const KNOWN_FIELDS: &'static [&'static str] = &[
        "identifier",
        "name",
        "rarity",
        "keywords",
        "text",
        "flavour",
        "flavor",
        "comments",
        "image",
        "legality",
        "artist",
        "rulings",
        "stats",
    ];

    pub(crate) fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        let identifier = fields.required_str("identifier")?;
        let name = fields.required_str("name")?;
        let keywords = fields.str_list("keywords")?;

        let artist = match fields.get("artist") {
            // an empty list means "no artist"
            Some(Value::Array(items)) if items.is_empty() => Artist::default(),
            Some(v) => Artist::from_fields(&Fields::new(v, &fields.path("artist"))?)?,
            None => Artist::default(),
        };

        let rulings = fields
            .list("rulings")?
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Ruling::from_fields(&Fields::new(r, &format!("{}[{i}]", fields.path("rulings")))?)
            })
            .collect::<Result<Vec<_>>>()?;

        let flavor = match fields.opt_str("flavour")? {
            Some(f) => Some(f),
            None => fields.opt_str("flavor")?,
        };

        let (card_type, talents, subtypes) = parse_keywords(&keywords);

        Ok(Self {
            identifier,
            name,
            rarity: fields.opt_str("rarity")?,
            text: fields.opt_str("text")?,
            flavor,
            comments: fields.opt_str("comments")?,
            image_url: fields.opt_str("image")?,
            legality: fields.get("legality").cloned(),
            artist,
            rulings,
            stats: CardStats::from_value(fields.get("stats"), &fields.path("stats"))?,
            card_type,
            talents,
            subtypes,
            keywords,
            extra: fields.extra(Self::KNOWN_FIELDS),
        })
    }

    /// Pitch value of this card
    #[must_use]
    pub const fn pitch(&self) -> PitchValue {
        self.stats.pitch
    }

    /// Resource cost, if the card has one
    #[must_use]
    pub const fn cost(&self) -> Option<i64> {
        self.stats.cost
    }

    /// Returns true if the keyword list contains `keyword`
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Returns true if both cards are the same printing by name and pitch
    #[must_use]
    pub fn same_card(&self, other: &Self) -> bool {
        self.name == other.name && self.pitch() == other.pitch()
    }
}

impl FromRecord for Card {
    const KIND: &'static str = "card";

    fn from_record(record: &Value) -> Result<Self> {
        Self::from_fields(&Fields::new(record, "")?)
    }

    fn id(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pitch() == PitchValue::None {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.pitch())
        }
    }
}

/// Split a keyword list into (supertype, talents, subtypes)
///
/// ```text
/// ["generic", "action", "attack"]            -> ("action", ["generic"], ["attack"])
/// ["draconic", "ninja", "action", "attack"]  -> ("action", ["draconic", "ninja"], ["attack"])
/// ["generic", "defense", "reaction"]         -> ("defense reaction", ["generic"], [])
/// ```
#[must_use]
pub fn parse_keywords(keywords: &[String]) -> (Option<String>, Vec<String>, Vec<String>) {
    let Some((supertype, pivot)) = CARD_TYPES.iter().find_map(|t| {
        keywords
            .iter()
            .position(|k| k.eq_ignore_ascii_case(t))
            .map(|pos| (*t, pos))
    }) else {
        return (None, Vec::new(), Vec::new());
    };

    let subtypes = keywords[pivot + 1..].to_vec();

    if supertype == "reaction" && pivot > 0 {
        let full = format!("{} {supertype}", keywords[pivot - 1]);
        return (Some(full), keywords[..pivot - 1].to_vec(), subtypes);
    }

    (
        Some(supertype.to_string()),
        keywords[..pivot].to_vec(),
        subtypes,
    )
}
