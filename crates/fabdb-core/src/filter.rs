//! Client-side filtering over cards that were already fetched.

use crate::types::Card;
use crate::{FabDbError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A card attribute a filter can look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    /// Card name
    Name,
    /// Card identifier, e.g. `WTR167`
    Identifier,
    /// Rarity code
    Rarity,
    /// Rules text
    Text,
    /// Supertype derived from keywords
    CardType,
    /// Resource cost
    Cost,
    /// Attack (power) value
    Attack,
    /// Defense value
    Defense,
    /// Pitch value, 0 for cards that do not pitch
    Pitch,
    /// Hero life
    Life,
    /// Hero intellect
    Intellect,
    /// Full keyword list
    Keywords,
    /// Keywords before the supertype
    Talents,
    /// Keywords after the supertype
    Subtypes,
}

/// Value of a card field, as seen by a comparison
#[derive(Debug)]
enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
    List(&'a [String]),
}

impl CardField {
    /// Returns true for fields holding free text
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(
            self,
            Self::Name | Self::Identifier | Self::Rarity | Self::Text | Self::CardType
        )
    }

    fn read(self, card: &Card) -> FieldValue<'_> {
        match self {
            Self::Name => FieldValue::Text(Some(&card.name)),
            Self::Identifier => FieldValue::Text(Some(&card.identifier)),
            Self::Rarity => FieldValue::Text(card.rarity.as_deref()),
            Self::Text => FieldValue::Text(card.text.as_deref()),
            Self::CardType => FieldValue::Text(card.card_type.as_deref()),
            Self::Cost => FieldValue::Number(card.stats.cost),
            Self::Attack => FieldValue::Number(card.stats.attack),
            Self::Defense => FieldValue::Number(card.stats.defense),
            Self::Pitch => FieldValue::Number(Some(i64::from(card.pitch().value()))),
            Self::Life => FieldValue::Number(card.stats.life),
            Self::Intellect => FieldValue::Number(card.stats.intellect),
            Self::Keywords => FieldValue::List(&card.keywords),
            Self::Talents => FieldValue::List(&card.talents),
            Self::Subtypes => FieldValue::List(&card.subtypes),
        }
    }
}

impl FromStr for CardField {
    type Err = FabDbError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(Value::String(s.to_string())).map_err(|_| {
            FabDbError::InvalidFilter {
                name: s.to_string(),
            }
        })
    }
}

/// How a field is compared against the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Field is less than the target
    Lt,
    /// Field is less than or equal to the target
    Lte,
    /// Field is greater than the target
    Gt,
    /// Field is greater than or equal to the target
    Gte,
    /// Field equals the target
    Eq,
    /// Field differs from the target
    Neq,
    /// Text field contains the target, or list field holds it
    Contains,
    /// Text field matches the target pattern, ignoring case
    Regex,
}

impl FromStr for Comparison {
    type Err = FabDbError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(Value::String(s.to_string()))
            .map_err(|_| FabDbError::InvalidComparison(s.to_string()))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "contains",
            Self::Regex => "regex",
        };
        f.write_str(s)
    }
}

/// A single criterion applied to fetched cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCardFilter", into = "RawCardFilter")]
pub struct CardFilter {
    field: CardField,
    comparison: Comparison,
    target: Value,
    pattern: Option<Regex>,
}

#[derive(Serialize, Deserialize)]
struct RawCardFilter {
    field: CardField,
    comparison: Comparison,
    target: Value,
}

impl TryFrom<RawCardFilter> for CardFilter {
    type Error = FabDbError;

    fn try_from(raw: RawCardFilter) -> Result<Self> {
        Self::new(raw.field, raw.comparison, raw.target)
    }
}

impl From<CardFilter> for RawCardFilter {
    fn from(f: CardFilter) -> Self {
        Self {
            field: f.field,
            comparison: f.comparison,
            target: f.target,
        }
    }
}

impl CardFilter {
    /// Build a filter, checking that the target suits the comparison
    pub fn new(field: CardField, comparison: Comparison, target: impl Into<Value>) -> Result<Self> {
        let target = target.into();
        let bad_target = || FabDbError::InvalidFilterValue {
            name: comparison.to_string(),
            value: target.to_string(),
        };

        let pattern = match comparison {
            Comparison::Lt | Comparison::Lte | Comparison::Gt | Comparison::Gte => {
                if !target.is_number() {
                    return Err(bad_target());
                }
                None
            }
            Comparison::Regex => {
                let Some(source) = target.as_str() else {
                    return Err(bad_target());
                };
                if !field.is_text() {
                    return Err(bad_target());
                }
                Some(
                    RegexBuilder::new(source)
                        .case_insensitive(true)
                        .build()
                        .map_err(|_| bad_target())?,
                )
            }
            Comparison::Eq | Comparison::Neq | Comparison::Contains => None,
        };

        Ok(Self {
            field,
            comparison,
            target,
            pattern,
        })
    }

    /// Parse field and comparison names, e.g. `("cost", "lte", 2)`
    pub fn parse(field: &str, comparison: &str, target: impl Into<Value>) -> Result<Self> {
        Self::new(field.parse()?, comparison.parse()?, target)
    }

    /// Returns true if `card` satisfies this filter
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        let value = self.field.read(card);
        match self.comparison {
            Comparison::Lt => self.numeric(&value, |v, t| v < t),
            Comparison::Lte => self.numeric(&value, |v, t| v <= t),
            Comparison::Gt => self.numeric(&value, |v, t| v > t),
            Comparison::Gte => self.numeric(&value, |v, t| v >= t),
            Comparison::Eq => self.equals(&value),
            Comparison::Neq => !self.equals(&value),
            Comparison::Contains => self.contains(&value),
            Comparison::Regex => match (&value, &self.pattern) {
                (FieldValue::Text(Some(text)), Some(re)) => re.is_match(text),
                _ => false,
            },
        }
    }

    /// Keep the matching cards, in input order
    pub fn apply<'a>(&self, cards: impl IntoIterator<Item = &'a Card>) -> Vec<&'a Card> {
        cards.into_iter().filter(|c| self.matches(c)).collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn numeric(&self, value: &FieldValue<'_>, cmp: impl Fn(f64, f64) -> bool) -> bool {
        match (value, self.target.as_f64()) {
            (FieldValue::Number(Some(v)), Some(t)) => cmp(*v as f64, t),
            _ => false,
        }
    }

    fn equals(&self, value: &FieldValue<'_>) -> bool {
        match value {
            FieldValue::Text(text) => match (&self.target, text) {
                (Value::String(t), Some(v)) => t.eq_ignore_ascii_case(v),
                (Value::Null, None) => true,
                _ => false,
            },
            FieldValue::Number(n) => match (&self.target, n) {
                (Value::Number(t), Some(v)) => t.as_i64() == Some(*v),
                (Value::String(t), Some(v)) => t.parse::<i64>().ok() == Some(*v),
                (Value::Null, None) => true,
                _ => false,
            },
            FieldValue::List(items) => match &self.target {
                Value::Array(targets) => {
                    targets.len() == items.len()
                        && targets
                            .iter()
                            .zip(items.iter())
                            .all(|(t, i)| t.as_str().is_some_and(|t| t.eq_ignore_ascii_case(i)))
                }
                _ => false,
            },
        }
    }

    fn contains(&self, value: &FieldValue<'_>) -> bool {
        let Some(needle) = self.target.as_str() else {
            return false;
        };
        let needle = needle.to_lowercase();
        match value {
            FieldValue::Text(Some(text)) => text.to_lowercase().contains(&needle),
            FieldValue::List(items) => items.iter().any(|i| i.to_lowercase() == needle),
            _ => false,
        }
    }
}

/// How the filters of a [`CardMultiFilter`] are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Every filter must match
    #[default]
    And,
    /// At least one filter must match
    Or,
}

/// Several filters combined with one operator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardMultiFilter {
    /// How results are combined
    pub operator: Operator,
    /// The combined filters
    pub filters: Vec<CardFilter>,
}

impl CardMultiFilter {
    /// Combine `filters` with `operator`
    #[must_use]
    pub fn new(operator: Operator, filters: Vec<CardFilter>) -> Self {
        Self { operator, filters }
    }

    /// Returns true if `card` satisfies the combination
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        match self.operator {
            Operator::And => self.filters.iter().all(|f| f.matches(card)),
            Operator::Or => self.filters.iter().any(|f| f.matches(card)),
        }
    }

    /// Keep the matching cards, in input order
    pub fn apply<'a>(&self, cards: impl IntoIterator<Item = &'a Card>) -> Vec<&'a Card> {
        cards.into_iter().filter(|c| self.matches(c)).collect()
    }
}
