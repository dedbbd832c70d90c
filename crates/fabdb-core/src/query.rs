//! Card search queries and their wire encoding.
//!
//! Filter names given by callers are translated to the API's query parameter
//! names through a fixed table. Multi-valued filters become repeated
//! parameters (`pitch=1&pitch=2`), never a comma-joined list.

use crate::types::PitchValue;
use crate::{FabDbError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Query parameter carrying the 1-indexed page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the requested page size
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Parameters added by the transport or pager, never treated as filters
const RESERVED_PARAMS: [&str; 4] = [PAGE_PARAM, PAGE_SIZE_PARAM, "time", "hash"];

/// A filter the card search endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Filter {
    /// Free-text keyword search
    Keywords,
    /// Pitch value, 0 to 3
    Pitch,
    /// Resource cost
    Cost,
    /// Hero class, e.g. `ranger`
    Class,
    /// Rarity code
    Rarity,
    /// Set code, e.g. `WTR`
    Set,
}

impl Filter {
    /// Every filter, in wire order
    pub const ALL: [Self; 6] = [
        Self::Keywords,
        Self::Pitch,
        Self::Cost,
        Self::Class,
        Self::Rarity,
        Self::Set,
    ];

    /// Resolve a caller-facing filter name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "keywords" | "keyword" => Ok(Self::Keywords),
            "pitch" => Ok(Self::Pitch),
            "cost" => Ok(Self::Cost),
            "class_" | "class" => Ok(Self::Class),
            "rarity" => Ok(Self::Rarity),
            "set_" | "set" => Ok(Self::Set),
            _ => Err(FabDbError::InvalidFilter {
                name: name.to_string(),
            }),
        }
    }

    /// Name of the query parameter on the wire
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::Pitch => "pitch",
            Self::Cost => "cost",
            Self::Class => "class",
            Self::Rarity => "rarity",
            Self::Set => "set",
        }
    }

    /// Canonical caller-facing name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::Pitch => "pitch",
            Self::Cost => "cost",
            Self::Class => "class_",
            Self::Rarity => "rarity",
            Self::Set => "set_",
        }
    }

    fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }

    fn validate(self, value: &str) -> Result<()> {
        let numeric_ok = |max: Option<i64>| {
            value
                .parse::<i64>()
                .ok()
                .is_some_and(|n| n >= 0 && max.map_or(true, |m| n <= m))
        };
        let ok = match self {
            Self::Pitch => numeric_ok(Some(3)),
            Self::Cost => numeric_ok(None),
            _ => !value.trim().is_empty(),
        };
        if ok {
            Ok(())
        } else {
            Err(FabDbError::InvalidFilterValue {
                name: self.name().to_string(),
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One or more values for a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValue(Vec<String>);

impl FilterValue {
    /// The individual values
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self(vec![v.to_string()])
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self(vec![v])
    }
}

impl From<&String> for FilterValue {
    fn from(v: &String) -> Self {
        Self(vec![v.clone()])
    }
}

impl From<PitchValue> for FilterValue {
    fn from(v: PitchValue) -> Self {
        Self(vec![v.value().to_string()])
    }
}

macro_rules! numeric_filter_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(v: $t) -> Self {
                    Self(vec![v.to_string()])
                }
            }
        )*
    };
}

numeric_filter_value!(u8, u16, u32, u64, i32, i64);

impl<T: Into<Self>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self(values.into_iter().flat_map(|v| v.into().0).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for FilterValue {
    fn from(values: [T; N]) -> Self {
        Self(values.into_iter().flat_map(|v| v.into().0).collect())
    }
}

/// Filter criteria for a card search
///
/// Names are checked when the query is encoded, so building a query never
/// fails but [`Query::params`] reports the first unknown name.
///
/// ```rust,ignore
/// let query = Query::new().class("ranger").pitch([1, 2]);
/// let params = query.params(1, 100)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, FilterValue)>,
}

/// Validated, order-insensitive form of a query
pub type NormalizedQuery = BTreeMap<Filter, BTreeSet<String>>;

impl Query {
    /// An empty query matching every card
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter by caller-facing name; repeated names accumulate values
    #[must_use]
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    /// Free-text keyword search
    #[must_use]
    pub fn keywords(self, keywords: impl Into<FilterValue>) -> Self {
        self.filter(Filter::Keywords.name(), keywords)
    }

    /// Restrict to one or more pitch values
    #[must_use]
    pub fn pitch(self, pitch: impl Into<FilterValue>) -> Self {
        self.filter(Filter::Pitch.name(), pitch)
    }

    /// Restrict to one or more costs
    #[must_use]
    pub fn cost(self, cost: impl Into<FilterValue>) -> Self {
        self.filter(Filter::Cost.name(), cost)
    }

    /// Restrict to a hero class
    #[must_use]
    pub fn class(self, class: impl Into<FilterValue>) -> Self {
        self.filter(Filter::Class.name(), class)
    }

    /// Restrict to a rarity
    #[must_use]
    pub fn rarity(self, rarity: impl Into<FilterValue>) -> Self {
        self.filter(Filter::Rarity.name(), rarity)
    }

    /// Restrict to a set
    #[must_use]
    pub fn set(self, set: impl Into<FilterValue>) -> Self {
        self.filter(Filter::Set.name(), set)
    }

    /// Returns true if no filters were added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Validate every filter name and value
    pub fn normalized(&self) -> Result<NormalizedQuery> {
        let mut out = NormalizedQuery::new();
        for (name, value) in &self.filters {
            let filter = Filter::from_name(name)?;
            for v in value.values() {
                filter.validate(v)?;
            }
            out.entry(filter)
                .or_default()
                .extend(value.values().iter().cloned());
        }
        Ok(out)
    }

    /// Encode this query for one page request
    ///
    /// Filters come out in a stable order; `page` and `page_size` are always
    /// appended last.
    pub fn params(&self, page: u32, page_size: u32) -> Result<Vec<(String, String)>> {
        let mut params: Vec<(String, String)> = self
            .normalized()?
            .into_iter()
            .flat_map(|(filter, values)| {
                values
                    .into_iter()
                    .map(move |v| (filter.wire_name().to_string(), v))
            })
            .collect();

        params.push((PAGE_PARAM.to_string(), page.max(1).to_string()));
        params.push((PAGE_SIZE_PARAM.to_string(), page_size.to_string()));
        Ok(params)
    }

    /// Rebuild a query from encoded parameters
    ///
    /// Paging and signing parameters are skipped; any other unknown parameter
    /// fails with [`FabDbError::InvalidFilter`].
    pub fn from_params<K, V>(params: &[(K, V)]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (key, value) in params {
            let key = key.as_ref();
            if RESERVED_PARAMS.contains(&key) {
                continue;
            }
            let filter = Filter::from_wire(key).ok_or_else(|| FabDbError::InvalidFilter {
                name: key.to_string(),
            })?;
            query = query.filter(filter.name(), value.as_ref());
        }
        Ok(query)
    }
}
