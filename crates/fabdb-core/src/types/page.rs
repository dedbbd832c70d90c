//! Decoding of raw response payloads into records and pagination metadata.
//!
//! A paged payload from `/cards` looks like:
//!
//! ```json
//! {
//!   "data": [ { ...card... }, ... ],
//!   "links": { "next": "https://api.fabdb.net/cards?page=2", ... },
//!   "meta": { "current_page": 1, "last_page": 3, "per_page": 100, "total": 250 }
//! }
//! ```
//!
//! Only `data` is mandatory.

use crate::record::type_name;
use crate::{FabDbError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Whether more pages follow the one just decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// At least one more page can be requested
    MoreRemain,
    /// This is the final page
    Last,
}

/// Pagination metadata, as far as the payload provides it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-indexed page number reported by the server
    #[serde(default)]
    pub current_page: Option<u32>,

    /// Number of the final page
    #[serde(default)]
    pub last_page: Option<u32>,

    /// Page size the server applied
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Total number of matching records
    #[serde(default)]
    pub total: Option<u64>,
}

/// One decoded page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Raw entity records, in server order
    pub records: Vec<Value>,

    /// Pagination metadata
    pub meta: PageMeta,

    /// Whether another page should be requested
    pub status: PageStatus,
}

impl Page {
    /// Decode one page payload
    ///
    /// `requested` is the page number that was asked for; it stands in for
    /// `meta.current_page` when the server omits it.
    pub fn decode(payload: &Value, requested: u32) -> Result<Self> {
        let Value::Object(root) = payload else {
            return Err(FabDbError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                type_name(payload)
            )));
        };

        let records = match root.get("data") {
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(FabDbError::MalformedResponse(format!(
                    "`data` must be an array, got {}",
                    type_name(other)
                )))
            }
            None => {
                return Err(FabDbError::MalformedResponse(
                    "missing `data` record list".into(),
                ))
            }
        };

        let meta = decode_meta(root.get("meta"))?;
        let next_link = root
            .get("links")
            .and_then(|links| links.get("next"))
            .map(|next| !next.is_null());

        let status = page_status(&meta, next_link, records.len(), requested);

        debug!(
            page = meta.current_page.unwrap_or(requested),
            records = records.len(),
            ?status,
            "decoded page"
        );

        Ok(Self {
            records,
            meta,
            status,
        })
    }

    /// Returns true if this is the final page
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.status == PageStatus::Last
    }
}

fn decode_meta(meta: Option<&Value>) -> Result<PageMeta> {
    match meta {
        None | Some(Value::Null) => Ok(PageMeta::default()),
        Some(v @ Value::Object(_)) => PageMeta::deserialize(v).map_err(|e| {
            FabDbError::MalformedResponse(format!("invalid pagination metadata: {e}"))
        }),
        Some(other) => Err(FabDbError::MalformedResponse(format!(
            "`meta` must be an object, got {}",
            type_name(other)
        ))),
    }
}

/// Decide whether another page follows
///
/// An empty record list always ends the sequence, and so does a page whose
/// `meta.current_page` differs from the page requested. Otherwise the page
/// count in `meta` wins, then the `links.next` flag. A payload with neither
/// is a single page.
fn page_status(meta: &PageMeta, next_link: Option<bool>, records: usize, requested: u32) -> PageStatus {
    if records == 0 {
        if meta.last_page.is_some_and(|last| requested < last) || next_link == Some(true) {
            warn!(page = requested, "empty page while metadata claims more; ending");
        }
        return PageStatus::Last;
    }

    if let Some(current) = meta.current_page.filter(|&current| current != requested) {
        warn!(requested, current, "server answered a different page; ending");
        return PageStatus::Last;
    }

    if let Some(last) = meta.last_page {
        if requested > last {
            warn!(requested, last, "page beyond last_page still carried records");
        }
        return if requested < last {
            PageStatus::MoreRemain
        } else {
            PageStatus::Last
        };
    }

    match next_link {
        Some(true) => PageStatus::MoreRemain,
        _ => PageStatus::Last,
    }
}

/// Decode a single-record payload, as returned by `/cards/{id}` and `/decks/{slug}`
///
/// The record is either the payload itself or wrapped in a `data` object.
/// A `null` payload means the server has no such entity.
pub fn decode_single(payload: Value, resource: &str) -> Result<Value> {
    match payload {
        Value::Null => Err(FabDbError::NotFound {
            resource: resource.to_string(),
        }),
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) if map.keys().all(|k| k == "meta" || k == "links") => {
                Ok(inner)
            }
            Some(Value::Null) if map.is_empty() => Err(FabDbError::NotFound {
                resource: resource.to_string(),
            }),
            Some(other) => {
                map.insert("data".into(), other);
                Ok(Value::Object(map))
            }
            None if map.is_empty() => Err(FabDbError::NotFound {
                resource: resource.to_string(),
            }),
            None => Ok(Value::Object(map)),
        },
        other => Err(FabDbError::MalformedResponse(format!(
            "expected a single JSON object for {resource}, got {}",
            type_name(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_with_page_count() {
        let payload = json!({
            "data": [{"identifier": "a"}, {"identifier": "b"}],
            "meta": {"current_page": 1, "last_page": 3, "per_page": 2, "total": 6}
        });
        let page = Page::decode(&payload, 1).unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0]["identifier"], "a");
        assert_eq!(page.meta.total, Some(6));
        assert_eq!(page.status, PageStatus::MoreRemain);
    }

    #[test]
    fn test_final_page_by_count() {
        let payload = json!({
            "data": [{"identifier": "e"}],
            "meta": {"current_page": 3, "last_page": 3}
        });
        assert!(Page::decode(&payload, 3).unwrap().is_last());
    }

    #[test]
    fn test_next_link_fallback() {
        let more = json!({"data": [{}], "links": {"next": "https://api.fabdb.net/cards?page=2"}});
        assert_eq!(Page::decode(&more, 1).unwrap().status, PageStatus::MoreRemain);

        let done = json!({"data": [{}], "links": {"next": null}});
        assert_eq!(Page::decode(&done, 2).unwrap().status, PageStatus::Last);
    }

    #[test]
    fn test_no_metadata_is_single_page() {
        let payload = json!({"data": [{}, {}]});
        assert!(Page::decode(&payload, 1).unwrap().is_last());
    }

    #[test]
    fn test_empty_page_is_last_regardless_of_meta() {
        let payload = json!({
            "data": [],
            "meta": {"current_page": 2, "last_page": 5},
            "links": {"next": "https://api.fabdb.net/cards?page=3"}
        });
        assert!(Page::decode(&payload, 2).unwrap().is_last());
    }

    #[test]
    fn test_server_answering_another_page_ends() {
        // asked for page 2, got page 1 again
        let payload = json!({
            "data": [{"identifier": "A1"}],
            "meta": {"current_page": 1, "last_page": 3}
        });
        assert!(Page::decode(&payload, 2).unwrap().is_last());
        assert!(!Page::decode(&payload, 1).unwrap().is_last());
    }

    #[test]
    fn test_missing_record_list_is_malformed() {
        for payload in [json!({"meta": {}}), json!({"data": {"a": 1}}), json!([1, 2])] {
            assert!(matches!(
                Page::decode(&payload, 1),
                Err(FabDbError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_decode_single() {
        let bare = json!({"identifier": "WTR001", "name": "Rhinar"});
        assert_eq!(decode_single(bare.clone(), "cards/WTR001").unwrap(), bare);

        let wrapped = json!({"data": {"identifier": "WTR001", "name": "Rhinar"}});
        assert_eq!(decode_single(wrapped, "cards/WTR001").unwrap(), bare);

        assert!(decode_single(Value::Null, "cards/nope").unwrap_err().is_not_found());
        assert!(decode_single(json!({}), "cards/nope").unwrap_err().is_not_found());
        assert!(matches!(
            decode_single(json!([bare]), "cards/WTR001"),
            Err(FabDbError::MalformedResponse(_))
        ));
    }
}
