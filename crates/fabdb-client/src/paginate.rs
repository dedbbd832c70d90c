//! Lazy, de-paginated search results.
//!
//! [`Paginated`] turns one logical query into a sequence of domain objects,
//! fetching the next page only when the buffered one has been consumed. At
//! most one page of objects is held in memory, and a caller that stops early
//! never triggers a request for pages it did not reach.

use crate::transport::Transport;
use fabdb_core::{FabDbError, FromRecord, Page, Query, Result};
use futures_util::stream::{self, Stream};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, trace};

/// Mutable state threading one search across requests
#[derive(Debug)]
struct PageCursor<T> {
    /// Next page to request (1-indexed)
    current_page: u32,
    /// Objects fetched but not yet yielded, in server order
    buffer: VecDeque<T>,
    /// No further page will be requested
    exhausted: bool,
    /// A fetch failed; the sequence cannot continue
    failed: bool,
}

impl<T> PageCursor<T> {
    const fn new() -> Self {
        Self {
            current_page: 1,
            buffer: VecDeque::new(),
            exhausted: false,
            failed: false,
        }
    }
}

/// A lazy, finite, non-restartable sequence of search results
///
/// Not meant to be shared between consumers; start one search per consumer.
/// Once the sequence has ended, whether by exhausting the results or by an
/// error, it stays ended. Issue a new search to run the query again.
///
/// ```rust,ignore
/// let mut results = client.search_cards(Query::new().class("ranger"))?;
/// while let Some(card) = results.next().await? {
///     println!("{card}");
/// }
/// ```
pub struct Paginated<T> {
    transport: Arc<dyn Transport>,
    path: String,
    query: Query,
    page_size: u32,
    cursor: PageCursor<T>,
    fetches: u32,
    total: Option<u64>,
}

impl<T: FromRecord> Paginated<T> {
    /// Start a search over `path`
    ///
    /// The query is validated here, so unknown filters fail before any
    /// request is made.
    pub fn new(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        query: Query,
        page_size: u32,
    ) -> Result<Self> {
        query.normalized()?;
        Ok(Self {
            transport,
            path: path.into(),
            query,
            page_size,
            cursor: PageCursor::new(),
            fetches: 0,
            total: None,
        })
    }

    /// Next object in server order, or `None` once the results are exhausted
    ///
    /// Suspends only when the buffered page is empty and another page has to
    /// be fetched. An error ends the sequence.
    pub async fn next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.cursor.buffer.pop_front() {
                trace!(remaining = self.cursor.buffer.len(), "yield buffered {}", T::KIND);
                return Ok(Some(item));
            }

            if self.cursor.exhausted {
                return Ok(None);
            }

            if let Err(e) = self.fetch_page().await {
                self.cursor.exhausted = true;
                self.cursor.failed = true;
                self.cursor.buffer.clear();
                debug!(error = %e, page = self.cursor.current_page, "search failed");
                return Err(e);
            }
        }
    }

    /// Request, decode and map the page at the cursor
    async fn fetch_page(&mut self) -> Result<()> {
        let page_number = self.cursor.current_page;
        let params = self.query.params(page_number, self.page_size)?;

        debug!(path = %self.path, page = page_number, params = params.len(), "fetching page");
        self.fetches += 1;
        let payload = self.transport.fetch(&self.path, &params).await?;

        let page = Page::decode(&payload, page_number)?;
        let items = map_records::<T>(&page)?;

        if self.total.is_none() {
            self.total = page.meta.total;
        }

        // a non-empty last page is still yielded in full before the end
        self.cursor.exhausted = page.is_last() || items.is_empty();
        self.cursor.buffer = items.into();
        self.cursor.current_page += 1;
        Ok(())
    }

    /// Drain the remaining results into a vector
    pub async fn try_collect_all(mut self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await? {
            out.push(item);
        }
        Ok(out)
    }

    /// Turn the sequence into a [`Stream`]
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        stream::try_unfold(self, |mut results| async move {
            Ok::<_, FabDbError>(results.next().await?.map(|item| (item, results)))
        })
    }

    /// Number of transport calls made so far
    #[must_use]
    pub const fn fetches(&self) -> u32 {
        self.fetches
    }

    /// Total matching records reported by the server, once the first page arrived
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns true once no further items will be produced
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor.exhausted && self.cursor.buffer.is_empty()
    }

    /// Returns true if the sequence ended because a fetch failed
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.cursor.failed
    }
}

/// Map every record of a page; one bad record fails the whole page
fn map_records<T: FromRecord>(page: &Page) -> Result<Vec<T>> {
    let mut seen = HashSet::with_capacity(page.records.len());
    page.records
        .iter()
        .map(|record| {
            let item = T::from_record(record)?;
            if !seen.insert(item.id().to_string()) {
                return Err(FabDbError::MalformedResponse(format!(
                    "duplicate {} `{}` in one page",
                    T::KIND,
                    item.id()
                )));
            }
            Ok(item)
        })
        .collect()
}

impl<T> std::fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginated")
            .field("path", &self.path)
            .field("query", &self.query)
            .field("page_size", &self.page_size)
            .field("next_page", &self.cursor.current_page)
            .field("buffered", &self.cursor.buffer.len())
            .field("exhausted", &self.cursor.exhausted)
            .field("fetches", &self.fetches)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fabdb_core::{Card, PitchValue};
    use futures_util::{StreamExt, TryStreamExt};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Serves pre-built page payloads and records every request
    #[derive(Default)]
    struct ScriptedTransport {
        pages: Mutex<VecDeque<Result<Value>>>,
        requests: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedTransport {
        fn new(pages: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::default(),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn requested_pages(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter_map(|params| {
                    params
                        .iter()
                        .find(|(k, _)| k == "page")
                        .map(|(_, v)| v.clone())
                })
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
            assert_eq!(path, "cards");
            self.requests.lock().unwrap().push(params.to_vec());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected fetch of page {params:?}"))
        }
    }

    fn card(n: usize, pitch: u8) -> Value {
        json!({
            "identifier": format!("ARC{n:03}"),
            "name": format!("Card {n}"),
            "keywords": ["ranger", "action", "attack"],
            "stats": {"resource": pitch, "cost": 1},
        })
    }

    /// `total` records split into pages of `page_size`, with full metadata
    fn pages(total: usize, page_size: usize) -> Vec<Result<Value>> {
        let last_page = total.div_ceil(page_size).max(1);
        (1..=last_page)
            .map(|page| {
                let start = (page - 1) * page_size;
                let end = (start + page_size).min(total);
                Ok(json!({
                    "data": (start..end).map(|n| card(n + 1, 2)).collect::<Vec<_>>(),
                    "meta": {"current_page": page, "last_page": last_page, "per_page": page_size, "total": total},
                }))
            })
            .collect()
    }

    fn search(transport: &Arc<ScriptedTransport>, query: Query, page_size: u32) -> Paginated<Card> {
        Paginated::new(transport.clone(), "cards", query, page_size).unwrap()
    }

    #[test]
    fn test_nothing_fetched_until_first_item_requested() {
        let transport = ScriptedTransport::new(pages(3, 10));
        let mut results = search(&transport, Query::new().class("ranger"), 10);
        assert_eq!(transport.calls(), 0);

        let first = tokio_test::block_on(results.next()).unwrap().unwrap();
        assert_eq!(first.identifier, "ARC001");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_three_pages_in_server_order() {
        let transport = ScriptedTransport::new(pages(20, 8));
        let results = search(&transport, Query::new().class("ranger").pitch(2), 8);

        let cards = results.try_collect_all().await.unwrap();

        assert_eq!(cards.len(), 20);
        assert_eq!(transport.calls(), 3);
        assert_eq!(transport.requested_pages(), vec!["1", "2", "3"]);
        assert!(cards.iter().all(|c| c.pitch() == PitchValue::Yellow));

        let ids: Vec<_> = cards.iter().map(|c| c.identifier.clone()).collect();
        let expected: Vec<_> = (1..=20).map(|n| format!("ARC{n:03}")).collect();
        assert_eq!(ids, expected);
        // item 9 (first of page 2) directly follows item 8 (last of page 1)
        assert_eq!(ids[7], "ARC008");
        assert_eq!(ids[8], "ARC009");
    }

    #[tokio::test]
    async fn test_fetch_count_equals_page_count() {
        for (total, size) in [(1, 8), (8, 8), (9, 8), (17, 4), (30, 10)] {
            let transport = ScriptedTransport::new(pages(total, size));
            let results = search(&transport, Query::new(), u32::try_from(size).unwrap());
            let cards = results.try_collect_all().await.unwrap();

            assert_eq!(cards.len(), total);
            assert_eq!(transport.calls(), total.div_ceil(size));
        }
    }

    #[tokio::test]
    async fn test_early_termination_bounds_fetches() {
        let transport = ScriptedTransport::new(pages(20, 8));
        let mut results = search(&transport, Query::new(), 8);

        for m in 1..=9_usize {
            let card = results.next().await.unwrap().unwrap();
            assert_eq!(card.identifier, format!("ARC{m:03}"));
            assert!(transport.calls() <= m.div_ceil(8));
        }
        assert_eq!(results.fetches(), 2);
        assert_eq!(results.total(), Some(20));
        drop(results);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_set() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "data": [],
            "meta": {"current_page": 1, "last_page": 1, "total": 0}
        }))]);
        let mut results = search(&transport, Query::new().keywords("nothing"), 8);

        assert!(results.next().await.unwrap().is_none());
        assert!(results.is_exhausted());
        assert_eq!(transport.calls(), 1);

        // stays exhausted, no implicit re-fetch of page 1
        assert!(results.next().await.unwrap().is_none());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_ends_despite_metadata() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"data": [card(1, 1)], "meta": {"current_page": 1, "last_page": 5}})),
            Ok(json!({"data": [], "meta": {"current_page": 2, "last_page": 5}})),
        ]);
        let cards = search(&transport, Query::new(), 1).try_collect_all().await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_server_stuck_on_first_page_terminates() {
        let stuck = || -> Result<Value> {
            Ok(json!({"data": [card(1, 1)], "meta": {"current_page": 1, "last_page": 3}}))
        };
        let transport = ScriptedTransport::new((0..5).map(|_| stuck()).collect());
        let cards = search(&transport, Query::new(), 1)
            .try_collect_all()
            .await
            .unwrap();

        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.identifier == "ARC001"));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_next_link_pagination() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"data": [card(1, 1), card(2, 1)], "links": {"next": "https://api.fabdb.net/cards?page=2"}})),
            Ok(json!({"data": [card(3, 1)], "links": {"next": null}})),
        ]);
        let cards = search(&transport, Query::new(), 2).try_collect_all().await.unwrap();

        assert_eq!(cards.len(), 3);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_name_fails_whole_page() {
        let mut bad = card(2, 1);
        bad.as_object_mut().unwrap().remove("name");
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "data": [card(1, 1), bad, card(3, 1)],
            "meta": {"current_page": 1, "last_page": 1}
        }))]);
        let mut results = search(&transport, Query::new(), 8);

        match results.next().await {
            Err(FabDbError::MissingField { field }) => assert_eq!(field, "name"),
            other => panic!("expected MissingField, got {other:?}"),
        }
        assert!(results.has_failed());
        assert!(results.next().await.unwrap().is_none());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_mid_search_is_not_resumable() {
        let mut script = pages(16, 8);
        script[1] = Err(FabDbError::Transport {
            status: Some(502),
            message: "bad gateway".into(),
        });
        let transport = ScriptedTransport::new(script);
        let mut results = search(&transport, Query::new(), 8);

        for _ in 0..8 {
            results.next().await.unwrap().unwrap();
        }
        let err = results.next().await.unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert!(results.next().await.unwrap().is_none());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_identifier_in_page() {
        let transport = ScriptedTransport::new(vec![Ok(json!({"data": [card(1, 1), card(1, 1)]}))]);
        let err = search(&transport, Query::new(), 8).next().await.unwrap_err();
        assert!(matches!(err, FabDbError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_invalid_filter_fails_before_fetch() {
        let transport = ScriptedTransport::new(Vec::new());
        let err = Paginated::<Card>::new(
            transport.clone(),
            "cards",
            Query::new().filter("colour", "red"),
            8,
        )
        .unwrap_err();

        assert!(matches!(err, FabDbError::InvalidFilter { .. }));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_stream_take_stops_early() {
        let transport = ScriptedTransport::new(pages(30, 10));
        let first: Vec<Card> = search(&transport, Query::new(), 10)
            .into_stream()
            .take(5)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(transport.calls(), 1);
    }
}
