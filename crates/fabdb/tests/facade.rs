//! Exercises the public surface through the facade crate only.

use async_trait::async_trait;
use fabdb::serde_json::{json, Value};
use fabdb::{FabDbClient, FabDbError, PitchValue, Query, Transport};
use std::sync::Mutex;

/// Serves a fixed catalogue, honouring `page` and `page_size`
struct Catalogue {
    cards: Vec<Value>,
    requests: Mutex<Vec<Vec<(String, String)>>>,
}

impl Catalogue {
    fn new(count: usize) -> Self {
        let cards = (1..=count)
            .map(|n| {
                json!({
                    "identifier": format!("MON{n:03}"),
                    "name": format!("Card {n}"),
                    "keywords": ["generic", "action"],
                    "stats": {"resource": (n % 3) + 1}
                })
            })
            .collect();
        Self {
            cards,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for Catalogue {
    async fn fetch(&self, path: &str, params: &[(String, String)]) -> fabdb::Result<Value> {
        self.requests.lock().unwrap().push(params.to_vec());
        if path != "cards" {
            return Err(FabDbError::Transport {
                status: Some(404),
                message: "Not Found".into(),
            });
        }

        let get = |key: &str| -> usize {
            params
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse().ok())
                .unwrap()
        };
        let (page, per_page) = (get("page"), get("page_size"));
        let last_page = self.cards.len().div_ceil(per_page).max(1);
        let data: Vec<Value> = self
            .cards
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Ok(json!({
            "data": data,
            "meta": {"current_page": page, "last_page": last_page, "per_page": per_page, "total": self.cards.len()}
        }))
    }
}

#[test]
fn test_search_through_facade() {
    let client = FabDbClient::builder()
        .transport(Catalogue::new(20))
        .page_size(8)
        .build();

    let cards = tokio_test::block_on(async {
        client
            .search_cards(Query::new().keywords("generic"))
            .unwrap()
            .try_collect_all()
            .await
            .unwrap()
    });

    assert_eq!(cards.len(), 20);
    assert_eq!(cards[0].identifier, "MON001");
    assert_eq!(cards[19].identifier, "MON020");
    assert_eq!(cards[0].pitch(), PitchValue::Yellow);
}

#[test]
fn test_unknown_deck_is_not_found() {
    let client = FabDbClient::with_transport(Catalogue::new(1));
    let err = tokio_test::block_on(client.get_deck("bYDmozyB")).unwrap_err();
    assert!(err.is_not_found());
}
