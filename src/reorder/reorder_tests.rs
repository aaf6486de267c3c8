use super::*;
use crate::content::{AssetKind, AssetRef, ContentItem};
use crate::navigation::walk_chain;
use crate::storage::{ContentStore, MemoryStore, StorageError};

fn items() -> Vec<ContentItem> {
    vec![
        ContentItem::new("a", 1),
        ContentItem::new("b", 2),
        ContentItem::new("c", 3),
    ]
}

fn keys(ranking: &[&str]) -> Ranking {
    Ranking::Keys(ranking.iter().map(|k| (*k).to_string()).collect())
}

#[test]
fn test_ranking_from_key_array() {
    let ranking: Ranking = serde_json::from_str(r#"["c", "a", "b"]"#).unwrap();
    assert_eq!(ranking, keys(&["c", "a", "b"]));
}

#[test]
fn test_ranking_from_pairs_accepts_id_alias() {
    let ranking: Ranking =
        serde_json::from_str(r#"[{"id": "c", "order": 0}, {"key": "a", "order": 5}]"#).unwrap();
    assert_eq!(
        ranking,
        Ranking::Positions(vec![RankEntry::new("c", 0), RankEntry::new("a", 5)])
    );
}

#[test]
fn test_entries_use_index_for_keys() {
    let ranking = keys(&["c", "a"]);
    assert_eq!(ranking.entries(), vec![("c", 0), ("a", 1)]);
    assert!(!ranking.is_empty());
    assert!(Ranking::Keys(Vec::new()).is_empty());
}

#[test]
fn test_plan_full_ranking() {
    let plan = plan_reorder(&items(), &keys(&["c", "a", "b"]));
    let orders: Vec<(&str, i64)> = plan
        .changed
        .iter()
        .map(|i| (i.key.as_str(), i.order))
        .collect();
    // a and b already sit at index 1 and 2
    assert_eq!(orders, vec![("c", 0)]);
    assert!(plan.ignored.is_empty());
}

#[test]
fn test_plan_skips_unchanged_and_ignores_unknown() {
    let ranking = Ranking::Positions(vec![
        RankEntry::new("a", 1),
        RankEntry::new("ghost", 0),
        RankEntry::new("c", 9),
    ]);
    let plan = plan_reorder(&items(), &ranking);
    assert_eq!(plan.changed.len(), 1);
    assert_eq!(plan.changed.first().unwrap().key, "c");
    assert_eq!(plan.ignored, vec!["ghost"]);
}

#[test]
fn test_plan_later_duplicate_wins() {
    let ranking = Ranking::Positions(vec![RankEntry::new("a", 7), RankEntry::new("a", 8)]);
    let plan = plan_reorder(&items(), &ranking);
    assert_eq!(plan.changed.first().unwrap().order, 8);
}

#[tokio::test]
async fn test_reorder_relinks_collection() {
    let store = MemoryStore::new();
    store.seed("services", items()).await;

    let report = reorder(&store, "services", &keys(&["c", "a", "b"])).await.unwrap();
    assert!(report.relink.as_ref().unwrap().is_clean());

    let all = store.find_all_sorted_by_order("services").await.unwrap();
    assert_eq!(walk_chain(&all), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_partial_reorder_keeps_omitted_orders() {
    let store = MemoryStore::new();
    store.seed("services", items()).await;

    let ranking = Ranking::Positions(vec![RankEntry::new("a", 10)]);
    let report = reorder(&store, "services", &ranking).await.unwrap();
    assert_eq!(report.reordered, vec!["a"]);

    let b = store.find_by_key("services", "b").await.unwrap().unwrap();
    let c = store.find_by_key("services", "c").await.unwrap().unwrap();
    assert_eq!((b.order, c.order), (2, 3));
    let all = store.find_all_sorted_by_order("services").await.unwrap();
    assert_eq!(walk_chain(&all), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_reorder_with_ties_uses_store_order() {
    let store = MemoryStore::new();
    store.seed("banners", items()).await;

    let ranking = Ranking::Positions(vec![
        RankEntry::new("a", 0),
        RankEntry::new("b", 0),
        RankEntry::new("c", 0),
    ]);
    reorder(&store, "banners", &ranking).await.unwrap();

    let all = store.find_all_sorted_by_order("banners").await.unwrap();
    let chain = walk_chain(&all);
    assert_eq!(chain.len(), 3);
    assert_eq!(chain, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_reorder_unknown_only_still_relinks() {
    let store = MemoryStore::new();
    store.seed("events", items()).await;

    let report = reorder(&store, "events", &keys(&["nope"])).await.unwrap();
    assert!(report.reordered.is_empty());
    assert_eq!(report.ignored, vec!["nope"]);
    assert_eq!(report.relink.unwrap().updated.len(), 3);
}

/// A concurrent write that lands right after the collection is read.
enum Interleaved {
    Save(ContentItem),
    Delete(&'static str),
}

struct RacingStore {
    inner: MemoryStore,
    after_read: std::sync::Mutex<Option<Interleaved>>,
}

impl RacingStore {
    async fn new(write: Interleaved) -> Self {
        let store = Self {
            inner: MemoryStore::new(),
            after_read: std::sync::Mutex::new(Some(write)),
        };
        store.inner.seed("services", items()).await;
        store
    }
}

#[async_trait::async_trait]
impl ContentStore for RacingStore {
    async fn find_all_sorted_by_order(
        &self,
        collection: &str,
    ) -> Result<Vec<ContentItem>, StorageError> {
        let snapshot = self.inner.find_all_sorted_by_order(collection).await?;
        let pending = self.after_read.lock().unwrap().take();
        match pending {
            Some(Interleaved::Save(item)) => self.inner.save(collection, &item).await?,
            Some(Interleaved::Delete(key)) => {
                self.inner.delete_by_key(collection, key).await?;
            }
            None => {}
        }
        Ok(snapshot)
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<ContentItem>, StorageError> {
        self.inner.find_by_key(collection, key).await
    }

    async fn save(&self, collection: &str, item: &ContentItem) -> Result<(), StorageError> {
        self.inner.save(collection, item).await
    }

    async fn save_links(
        &self,
        collection: &str,
        key: &str,
        links: &crate::content::NavigationLink,
    ) -> Result<(), StorageError> {
        self.inner.save_links(collection, key, links).await
    }

    async fn save_order(
        &self,
        collection: &str,
        key: &str,
        order: i64,
    ) -> Result<(), StorageError> {
        self.inner.save_order(collection, key, order).await
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StorageError> {
        self.inner.delete_by_key(collection, key).await
    }
}

#[tokio::test]
async fn test_reorder_keeps_asset_bound_after_read() {
    let mut rebound = ContentItem::new("a", 1);
    rebound.assets.insert(
        "heroImage".to_string(),
        AssetRef::managed("https://cdn.test/media/images/new", "new", AssetKind::Image),
    );
    let store = RacingStore::new(Interleaved::Save(rebound.clone())).await;

    let report = reorder(&store, "services", &keys(&["c", "b", "a"]))
        .await
        .unwrap();
    assert_eq!(report.reordered, vec!["a", "b", "c"]);

    let a = store.find_by_key("services", "a").await.unwrap().unwrap();
    assert_eq!(a.order, 2);
    assert_eq!(a.assets, rebound.assets);
}

#[tokio::test]
async fn test_reorder_skips_item_deleted_after_read() {
    let store = RacingStore::new(Interleaved::Delete("a")).await;

    let report = reorder(&store, "services", &keys(&["c", "b", "a"]))
        .await
        .unwrap();
    assert_eq!(report.reordered, vec!["b", "c"]);
    assert!(store.find_by_key("services", "a").await.unwrap().is_none());

    let all = store.find_all_sorted_by_order("services").await.unwrap();
    assert_eq!(walk_chain(&all), vec!["c", "b"]);
}
