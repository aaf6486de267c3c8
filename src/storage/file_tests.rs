use super::*;
use crate::content::AssetKind;
use std::sync::Arc;
use tempfile::TempDir;

fn sample_item(key: &str, order: i64) -> ContentItem {
    let mut item = ContentItem::new(key, order);
    item.fields
        .insert("title".to_string(), Value::String(format!("Title {key}")));
    item
}

#[tokio::test]
async fn test_save_and_find_by_key() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let mut item = sample_item("web-design", 2);
    item.assets.insert(
        "heroImage".to_string(),
        AssetRef::managed("https://assets.test/images/p1.png", "p1", AssetKind::Image),
    );
    item.links = NavigationLink::between(Some("seo"), None);
    store.save("services", &item).await.unwrap();

    assert!(temp.path().join("services").join("web-design.md").exists());
    let loaded = store.find_by_key("services", "web-design").await.unwrap().unwrap();
    assert_eq!(loaded, item);
}

#[tokio::test]
async fn test_body_field_is_markdown_body() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let mut item = sample_item("launch", 0);
    item.fields.insert(
        "body".to_string(),
        Value::String("Doors open at 7.\n\nBring friends.".to_string()),
    );
    store.save("events", &item).await.unwrap();

    let raw = std::fs::read_to_string(temp.path().join("events").join("launch.md")).unwrap();
    assert!(raw.contains("# launch"));
    assert!(raw.ends_with("Bring friends.\n"));
    assert!(!raw.contains("body:"));

    let loaded = store.find_by_key("events", "launch").await.unwrap().unwrap();
    assert_eq!(loaded.text_field("body"), Some("Doors open at 7.\n\nBring friends."));
}

#[tokio::test]
async fn test_find_all_sorted_by_order_then_key() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    for (key, order) in [("c", 1), ("b", 1), ("a", 5), ("d", 0)] {
        store.save("banners", &sample_item(key, order)).await.unwrap();
    }
    let keys: Vec<String> = store
        .find_all_sorted_by_order("banners")
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.key)
        .collect();
    assert_eq!(keys, vec!["d", "b", "c", "a"]);
}

#[tokio::test]
async fn test_find_all_skips_unparsable_files() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    store.save("banners", &sample_item("ok", 0)).await.unwrap();
    std::fs::write(temp.path().join("banners").join("broken.md"), "not frontmatter").unwrap();
    std::fs::write(temp.path().join("banners").join("notes.txt"), "ignored").unwrap();

    let items = store.find_all_sorted_by_order("banners").await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_missing_collection_is_empty() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    assert!(store.find_all_sorted_by_order("events").await.unwrap().is_empty());
    assert!(store.find_by_key("events", "x").await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_links_preserves_other_fields() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let item = sample_item("b", 3);
    store.save("services", &item).await.unwrap();

    store
        .save_links("services", "b", &NavigationLink::between(Some("a"), Some("c")))
        .await
        .unwrap();
    let loaded = store.find_by_key("services", "b").await.unwrap().unwrap();
    assert_eq!(loaded.prev_key(), Some("a"));
    assert_eq!(loaded.next_key(), Some("c"));
    assert_eq!(loaded.order, 3);
    assert_eq!(loaded.fields, item.fields);
}

#[tokio::test]
async fn test_save_links_missing_item() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let result = store
        .save_links("services", "ghost", &NavigationLink::default())
        .await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_by_key() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    store.save("events", &sample_item("gala", 0)).await.unwrap();
    assert!(store.delete_by_key("events", "gala").await.unwrap());
    assert!(!store.delete_by_key("events", "gala").await.unwrap());
}

#[tokio::test]
async fn test_rejects_path_traversal() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let result = store.find_by_key("services", "../secret").await;
    assert!(matches!(result, Err(StorageError::InvalidName(_))));
    let result = store.find_all_sorted_by_order("../etc").await;
    assert!(matches!(result, Err(StorageError::InvalidName(_))));
}

fn with_hero(key: &str, provider_id: &str) -> ContentItem {
    let mut item = sample_item(key, 0);
    item.assets.insert(
        "heroImage".to_string(),
        AssetRef::managed(
            format!("https://assets.test/images/{provider_id}.png"),
            provider_id,
            AssetKind::Image,
        ),
    );
    item
}

fn hero_id(item: &ContentItem) -> Option<&str> {
    item.assets
        .get("heroImage")
        .and_then(|asset| asset.provider_id.as_deref())
}

#[tokio::test]
async fn test_save_order_preserves_other_fields() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let item = with_hero("b", "p1");
    store.save("services", &item).await.unwrap();

    store.save_order("services", "b", 9).await.unwrap();
    let loaded = store.find_by_key("services", "b").await.unwrap().unwrap();
    assert_eq!(loaded.order, 9);
    assert_eq!(loaded.assets, item.assets);
    assert_eq!(loaded.fields, item.fields);

    let result = store.save_order("services", "ghost", 1).await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_link_writes_never_revert_a_concurrent_asset_write() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(temp.path()));

    for _ in 0..100 {
        store.save("services", &with_hero("a", "old")).await.unwrap();
        let linker = Arc::clone(&store);
        let links = tokio::spawn(async move {
            linker
                .save_links("services", "a", &NavigationLink::between(None, Some("b")))
                .await
        });
        store.save("services", &with_hero("a", "new")).await.unwrap();
        links.await.unwrap().unwrap();

        let loaded = store.find_by_key("services", "a").await.unwrap().unwrap();
        assert_eq!(hero_id(&loaded), Some("new"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reorder_never_reverts_a_concurrent_asset_write() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(temp.path()));
    let ranking = crate::reorder::Ranking::Keys(vec!["b".into(), "a".into()]);

    for _ in 0..50 {
        store.save("services", &with_hero("a", "old")).await.unwrap();
        store.save("services", &sample_item("b", 1)).await.unwrap();
        let reorderer = Arc::clone(&store);
        let moved = ranking.clone();
        let reorder = tokio::spawn(async move {
            crate::reorder::reorder(reorderer.as_ref(), "services", &moved).await
        });
        let mut updated = with_hero("a", "new");
        updated.order = 0;
        store.save("services", &updated).await.unwrap();
        reorder.await.unwrap().unwrap();

        let loaded = store.find_by_key("services", "a").await.unwrap().unwrap();
        assert_eq!(hero_id(&loaded), Some("new"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_listing_tolerates_concurrent_deletes() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(temp.path()));

    for _ in 0..20 {
        for n in 0..20 {
            store
                .save("events", &sample_item(&format!("e{n}"), n))
                .await
                .unwrap();
        }
        let deleter = Arc::clone(&store);
        let deletes = tokio::spawn(async move {
            for n in 0..20 {
                deleter.delete_by_key("events", &format!("e{n}")).await.unwrap();
            }
        });
        for _ in 0..5 {
            let listed = store.find_all_sorted_by_order("events").await;
            assert!(listed.is_ok(), "listing failed: {listed:?}");
        }
        deletes.await.unwrap();
        assert!(store.find_all_sorted_by_order("events").await.unwrap().is_empty());
    }
}
