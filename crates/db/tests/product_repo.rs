//! Repository behaviour against the in-memory record store.
//!
//! Covers create/get, pagination, the tag filter, the shallow-merge edit law,
//! idempotent delete and store-unavailable propagation.

use std::sync::Arc;

use assert_matches::assert_matches;
use catalog_core::error::CoreError;
use catalog_core::listing::ListOptions;
use catalog_core::product::{NewProduct, ProductDocument, ProductPatch};
use catalog_db::repositories::ProductRepo;
use catalog_db::store::{MemoryProductStore, ProductStore};
use catalog_db::{RepoError, StoreError};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn product_body(id: Option<&str>, tags: &[&str]) -> serde_json::Value {
    let mut body = json!({
        "likes": 0,
        "urls": {"regular": "a", "small": "b", "thumb": "c"},
        "links": {"self": "s", "html": "h"},
        "user": {"id": "u1", "first_name": "F", "username": "f"},
        "tags": tags.iter().map(|t| json!({"title": t})).collect::<Vec<_>>(),
    });
    if let Some(id) = id {
        body["id"] = json!(id);
    }
    body
}

fn new_product(id: Option<&str>, tags: &[&str]) -> NewProduct {
    NewProduct::from_json(product_body(id, tags)).unwrap()
}

fn page(offset: i64, limit: i64) -> ListOptions {
    ListOptions {
        offset,
        limit,
        tag: None,
    }
}

fn ids(products: &[ProductDocument]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

async fn seeded_store(count: usize) -> MemoryProductStore {
    let store = MemoryProductStore::new();
    for i in 0..count {
        let tags: &[&str] = if i % 2 == 0 { &["even"] } else { &["odd"] };
        ProductRepo::create(&store, new_product(Some(&format!("p{i:02}")), tags))
            .await
            .unwrap();
    }
    store
}

// ---------------------------------------------------------------------------
// Create / get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_returns_input_plus_id() {
    let store = MemoryProductStore::new();
    let input = new_product(None, &["nature"]);

    let created = ProductRepo::create(&store, input.clone()).await.unwrap();
    let fetched = ProductRepo::get(&store, &created.id).await.unwrap().unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(fetched, created);
    assert_eq!(fetched.fields, input.fields);
}

#[tokio::test]
async fn generated_ids_are_unique() {
    let store = MemoryProductStore::new();
    let a = ProductRepo::create(&store, new_product(None, &[])).await.unwrap();
    let b = ProductRepo::create(&store, new_product(None, &[])).await.unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn get_unknown_id_is_none() {
    let store = MemoryProductStore::new();
    assert!(ProductRepo::get(&store, "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_create_persists_nothing() {
    let store = MemoryProductStore::new();
    let mut body = product_body(None, &[]);
    body.as_object_mut().unwrap().remove("likes");

    let err = ProductRepo::create(&store, NewProduct::from_json(body).unwrap())
        .await
        .unwrap_err();

    assert_matches!(err, RepoError::Core(CoreError::InvalidRecord { .. }));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() {
    let store = MemoryProductStore::new();
    ProductRepo::create(&store, new_product(Some("same"), &[])).await.unwrap();

    let err = ProductRepo::create(&store, new_product(Some("same"), &[]))
        .await
        .unwrap_err();

    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));
    assert_eq!(store.len().await, 1);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_sorted_by_id() {
    let store = MemoryProductStore::new();
    for id in ["b", "c", "a"] {
        ProductRepo::create(&store, new_product(Some(id), &[])).await.unwrap();
    }

    let all = ProductRepo::list(&store, &ListOptions::default()).await.unwrap();

    assert_eq!(ids(&all), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn default_page_size_is_25() {
    let store = seeded_store(30).await;
    let first = ProductRepo::list(&store, &ListOptions::default()).await.unwrap();
    assert_eq!(first.len(), 25);
}

#[tokio::test]
async fn consecutive_pages_concatenate_to_one_larger_page() {
    let store = seeded_store(12).await;

    for (n, m) in [(0, 5), (3, 4), (5, 20), (12, 3)] {
        let mut split = ProductRepo::list(&store, &page(0, n)).await.unwrap();
        split.extend(ProductRepo::list(&store, &page(n, m)).await.unwrap());

        let whole = ProductRepo::list(&store, &page(0, n + m)).await.unwrap();

        assert_eq!(ids(&split), ids(&whole), "n={n} m={m}");
    }
}

#[tokio::test]
async fn zero_limit_and_past_the_end_offset_are_empty() {
    let store = seeded_store(3).await;
    assert!(ProductRepo::list(&store, &page(0, 0)).await.unwrap().is_empty());
    assert!(ProductRepo::list(&store, &page(10, 5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn tag_filter_returns_exact_subset() {
    let store = seeded_store(6).await;
    let options = ListOptions {
        tag: Some("even".into()),
        ..ListOptions::default()
    };

    let even = ProductRepo::list(&store, &options).await.unwrap();

    assert_eq!(ids(&even), vec!["p00", "p02", "p04"]);
    assert!(even.iter().all(|p| p.fields.has_tag("even")));
}

#[tokio::test]
async fn unmatched_tag_is_empty_not_an_error() {
    let store = seeded_store(4).await;
    let options = ListOptions {
        tag: Some("Even".into()),
        ..ListOptions::default()
    };
    assert!(ProductRepo::list(&store, &options).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_changes_only_the_supplied_field() {
    let store = MemoryProductStore::new();
    let before = ProductRepo::create(&store, new_product(None, &["nature"])).await.unwrap();
    let before_json = serde_json::to_value(&before).unwrap();

    let patch = ProductPatch::from_json(json!({"likes": 5})).unwrap();
    let after = ProductRepo::edit(&store, &before.id, patch).await.unwrap();
    let after_json = serde_json::to_value(&after).unwrap();

    assert_eq!(after_json["likes"], 5);
    for (key, value) in before_json.as_object().unwrap() {
        if key != "likes" {
            assert_eq!(&after_json[key], value, "field {key} changed");
        }
    }
    assert_eq!(ProductRepo::get(&store, &before.id).await.unwrap().unwrap(), after);
}

#[tokio::test]
async fn edit_unknown_id_is_not_found() {
    let store = MemoryProductStore::new();
    let patch = ProductPatch::from_json(json!({"likes": 1})).unwrap();

    let err = ProductRepo::edit(&store, "nope", patch).await.unwrap_err();

    assert_matches!(err, RepoError::Core(CoreError::NotFound { id, .. }) => {
        assert_eq!(id, "nope");
    });
}

#[tokio::test]
async fn edit_removing_required_field_is_rejected_and_not_saved() {
    let store = MemoryProductStore::new();
    let created = ProductRepo::create(&store, new_product(None, &[])).await.unwrap();
    let patch = ProductPatch::from_json(json!({"user": null})).unwrap();

    let err = ProductRepo::edit(&store, &created.id, patch).await.unwrap_err();

    assert_matches!(err, RepoError::Core(CoreError::InvalidRecord { .. }));
    let stored = ProductRepo::get(&store, &created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn concurrent_edits_last_write_wins() {
    let store = Arc::new(MemoryProductStore::new());
    let created = ProductRepo::create(store.as_ref(), new_product(None, &[])).await.unwrap();

    let mut handles = Vec::new();
    for likes in 1..=8 {
        let store = Arc::clone(&store);
        let id = created.id.clone();
        handles.push(tokio::spawn(async move {
            let patch = ProductPatch::from_json(json!({"likes": likes})).unwrap();
            ProductRepo::edit(store.as_ref(), &id, patch).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = ProductRepo::get(store.as_ref(), &created.id).await.unwrap().unwrap();
    let likes = stored.fields.likes.unwrap();
    assert!((1..=8).contains(&likes));
}

// ---------------------------------------------------------------------------
// Destroy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn destroy_reports_count_and_is_idempotent() {
    let store = MemoryProductStore::new();
    let created = ProductRepo::create(&store, new_product(None, &[])).await.unwrap();

    let first = ProductRepo::destroy(&store, &created.id).await.unwrap();
    let second = ProductRepo::destroy(&store, &created.id).await.unwrap();

    assert_eq!(first.deleted_count, 1);
    assert_eq!(second.deleted_count, 0);
    assert!(second.acknowledged);
    assert!(ProductRepo::get(&store, &created.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Pre-existing records and store failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_stored_records_are_still_readable() {
    let store = MemoryProductStore::new();
    let legacy: ProductDocument = serde_json::from_value(json!({"_id": "old", "likes": 2})).unwrap();
    store.seed(legacy.clone()).await;

    let fetched = ProductRepo::get(&store, "old").await.unwrap().unwrap();
    assert_eq!(fetched, legacy);

    let listed = ProductRepo::list(&store, &ListOptions::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn unavailable_store_fails_each_operation() {
    let store = MemoryProductStore::new();
    store.set_available(false);

    let err = ProductRepo::list(&store, &ListOptions::default()).await.unwrap_err();
    assert_matches!(err, RepoError::Store(ref e) if e.is_unavailable());

    let err = ProductRepo::destroy(&store, "x").await.unwrap_err();
    assert_matches!(err, RepoError::Store(StoreError::Unavailable(_)));

    assert!(store.ping().await.is_err());

    store.set_available(true);
    assert!(ProductRepo::list(&store, &ListOptions::default()).await.is_ok());
}
