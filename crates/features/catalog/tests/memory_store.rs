mod common;

use campus_catalog::filter::DocumentFilter;
use campus_catalog::{Catalog, MemoryStore, PageLimits, UniversityStore};
use std::sync::Arc;

fn catalog() -> Catalog {
    let store = MemoryStore::with_records(common::universities());
    Catalog::with_store(Arc::new(store), PageLimits::default())
}

#[tokio::test]
async fn search_scenarios() {
    common::assert_search_scenarios(&catalog()).await;
}

#[tokio::test]
async fn compare_scenarios() {
    common::assert_compare_scenarios(&catalog()).await;
}

#[tokio::test]
async fn keeps_insertion_order_and_skips_duplicate_ids() {
    let store = MemoryStore::new();
    let records = common::universities();

    assert_eq!(store.insert_many(records.clone()).await.unwrap(), 15);
    assert_eq!(store.insert_many(records[..3].to_vec()).await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 15);

    let found = store.find(&DocumentFilter::default()).await.unwrap();
    assert_eq!(found, records);
}

#[tokio::test]
async fn limit_is_capped_by_configuration() {
    let store = MemoryStore::with_records(common::universities());
    let catalog =
        Catalog::with_store(Arc::new(store), PageLimits { default_limit: 5, max_limit: 10 });

    let page = catalog.search(&common::params(&[]), common::YEAR).await.unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.pagination.total_pages, 3);

    let page = catalog.search(&common::params(&[("limit", "1000")]), common::YEAR).await.unwrap();
    assert_eq!(page.pagination.limit, 10);
    assert_eq!(page.pagination.total_pages, 2);
}
