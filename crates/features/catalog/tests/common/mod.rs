#![allow(dead_code)]

use campus_catalog::{Catalog, CatalogError, UniversityQueryParams};
use campus_kernel::domain::University;
use std::path::PathBuf;

/// Fixed clock for derived attributes.
pub const YEAR: i32 = 2024;

pub fn seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data/universities.json")
}

pub fn universities() -> Vec<University> {
    campus_catalog::seed::read_file(seed_path()).expect("seed file")
}

pub fn params(pairs: &[(&str, &str)]) -> UniversityQueryParams {
    let object = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), serde_json::Value::String((*v).to_owned())))
        .collect();
    serde_json::from_value(serde_json::Value::Object(object)).expect("query params")
}

pub async fn ids(catalog: &Catalog, pairs: &[(&str, &str)]) -> Vec<String> {
    let page = catalog.search(&params(pairs), YEAR).await.expect("search");
    page.data.into_iter().map(|u| u.id).collect()
}

pub async fn sorted_ids(catalog: &Catalog, pairs: &[(&str, &str)]) -> Vec<String> {
    let mut ids = ids(catalog, pairs).await;
    ids.sort();
    ids
}

/// Behaviour every store must share, checked against the bundled seed data.
pub async fn assert_search_scenarios(catalog: &Catalog) {
    assert_eq!(
        sorted_ids(catalog, &[("countries", "USA, UK"), ("minTuition", "20000")]).await,
        ["harvard", "mit", "stanford"]
    );

    // Region replaces the explicit country list.
    assert_eq!(
        sorted_ids(catalog, &[("countries", "Japan"), ("region", "europe")]).await,
        ["cambridge", "eth", "imperial", "oxford", "tum"]
    );

    // topTier replaces the ranking range.
    assert_eq!(
        sorted_ids(catalog, &[("minRanking", "3"), ("topTier", "5")]).await,
        ["cambridge", "harvard", "mit", "oxford", "stanford"]
    );
    assert_eq!(
        sorted_ids(catalog, &[("minRanking", "90"), ("maxRanking", "abc")]).await,
        ["uct", "usp"]
    );

    assert_eq!(
        sorted_ids(catalog, &[("search", "TECHNOLOGY")]).await,
        ["hkust", "mit"]
    );
    assert_eq!(
        sorted_ids(catalog, &[("location", "cambridge")]).await,
        ["cambridge", "harvard", "mit"]
    );
    assert_eq!(
        sorted_ids(catalog, &[("minYear", "1800"), ("maxYear", "1870")]).await,
        ["eth", "melbourne", "mit", "toronto", "tum", "uct"]
    );

    assert_eq!(
        sorted_ids(catalog, &[("affordability", "moderate,premium")]).await,
        ["hkust", "melbourne", "nus", "toronto"]
    );
    assert_eq!(
        sorted_ids(catalog, &[("institutionAge", "ancient"), ("countries", "UK")]).await,
        ["cambridge", "oxford"]
    );
    assert!(sorted_ids(catalog, &[("affordability", "cheap")]).await.is_empty());

    let ranked = ids(catalog, &[("valueForMoney", "true")]).await;
    assert_eq!(&ranked[..3], ["tum", "usp", "eth"]);

    assert_eq!(
        ids(catalog, &[("sortBy", "ranking"), ("page", "2"), ("limit", "4")]).await,
        ["cambridge", "imperial", "eth", "nus"]
    );
    assert_eq!(
        ids(catalog, &[("sortBy", "tuitionFee"), ("sortOrder", "DESC"), ("limit", "2")]).await,
        ["mit", "stanford"]
    );

    let page = catalog.search(&params(&[]), YEAR).await.expect("search");
    assert_eq!(page.pagination.total, 15);
    assert_eq!(page.pagination.limit, 50);
    assert_eq!(page.pagination.total_pages, 1);
    assert!(!page.filters.applied);

    let page = catalog
        .search(&params(&[("sortBy", "ranking"), ("page", "9"), ("limit", "4")]), YEAR)
        .await
        .expect("search");
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_pages, 4);

    let err = catalog.search(&params(&[("sortBy", "name")]), YEAR).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation { .. }));
}

pub async fn assert_compare_scenarios(catalog: &Catalog) {
    let comparison = catalog.compare("mit, universities:oxford", YEAR).await.expect("compare");
    assert_eq!(comparison.first.university.id, "mit");
    assert_eq!(comparison.second.university.id, "oxford");
    assert_eq!(comparison.cost_difference.summary, "University of Oxford is cheaper");

    let reversed = catalog.compare("oxford,mit", YEAR).await.expect("compare");
    assert_eq!(reversed.first.university.id, "oxford");

    let err = catalog.compare("mit,atlantis", YEAR).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));

    let err = catalog.compare("mit", YEAR).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation { .. }));

    let err = catalog.compare("mit,users:oxford", YEAR).await.unwrap_err();
    assert!(matches!(err, CatalogError::RecordId { .. }));
}
