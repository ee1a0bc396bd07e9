#![cfg(feature = "server")]

use campus::domain::config::ApiConfig;
use campus_database::Database;

#[tokio::test]
async fn init_registers_catalog() {
    let db = Database::builder()
        .url("mem://")
        .session("campus_test", "facade")
        .migrations(campus::migrations())
        .init()
        .await
        .expect("connect to mem://");

    let slices = campus::init(&ApiConfig::default(), &db).await.expect("init");
    let names: Vec<_> = slices.iter().map(|s| s.name).collect();
    assert_eq!(names, ["Catalog"]);
}

#[test]
fn router_exposes_every_endpoint() {
    let (_, api) = campus::router().split_for_parts();
    for path in ["/health", "/api/universities", "/api/universities/compare"] {
        assert!(api.paths.paths.contains_key(path), "{path}");
    }
}

#[test]
fn reports_enabled_features() {
    assert!(campus::features::is_enabled("catalog"));
    assert!(campus::features::is_enabled("server"));
    assert!(!campus::features::is_enabled("billing"));
}
