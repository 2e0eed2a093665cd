//! Catalog file → offline pipeline, through the same startup path the CLI uses.

mod common;

use common::{clipboard_record, color_picker_record, music_record, temp_dir, write_catalog};
use toolfinder::domain::models::{Config, EmbeddingProviderKind};
use toolfinder::domain::ports::VectorIndex;
use toolfinder::infrastructure::bootstrap::{build_index, embedding_service};
use toolfinder::infrastructure::catalog::load_catalog;
use toolfinder::services::DocumentBuilder;

fn hashed_config() -> Config {
    let mut config = Config::default();
    config.embedding.provider = EmbeddingProviderKind::Hashed;
    config.embedding.dimension = common::TEST_DIMENSION;
    config
}

#[tokio::test]
async fn test_written_catalog_round_trips_through_loader() {
    let dir = temp_dir();
    let records = vec![color_picker_record(), music_record(), clipboard_record()];
    let path = write_catalog(dir.path(), &records);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"extensionTitle\""));
    assert!(raw.contains("\"extensionCommand\""));

    let loaded = load_catalog(&path).await.unwrap();
    assert_eq!(loaded, records);
}

#[tokio::test]
async fn test_loaded_catalog_builds_one_entry_per_record() {
    let dir = temp_dir();
    let path = write_catalog(dir.path(), &[color_picker_record(), music_record()]);
    let records = load_catalog(&path).await.unwrap();

    let service = embedding_service(&hashed_config().embedding).unwrap();
    let index = build_index(&records, service).await.unwrap();

    assert_eq!(index.len(), 2);
    let builder = DocumentBuilder::new();
    for (entry, record) in index.entries().iter().zip(&records) {
        assert_eq!(entry.document(), &builder.build(record).unwrap());
        assert_eq!(entry.embedding().len(), common::TEST_DIMENSION);
    }
}

#[tokio::test]
async fn test_missing_catalog_names_the_path() {
    let dir = temp_dir();
    let missing = dir.path().join("nope.json");

    let err = load_catalog(&missing).await.unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"));
}

#[tokio::test]
async fn test_malformed_catalog_is_rejected() {
    let dir = temp_dir();
    let path = dir.path().join("extensions.json");
    std::fs::write(&path, r#"[{"extensionTitle": "NoDescription"}]"#).unwrap();

    let err = load_catalog(&path).await.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse catalog file"));
}
