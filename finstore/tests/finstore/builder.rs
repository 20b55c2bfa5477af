use std::sync::Arc;
use std::time::Duration;

use finstore::{CacheConfig, FinStore, FinStoreConfig, FinStoreError};
use finstore_mock::{MemoryStore, MockExporter};

use crate::helpers::*;

#[test]
fn build_requires_a_store() {
    let err = FinStore::builder()
        .with_factory(Arc::new(MockExporter::new()))
        .build()
        .err()
        .expect("missing store must fail");
    assert!(matches!(err, FinStoreError::InvalidArg(_)));
}

#[test]
fn build_rejects_zero_timeout_and_bootstrap() {
    let store = Arc::new(MemoryStore::new());
    let err = builder(&store)
        .download_timeout(Duration::ZERO)
        .build()
        .err()
        .expect("zero timeout");
    assert!(matches!(err, FinStoreError::InvalidArg(_)));

    let err = builder(&store)
        .bootstrap_days(0)
        .build()
        .err()
        .expect("zero bootstrap");
    assert!(matches!(err, FinStoreError::InvalidArg(_)));
}

#[test]
fn build_rejects_duplicate_exporter_type() {
    let store = Arc::new(MemoryStore::new());
    let err = builder(&store)
        .with_factory(Arc::new(MockExporter::new()))
        .build()
        .err()
        .expect("duplicate type");
    match err {
        FinStoreError::InvalidArg(msg) => assert!(msg.contains("finstore-mock")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn builder_applies_configuration() {
    let store = Arc::new(MemoryStore::new());
    let fs = builder(&store)
        .timezone(chrono_tz::Europe::Moscow)
        .download_timeout(Duration::from_secs(5))
        .bootstrap_days(7)
        .build()
        .expect("valid");
    assert_eq!(fs.config().timezone, chrono_tz::Europe::Moscow);
    assert_eq!(fs.config().download_timeout, Duration::from_secs(5));
    assert_eq!(fs.config().bootstrap_days, 7);
    assert!(fs.cache().is_some());
    assert_eq!(fs.registry().len(), 1);
    assert!(fs.registry().contains(&"finstore-mock".into()));
}

#[test]
fn cache_can_be_disabled_or_configured() {
    let store = Arc::new(MemoryStore::new());
    let fs = builder(&store).without_cache().build().expect("valid");
    assert!(fs.cache().is_none());

    let cfg = FinStoreConfig {
        cache: CacheConfig {
            instruments_ttl_ms: 0,
            history_ttl_ms: 1_000,
            max_entries: 8,
        },
        ..FinStoreConfig::default()
    };
    let fs = builder(&store).config(cfg).build().expect("valid");
    let cache = fs.cache().expect("cache enabled");
    assert!(!cache.caches_instruments());
    assert!(cache.caches_history());
}
