//! Tests cp command copy semantics.

use super::*;

#[tokio::test]
#[serial]
/// cp preserves the source and produces a byte-identical target
async fn cp_preserves_source_and_content() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    std::fs::write(store.path("a"), "# Source session.\nx = 1 mm\n").unwrap();

    cp::execute(CpArgs {
        source: "a".to_owned(),
        target: "b".to_owned(),
    })
    .await
    .unwrap();

    assert!(store.exists("a"));
    assert_eq!(store.read("a").unwrap(), store.read("b").unwrap());
}

#[tokio::test]
#[serial]
/// cp refuses an existing target
async fn cp_refuses_existing_target() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    store.create("a", &[], false).unwrap();
    store.create("b", &[], false).unwrap();

    let err = cp::execute(CpArgs {
        source: "a".to_owned(),
        target: "b".to_owned(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ConcertError::SessionExists(_)));
}
