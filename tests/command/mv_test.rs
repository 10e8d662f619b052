//! Tests mv command validation and rename behavior.

use super::*;

#[tokio::test]
#[serial]
/// After a successful mv the target exists and the source is gone
async fn mv_renames_session() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    store.create("a", &[], false).unwrap();

    mv::execute(MvArgs {
        source: "a".to_owned(),
        target: "b".to_owned(),
    })
    .await
    .unwrap();

    assert!(store.exists("b"));
    assert!(!store.exists("a"));
}

#[tokio::test]
#[serial]
/// mv fails when the source is missing or the target already exists
async fn mv_validates_source_and_target() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    store.create("a", &[], false).unwrap();
    store.create("b", &[], false).unwrap();

    let err = mv::execute(MvArgs {
        source: "missing".to_owned(),
        target: "c".to_owned(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ConcertError::SessionNotFound(_)));

    let err = mv::execute(MvArgs {
        source: "a".to_owned(),
        target: "b".to_owned(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ConcertError::SessionExists(_)));
    assert!(store.exists("a"));
}
