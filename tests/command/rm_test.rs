//! Tests rm command batch removal behavior.

use super::*;

#[tokio::test]
#[serial]
/// rm removes every named session
async fn rm_removes_all_named_sessions() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    store.create("a", &[], false).unwrap();
    store.create("b", &[], false).unwrap();

    rm::execute(RmArgs {
        sessions: vec!["a".to_owned(), "b".to_owned()],
    })
    .await
    .unwrap();

    assert!(!store.exists("a"));
    assert!(!store.exists("b"));
}

#[tokio::test]
#[serial]
/// A missing session fails the command but the others are still removed
async fn rm_missing_session_fails_without_affecting_others() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    store.create("a", &[], false).unwrap();
    store.create("b", &[], false).unwrap();

    let err = rm::execute(RmArgs {
        sessions: vec!["a".to_owned(), "ghost".to_owned(), "b".to_owned()],
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ConcertError::SessionNotFound(_)));
    assert!(!store.exists("a"));
    assert!(!store.exists("b"));
}
