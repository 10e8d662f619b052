//! Tests init command behavior for session creation and collision handling.

use super::*;

#[tokio::test]
#[serial]
/// A created session exists in the store afterward
async fn init_creates_session() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());

    init::execute(InitArgs {
        session: "alpha".to_owned(),
        force: false,
        imports: vec![],
    })
    .await
    .unwrap();

    assert!(current_store().exists("alpha"));
}

#[tokio::test]
#[serial]
/// Repeating init without --force reports the collision and leaves the
/// existing file untouched
async fn init_refuses_collision_without_force() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();

    init::execute(InitArgs {
        session: "alpha".to_owned(),
        force: false,
        imports: vec![],
    })
    .await
    .unwrap();
    std::fs::write(store.path("alpha"), "x = 1\n").unwrap();

    let err = init::execute(InitArgs {
        session: "alpha".to_owned(),
        force: false,
        imports: vec![],
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ConcertError::SessionExists(_)));
    assert_eq!(store.read("alpha").unwrap(), "x = 1\n");

    init::execute(InitArgs {
        session: "alpha".to_owned(),
        force: true,
        imports: vec![],
    })
    .await
    .unwrap();
    assert_ne!(store.read("alpha").unwrap(), "x = 1\n");
}

#[tokio::test]
#[serial]
/// --imports pre-populates use statements that resolve on start
async fn init_with_imports_produces_loadable_session() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();

    init::execute(InitArgs {
        session: "common".to_owned(),
        force: false,
        imports: vec![],
    })
    .await
    .unwrap();
    std::fs::write(store.path("common"), "beam_current = 100 mA\n").unwrap();

    init::execute(InitArgs {
        session: "scan".to_owned(),
        force: false,
        imports: vec!["common".to_owned()],
    })
    .await
    .unwrap();

    let session = concert::internal::session::Session::load(&store, "scan").unwrap();
    assert!(session.namespace.contains("beam_current"));
}
