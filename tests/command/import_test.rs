//! Tests import command behavior for single files and repositories.

use std::process::Command;

use super::*;

#[tokio::test]
#[serial]
/// A local session file imports under its stem name
async fn import_local_file() {
    let store_dir = tempdir().unwrap();
    let source_dir = tempdir().unwrap();
    let _guard = StoreGuard::new(store_dir.path());
    let source = source_dir.path().join("external.cst");
    std::fs::write(&source, "# Imported.\nx = 1\n").unwrap();

    import::execute(ImportArgs {
        uris: vec![source.to_str().unwrap().to_owned()],
        force: false,
        repo: false,
    })
    .await
    .unwrap();

    assert_eq!(current_store().read("external").unwrap(), "# Imported.\nx = 1\n");
}

#[tokio::test]
#[serial]
/// Anything without the session extension is rejected
async fn import_rejects_wrong_extension() {
    let store_dir = tempdir().unwrap();
    let _guard = StoreGuard::new(store_dir.path());

    let err = import::execute(ImportArgs {
        uris: vec!["session.txt".to_owned()],
        force: false,
        repo: false,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ConcertError::InvalidArgument(_)));
}

#[tokio::test]
#[serial]
/// Importing over an existing session requires --force
async fn import_refuses_collision_without_force() {
    let store_dir = tempdir().unwrap();
    let source_dir = tempdir().unwrap();
    let _guard = StoreGuard::new(store_dir.path());
    let store = current_store();
    store.create("external", &[], false).unwrap();
    let original = store.read("external").unwrap();
    let source = source_dir.path().join("external.cst");
    std::fs::write(&source, "replacement = 1\n").unwrap();

    let err = import::execute(ImportArgs {
        uris: vec![source.to_str().unwrap().to_owned()],
        force: false,
        repo: false,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ConcertError::SessionExists(_)));
    assert_eq!(store.read("external").unwrap(), original);

    import::execute(ImportArgs {
        uris: vec![source.to_str().unwrap().to_owned()],
        force: true,
        repo: false,
    })
    .await
    .unwrap();
    assert_eq!(store.read("external").unwrap(), "replacement = 1\n");
}

#[tokio::test]
#[serial]
/// --repo imports every top-level session file from a cloned repository,
/// overwriting with --force and skipping without it
async fn import_repo_copies_top_level_session_files() {
    if Command::new("git").arg("--version").output().is_err() {
        eprintln!("git not available, skipping");
        return;
    }

    let store_dir = tempdir().unwrap();
    let repo_dir = tempdir().unwrap();
    let _guard = StoreGuard::new(store_dir.path());
    let store = current_store();

    std::fs::write(repo_dir.path().join("one.cst"), "x = 1\n").unwrap();
    std::fs::write(repo_dir.path().join("two.cst"), "y = 2\n").unwrap();
    std::fs::write(repo_dir.path().join("notes.txt"), "not a session\n").unwrap();
    for args in [
        vec!["init"],
        vec!["add", "."],
        vec![
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "-m",
            "sessions",
        ],
    ] {
        let status = Command::new("git")
            .args(&args)
            .current_dir(repo_dir.path())
            .output()
            .unwrap();
        assert!(status.status.success(), "git {args:?} failed");
    }

    store.create("one", &[], false).unwrap();
    let untouched = store.read("one").unwrap();

    import::execute(ImportArgs {
        uris: vec![repo_dir.path().to_str().unwrap().to_owned()],
        force: false,
        repo: true,
    })
    .await
    .unwrap();
    // existing session skipped, new one imported
    assert_eq!(store.read("one").unwrap(), untouched);
    assert_eq!(store.read("two").unwrap(), "y = 2\n");
    assert!(!store.exists("notes"));

    import::execute(ImportArgs {
        uris: vec![repo_dir.path().to_str().unwrap().to_owned()],
        force: true,
        repo: true,
    })
    .await
    .unwrap();
    assert_eq!(store.read("one").unwrap(), "x = 1\n");
}
