//! Tests start command loading and non-interactive execution.

use super::*;

fn start_args(session: Option<&str>) -> StartArgs {
    StartArgs {
        session: session.map(str::to_owned),
        filename: None,
        logto: LogTo::Stderr,
        logfile: None,
        loglevel: LogLevel::Info,
        non_interactive: true,
    }
}

#[tokio::test]
#[serial]
/// A valid session executes to completion non-interactively
async fn start_non_interactive_runs_script() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    std::fs::write(
        store.path("scan"),
        "# Scan session.\nparam position: mm = 2.5 limits 0..10\nposition = 4 mm\n",
    )
    .unwrap();

    start::execute(start_args(Some("scan"))).await.unwrap();
}

#[tokio::test]
#[serial]
/// A missing session is reported before logging or loading
async fn start_missing_session_is_not_found() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());

    let err = start::execute(start_args(Some("ghost"))).await.unwrap_err();
    assert!(matches!(err, ConcertError::SessionNotFound(_)));
}

#[tokio::test]
#[serial]
/// A session whose script fails must not start: the error propagates
async fn start_broken_session_fails() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());
    let store = current_store();
    std::fs::write(store.path("broken"), "position = 1 mm + 2 s\n").unwrap();

    let err = start::execute(start_args(Some("broken"))).await.unwrap_err();
    assert!(matches!(err, ConcertError::Script(_)));
}

#[tokio::test]
#[serial]
/// --filename loads a script from outside the store
async fn start_filename_loads_external_script() {
    let store_dir = tempdir().unwrap();
    let script_dir = tempdir().unwrap();
    let _guard = StoreGuard::new(store_dir.path());
    let path = script_dir.path().join("adhoc.cst");
    std::fs::write(&path, "x = 1\n").unwrap();

    let mut args = start_args(None);
    args.filename = Some(path);
    start::execute(args).await.unwrap();
}

#[tokio::test]
#[serial]
/// Non-interactive mode needs something to execute
async fn start_non_interactive_requires_target() {
    let dir = tempdir().unwrap();
    let _guard = StoreGuard::new(dir.path());

    let err = start::execute(start_args(None)).await.unwrap_err();
    assert!(matches!(err, ConcertError::InvalidArgument(_)));
}
