//! Tests export command archive production.

use std::io::Read;

use super::*;

#[tokio::test]
#[serial]
/// export bundles one entry per session with matching byte content and
/// forces a .zip suffix
async fn export_bundles_every_session() {
    let store_dir = tempdir().unwrap();
    let work_dir = tempdir().unwrap();
    let _store = StoreGuard::new(store_dir.path());
    let _cwd = ChangeDirGuard::new(work_dir.path());
    let store = current_store();
    std::fs::write(store.path("alpha"), "# Alpha.\nx = 1\n").unwrap();
    std::fs::write(store.path("beta"), "# Beta.\ny = 2\n").unwrap();

    export::execute(ExportArgs {
        name: "bundle".to_owned(),
    })
    .await
    .unwrap();

    let archive_path = work_dir.path().join("bundle.zip");
    assert!(archive_path.is_file());

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    for (name, expected) in [("alpha.cst", "# Alpha.\nx = 1\n"), ("beta.cst", "# Beta.\ny = 2\n")] {
        let mut entry = archive.by_name(name).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, expected);
    }
}

#[tokio::test]
#[serial]
/// An explicit .zip suffix is not doubled
async fn export_keeps_existing_suffix() {
    let store_dir = tempdir().unwrap();
    let work_dir = tempdir().unwrap();
    let _store = StoreGuard::new(store_dir.path());
    let _cwd = ChangeDirGuard::new(work_dir.path());
    current_store().create("only", &[], false).unwrap();

    export::execute(ExportArgs {
        name: "out.zip".to_owned(),
    })
    .await
    .unwrap();

    assert!(work_dir.path().join("out.zip").is_file());
    assert!(!work_dir.path().join("out.zip.zip").exists());
}
