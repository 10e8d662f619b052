//! Shared test utilities and re-exports for the command integration test suite.

use concert::command::{
    cp::{self, CpArgs},
    export::{self, ExportArgs},
    import::{self, ImportArgs},
    init::{self, InitArgs},
    mv::{self, MvArgs},
    rm::{self, RmArgs},
    start::{self, LogLevel, LogTo, StartArgs},
};
use concert::internal::error::ConcertError;
use concert::internal::store::SessionStore;
use concert::utils::test::{ChangeDirGuard, StoreGuard};
use serial_test::serial;
use tempfile::tempdir;

mod cp_test;
mod export_test;
mod import_test;
mod init_test;
mod mv_test;
mod rm_test;
mod start_test;

/// Store opened at the location the guard points commands at.
fn current_store() -> SessionStore {
    SessionStore::discover().unwrap()
}
