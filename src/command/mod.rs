//! Subcommand modules: one per CLI command, each an Args struct plus an
//! `execute` entry point.

pub mod cp;
pub mod docs;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod mv;
pub mod rm;
pub mod show;
pub mod start;

use crate::internal::error::ConcertError;
use crate::internal::store::SessionStore;

/// Open the session store every command operates on.
pub(crate) fn store() -> Result<SessionStore, ConcertError> {
    SessionStore::discover()
}
