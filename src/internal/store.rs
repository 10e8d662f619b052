//! Filesystem session store: one `.cst` script file per named session.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::internal::error::ConcertError;
use crate::utils::util;

/// File extension of session scripts.
pub const SESSION_EXT: &str = "cst";

/// Name of the shared logfile inside the store directory.
pub const LOGFILE_NAME: &str = "concert.log";

/// Environment variable overriding the store location.
pub const DATA_DIR_ENV: &str = "CONCERT_DATA_DIR";

/// The directory holding all session files. The filesystem is the single
/// source of truth: session names map 1:1 to `<name>.cst` files.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open the store at the platform data directory (or the
    /// `CONCERT_DATA_DIR` override), creating it on demand.
    pub fn discover() -> Result<SessionStore, ConcertError> {
        let dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .ok_or(ConcertError::NoDataDir)?
                .join("concert"),
        };
        SessionStore::at(dir)
    }

    /// Open the store at an explicit directory, creating it on demand.
    pub fn at(dir: impl Into<PathBuf>) -> Result<SessionStore, ConcertError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(SessionStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the session file for `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{SESSION_EXT}"))
    }

    pub fn logfile_path(&self) -> PathBuf {
        self.dir.join(LOGFILE_NAME)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Write a fresh session script with a docstring header and one `use`
    /// line per requested import. Refuses to overwrite unless forced.
    pub fn create(&self, name: &str, imports: &[String], force: bool) -> Result<(), ConcertError> {
        if !util::valid_session_name(name) {
            return Err(ConcertError::InvalidName(name.to_owned()));
        }
        if self.exists(name) && !force {
            return Err(ConcertError::SessionExists(name.to_owned()));
        }
        let mut contents = format!("# This is session {name}.\n");
        if !imports.is_empty() {
            contents.push('\n');
            for import in imports {
                contents.push_str(&format!("use {import}\n"));
            }
        }
        fs::write(self.path(name), contents)?;
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<String, ConcertError> {
        if !self.exists(name) {
            return Err(ConcertError::SessionNotFound(name.to_owned()));
        }
        Ok(fs::read_to_string(self.path(name))?)
    }

    /// Write raw session contents. Refuses to overwrite unless forced.
    pub fn write(&self, name: &str, contents: &[u8], force: bool) -> Result<(), ConcertError> {
        if !util::valid_session_name(name) {
            return Err(ConcertError::InvalidName(name.to_owned()));
        }
        if self.exists(name) && !force {
            return Err(ConcertError::SessionExists(name.to_owned()));
        }
        fs::write(self.path(name), contents)?;
        Ok(())
    }

    /// Rename a session. The source must exist, the target must not.
    pub fn rename(&self, source: &str, target: &str) -> Result<(), ConcertError> {
        self.check_move(source, target)?;
        fs::rename(self.path(source), self.path(target))?;
        Ok(())
    }

    /// Copy a session. The source must exist, the target must not.
    pub fn copy(&self, source: &str, target: &str) -> Result<(), ConcertError> {
        self.check_move(source, target)?;
        fs::copy(self.path(source), self.path(target))?;
        Ok(())
    }

    fn check_move(&self, source: &str, target: &str) -> Result<(), ConcertError> {
        if !self.exists(source) {
            return Err(ConcertError::SessionNotFound(source.to_owned()));
        }
        if !util::valid_session_name(target) {
            return Err(ConcertError::InvalidName(target.to_owned()));
        }
        if self.exists(target) {
            return Err(ConcertError::SessionExists(target.to_owned()));
        }
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<(), ConcertError> {
        if !self.exists(name) {
            return Err(ConcertError::SessionNotFound(name.to_owned()));
        }
        fs::remove_file(self.path(name))?;
        Ok(())
    }

    /// Sorted names of all existing sessions.
    pub fn get_existing(&self) -> Result<Vec<String>, ConcertError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(SESSION_EXT)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
