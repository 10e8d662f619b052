//! Session model: a named script file evaluated into a namespace.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::internal::error::{ConcertError, ScriptError};
use crate::internal::script::{self, Namespace, Statement};
use crate::internal::store::SessionStore;

/// A loaded session: name, backing file, docstring, and the namespace its
/// script evaluated to.
#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub path: PathBuf,
    pub docstring: Option<String>,
    pub namespace: Namespace,
}

impl Session {
    /// Load a session from the store by name.
    pub fn load(store: &SessionStore, name: &str) -> Result<Session, ConcertError> {
        let source = store.read(name)?;
        let mut visited = HashSet::from([name.to_owned()]);
        let (docstring, namespace) = evaluate(store, &source, &mut visited)?;
        Ok(Session {
            name: name.to_owned(),
            path: store.path(name),
            docstring,
            namespace,
        })
    }

    /// Load a session from an explicit file path. `use` statements still
    /// resolve against the store.
    pub fn load_file(store: &SessionStore, path: &Path) -> Result<Session, ConcertError> {
        let source = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("session")
            .to_owned();
        let mut visited = HashSet::from([name.clone()]);
        let (docstring, namespace) = evaluate(store, &source, &mut visited)?;
        Ok(Session {
            name,
            path: path.to_path_buf(),
            docstring,
            namespace,
        })
    }

    /// First line of the docstring, for listings.
    pub fn summary_of(source: &str) -> Option<String> {
        script::docstring(source).map(|doc| doc.lines().next().unwrap_or_default().to_owned())
    }
}

/// Evaluate a script top to bottom, resolving `use` against the store.
fn evaluate(
    store: &SessionStore,
    source: &str,
    visited: &mut HashSet<String>,
) -> Result<(Option<String>, Namespace), ConcertError> {
    let parsed = script::parse_script(source)?;
    let mut namespace = Namespace::new();
    for (_, statement) in &parsed.statements {
        match statement {
            Statement::Use(name) => resolve_use(store, &mut namespace, name, visited)?,
            other => {
                namespace.execute(other)?;
            }
        }
    }
    Ok((parsed.docstring, namespace))
}

/// Merge the named session's public entries into `namespace`. `visited`
/// tracks the active import chain: revisiting a session on the same chain
/// fails, while diamond-shaped imports are fine.
pub fn resolve_use(
    store: &SessionStore,
    namespace: &mut Namespace,
    name: &str,
    visited: &mut HashSet<String>,
) -> Result<(), ConcertError> {
    if !visited.insert(name.to_owned()) {
        return Err(ScriptError::ImportCycle(name.to_owned()).into());
    }
    let source = store.read(name)?;
    let result = evaluate(store, &source, visited);
    visited.remove(name);
    let (_, imported) = result?;
    namespace.merge_public(&imported);
    Ok(())
}
