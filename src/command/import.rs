//! Implements `import`: bring external session files into the store, either
//! one file at a time (HTTP(S) or local path) or all top-level session files
//! of a Git repository.

use std::fs;
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use path_absolutize::Absolutize;
use tokio::process::Command;
use url::Url;

use crate::internal::error::ConcertError;
use crate::internal::store::{SESSION_EXT, SessionStore};

#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// URLs or paths to import
    #[clap(required = true)]
    pub uris: Vec<String>,

    /// Overwrite existing sessions of the same name
    #[clap(long)]
    pub force: bool,

    /// Treat each URL as a Git repository and import its top-level session
    /// files
    #[clap(long)]
    pub repo: bool,
}

pub async fn execute(args: ImportArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    for uri in &args.uris {
        if args.repo {
            import_repo(&store, uri, args.force).await?;
        } else {
            import_file(&store, uri, args.force).await?;
        }
    }
    Ok(())
}

/// Session name for a single-file import: the last path segment minus the
/// session extension.
fn target_name(uri: &str) -> Result<String, ConcertError> {
    let base = uri.rsplit('/').next().unwrap_or(uri);
    let suffix = format!(".{SESSION_EXT}");
    base.strip_suffix(suffix.as_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            ConcertError::InvalidArgument(format!(
                "`{uri}' is not a session file (expected a .{SESSION_EXT} suffix)"
            ))
        })
}

async fn import_file(store: &SessionStore, uri: &str, force: bool) -> Result<(), ConcertError> {
    let name = target_name(uri)?;
    let bytes = match Url::parse(uri) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            // Certificate verification is off on purpose: beamline-internal
            // hosts commonly serve self-signed certificates.
            let client = reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .build()?;
            let response = client.get(url).send().await?.error_for_status()?;
            response.bytes().await?.to_vec()
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url.to_file_path().map_err(|_| {
                ConcertError::InvalidArgument(format!("`{uri}' is not a usable file URL"))
            })?;
            fs::read(path)?
        }
        // no scheme at all: a plain local path
        _ => {
            let path = Path::new(uri).absolutize()?;
            fs::read(path.as_ref())?
        }
    };
    store.write(&name, &bytes, force)?;
    println!("Imported session '{name}'");
    Ok(())
}

async fn import_repo(store: &SessionStore, url: &str, force: bool) -> Result<(), ConcertError> {
    // TempDir removes the clone on every exit path, including errors below.
    let clone_dir = tempfile::tempdir()?;
    let status = Command::new("git")
        .args(["clone", "--depth", "1", url])
        .arg(clone_dir.path())
        .status()
        .await
        .map_err(|e| ConcertError::ExternalTool(format!("could not run git: {e}")))?;
    if !status.success() {
        return Err(ConcertError::ExternalTool(format!(
            "git clone of `{url}' failed with {status}"
        )));
    }

    for entry in fs::read_dir(clone_dir.path())? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SESSION_EXT) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if store.exists(name) && !force {
            eprintln!(
                "{}",
                format!("session '{name}' already exists, skipping").yellow()
            );
            continue;
        }
        store.write(name, &fs::read(&path)?, true)?;
        println!("Imported session '{name}'");
    }
    Ok(())
}
