//! Implements `docs`: render a session's docstring to PDF with pandoc.

use std::process::Stdio;

use clap::Parser;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::internal::error::ConcertError;
use crate::internal::script;

#[derive(Parser, Debug, Clone)]
pub struct DocsArgs {
    /// Session whose documentation to build
    pub session: String,
}

pub async fn execute(args: DocsArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    let source = store.read(&args.session)?;
    let Some(doc) = script::docstring(&source) else {
        return Err(ConcertError::InvalidArgument(format!(
            "session '{}' has no docstring to document",
            args.session
        )));
    };

    // checked by invoking it: a missing converter must fail before any output
    let probe = Command::new("pandoc")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    if !matches!(probe, Ok(status) if status.success()) {
        return Err(ConcertError::ExternalTool(
            "pandoc is required to build session docs but was not found".to_owned(),
        ));
    }

    let output = format!("{}.pdf", args.session);
    let mut child = Command::new("pandoc")
        .args(["-f", "markdown", "-o"])
        .arg(&output)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| ConcertError::ExternalTool(format!("could not run pandoc: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| ConcertError::ExternalTool("could not open pandoc stdin".to_owned()))?;
    stdin.write_all(doc.as_bytes()).await?;
    stdin.shutdown().await?;
    drop(stdin);

    let status = child
        .wait()
        .await
        .map_err(|e| ConcertError::ExternalTool(format!("pandoc did not finish: {e}")))?;
    if !status.success() {
        return Err(ConcertError::ExternalTool(format!(
            "pandoc exited with {status}"
        )));
    }
    println!("Wrote {output}");
    Ok(())
}
