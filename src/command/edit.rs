//! Implements `edit`: open a session script in the user's editor.

use clap::Parser;
use tokio::process::Command;

use crate::internal::error::ConcertError;
use crate::utils::util;

#[derive(Parser, Debug, Clone)]
pub struct EditArgs {
    /// Session to edit
    pub session: String,
}

pub async fn execute(args: EditArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    if !store.exists(&args.session) {
        return Err(ConcertError::SessionNotFound(args.session));
    }

    // $EDITOR may carry arguments, e.g. "code -w"
    let editor = util::editor();
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or("vi");
    let status = Command::new(program)
        .args(words)
        .arg(store.path(&args.session))
        .status()
        .await
        .map_err(|e| ConcertError::ExternalTool(format!("could not launch `{program}': {e}")))?;
    if !status.success() {
        return Err(ConcertError::ExternalTool(format!(
            "editor `{program}' exited with {status}"
        )));
    }
    Ok(())
}
