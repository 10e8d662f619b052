//! Implements `rm`: remove one or more sessions.

use clap::Parser;

use crate::internal::error::ConcertError;

#[derive(Parser, Debug, Clone)]
pub struct RmArgs {
    /// Sessions to remove
    #[clap(required = true)]
    pub sessions: Vec<String>,
}

/// Removes every named session that exists; a missing name fails the
/// command without affecting the others.
pub async fn execute(args: RmArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    let mut missing = Vec::new();
    for session in &args.sessions {
        match store.remove(session) {
            Ok(()) => println!("Removed session '{session}'"),
            Err(ConcertError::SessionNotFound(name)) => missing.push(name),
            Err(other) => return Err(other),
        }
    }
    if let Some(first) = missing.into_iter().next() {
        return Err(ConcertError::SessionNotFound(first));
    }
    Ok(())
}
