//! Implements `cp`: copy a session under a new name.

use clap::Parser;

use crate::internal::error::ConcertError;

#[derive(Parser, Debug, Clone)]
pub struct CpArgs {
    /// Session to copy
    pub source: String,

    /// Name of the copy; must not exist yet
    pub target: String,
}

pub async fn execute(args: CpArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    store.copy(&args.source, &args.target)?;
    println!("Copied '{}' to '{}'", args.source, args.target);
    Ok(())
}
