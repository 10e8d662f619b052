//! Implements `mv`: rename a session.

use clap::Parser;

use crate::internal::error::ConcertError;

#[derive(Parser, Debug, Clone)]
pub struct MvArgs {
    /// Session to rename
    pub source: String,

    /// New session name; must not exist yet
    pub target: String,
}

pub async fn execute(args: MvArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    store.rename(&args.source, &args.target)?;
    println!("Moved '{}' to '{}'", args.source, args.target);
    Ok(())
}
