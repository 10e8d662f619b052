//! Implements `show`: list sessions, or print one session's docstring.

use clap::Parser;
use colored::Colorize;

use crate::internal::error::ConcertError;
use crate::internal::session::Session;

#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Session whose docstring to print; all sessions are listed if omitted
    pub session: Option<String>,
}

pub async fn execute(args: ShowArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    match args.session {
        Some(name) => {
            let source = store.read(&name)?;
            match crate::internal::script::docstring(&source) {
                Some(doc) => println!("{doc}"),
                None => println!("Session '{name}' has no docstring."),
            }
        }
        None => {
            for name in store.get_existing()? {
                match store.read(&name).ok().and_then(|s| Session::summary_of(&s)) {
                    Some(summary) => println!("{}  {}", name.bold(), summary),
                    None => println!("{}", name.bold()),
                }
            }
        }
    }
    Ok(())
}
