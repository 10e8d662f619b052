//! Implements `init`: create a fresh session script in the store.

use clap::Parser;

use crate::internal::error::ConcertError;

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Name of the new session
    pub session: String,

    /// Overwrite an existing session of the same name
    #[clap(long)]
    pub force: bool,

    /// Comma-separated sessions to pre-import in the new script
    #[clap(long, value_delimiter = ',', value_name = "SESSIONS")]
    pub imports: Vec<String>,
}

pub async fn execute(args: InitArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    store.create(&args.session, &args.imports, args.force)?;
    println!("Created session '{}'", args.session);
    Ok(())
}
