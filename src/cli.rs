//! CLI entry for concert, defining clap subcommands and dispatching each
//! command handler.

use clap::{CommandFactory, Parser, Subcommand};

use crate::command;
use crate::internal::error::ConcertError;
use crate::plugin::PluginRegistry;

/// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(
    name = "concert",
    about = "concert: manage and run beamline control sessions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// The subcommands of the CLI. Each variant's arguments and execute live in
/// the `command` module; anything unmatched falls through to the plugin
/// registry.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Create a new session")]
    Init(command::init::InitArgs),
    #[command(about = "Edit a session script in $EDITOR")]
    Edit(command::edit::EditArgs),
    #[command(about = "Show the session log")]
    Log(command::log::LogArgs),
    #[command(about = "List sessions or show a session's docstring")]
    Show(command::show::ShowArgs),
    #[command(about = "Rename a session")]
    Mv(command::mv::MvArgs),
    #[command(about = "Copy a session")]
    Cp(command::cp::CpArgs),
    #[command(about = "Remove sessions")]
    Rm(command::rm::RmArgs),
    #[command(about = "Import sessions from files or repositories")]
    Import(command::import::ImportArgs),
    #[command(about = "Export all sessions as a zip archive")]
    Export(command::export::ExportArgs),
    #[command(about = "Load a session and start the interactive shell")]
    Start(command::start::StartArgs),
    #[command(about = "Render a session's docstring to PDF")]
    Docs(command::docs::DocsArgs),

    /// Plugin commands registered at startup
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// The main function is the entry point of the concert application.
/// It parses the command-line arguments and executes the corresponding
/// function.
/// - Caution: This is a `synchronous` function, it's declared as `async` to
///   be able to use `[tokio::main]`
/// - `args`: parse from command line if it's `None`, otherwise parse from
///   the given args
#[tokio::main]
pub async fn parse(args: Option<&[&str]>) -> Result<(), ConcertError> {
    parse_async(args).await
}

/// `async` version of the [parse] function
pub async fn parse_async(args: Option<&[&str]>) -> Result<(), ConcertError> {
    let cli = match args {
        Some(args) => {
            Cli::try_parse_from(args).map_err(|e| ConcertError::InvalidArgument(e.to_string()))?
        }
        None => Cli::parse(),
    };

    // no subcommand: top-level help, successful exit
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return Ok(());
    };

    match command {
        Commands::Init(args) => command::init::execute(args).await,
        Commands::Edit(args) => command::edit::execute(args).await,
        Commands::Log(args) => command::log::execute(args).await,
        Commands::Show(args) => command::show::execute(args).await,
        Commands::Mv(args) => command::mv::execute(args).await,
        Commands::Cp(args) => command::cp::execute(args).await,
        Commands::Rm(args) => command::rm::execute(args).await,
        Commands::Import(args) => command::import::execute(args).await,
        Commands::Export(args) => command::export::execute(args).await,
        Commands::Start(args) => command::start::execute(args).await,
        Commands::Docs(args) => command::docs::execute(args).await,
        Commands::External(argv) => PluginRegistry::with_builtins().dispatch(&argv),
    }
}

/// this test is to verify that the CLI can be built without panicking
/// according [clap dock](https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_4/index.html)
#[test]
fn verify_cli() {
    use clap::CommandFactory;

    Cli::command().debug_assert()
}
