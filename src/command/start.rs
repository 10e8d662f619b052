//! Implements `start`: configure logging, load a session, and either run it
//! to completion or hand it to the interactive shell.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::internal::error::ConcertError;
use crate::internal::logging::{self, LogTarget};
use crate::internal::script::Namespace;
use crate::internal::session::Session;
use crate::internal::shell;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTo {
    Stderr,
    File,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    /// Kept for CLI compatibility; records at the error severity
    Critical,
}

impl LogLevel {
    fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct StartArgs {
    /// Session to load
    pub session: Option<String>,

    /// Load the session from an explicit file instead of the store
    #[clap(long, value_name = "PATH")]
    pub filename: Option<PathBuf>,

    /// Where log records go
    #[clap(long, value_enum, default_value_t = LogTo::File)]
    pub logto: LogTo,

    /// Logfile path; defaults to the store logfile
    #[clap(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Minimum severity to record
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Execute the session script and exit instead of entering the shell
    #[clap(long)]
    pub non_interactive: bool,
}

pub async fn execute(args: StartArgs) -> Result<(), ConcertError> {
    let store = super::store()?;

    if let Some(name) = &args.session
        && args.filename.is_none()
        && !store.exists(name)
    {
        return Err(ConcertError::SessionNotFound(name.clone()));
    }
    if args.non_interactive && args.session.is_none() && args.filename.is_none() {
        return Err(ConcertError::InvalidArgument(
            "--non-interactive requires a session or --filename".to_owned(),
        ));
    }

    let target = match args.logto {
        LogTo::Stderr => LogTarget::Stderr,
        LogTo::File => LogTarget::File(
            args.logfile
                .clone()
                .unwrap_or_else(|| store.logfile_path()),
        ),
    };
    logging::init(&target, args.loglevel.as_tracing())?;

    let label = match (&args.filename, &args.session) {
        (Some(path), _) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("session")
            .to_owned(),
        (None, Some(name)) => name.clone(),
        (None, None) => "concert".to_owned(),
    };
    // every record below carries the session name
    let span = tracing::info_span!("session", name = %label);
    let _enter = span.enter();

    // A session that fails to load must not enter the shell: the error
    // propagates with full detail and a non-zero exit.
    let session = match (&args.filename, &args.session) {
        (Some(path), _) => Session::load_file(&store, path)?,
        (None, Some(name)) => Session::load(&store, name)?,
        (None, None) => Session {
            name: label.clone(),
            path: store.dir().to_path_buf(),
            docstring: None,
            namespace: Namespace::new(),
        },
    };

    if args.non_interactive {
        tracing::info!("executed session script");
        return Ok(());
    }
    shell::run(session, &store)
}
