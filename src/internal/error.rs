//! Error taxonomy for the session manager: store conditions, script failures, and external tool errors.

use thiserror::Error;

/// Failures raised while parsing or evaluating a session script.
///
/// The unit, limit, parameter, read-access, write-access, and lock variants
/// are the domain conditions the interactive shell summarizes as a one-line
/// `Sorry, ...` message; everything else is reported in full.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScriptError {
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{0}")]
    Unit(String),

    #[error("{0}")]
    Limit(String),

    #[error("`{0}' is not a parameter")]
    Parameter(String),

    #[error("parameter `{0}' cannot be read")]
    ReadAccess(String),

    #[error("parameter `{0}' cannot be written")]
    WriteAccess(String),

    #[error("parameter `{0}' is locked")]
    Lock(String),

    #[error("circular session import involving `{0}'")]
    ImportCycle(String),

    #[error("{0}")]
    Eval(String),
}

impl ScriptError {
    /// Whether this is one of the fixed domain conditions the shell renders
    /// as a short summary instead of a full report.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ScriptError::Unit(_)
                | ScriptError::Limit(_)
                | ScriptError::Parameter(_)
                | ScriptError::ReadAccess(_)
                | ScriptError::WriteAccess(_)
                | ScriptError::Lock(_)
        )
    }
}

/// Top-level error type surfaced by every command.
#[derive(Debug, Error)]
pub enum ConcertError {
    #[error("session `{0}' does not exist")]
    SessionNotFound(String),

    #[error("session `{0}' already exists")]
    SessionExists(String),

    #[error("`{0}' is not a valid session name")]
    InvalidName(String),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("{0}")]
    ExternalTool(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("no data directory available on this platform")]
    NoDataDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
