//! Internal layer: error taxonomy, session store, script engine, session
//! model, logging setup, and the interactive shell.

pub mod error;
pub mod logging;
pub mod script;
pub mod session;
pub mod shell;
pub mod store;
