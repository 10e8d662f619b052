//! Interactive read-eval-print loop over a loaded session.
//!
//! Domain conditions (unit, limit, parameter, read-access, write-access,
//! lock) are summarized as a one-line `Sorry, ...`; other errors are printed
//! in full. Neither ends the loop.

use std::borrow::Cow::{self, Borrowed};
use std::collections::HashSet;
use std::io;

use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::internal::error::ConcertError;
use crate::internal::script::{self, Namespace, Statement, Value};
use crate::internal::session::{self, Session};
use crate::internal::store::SessionStore;

const KEYWORDS: [&str; 9] = [
    "param",
    "use",
    "lock",
    "unlock",
    "limits",
    "readonly",
    "writeonly",
    "exit",
    "quit",
];

/// Rustyline helper providing completion and hints over the session
/// namespace and the language keywords.
struct ShellHelper {
    names: Vec<String>,
}

impl ShellHelper {
    fn new(namespace: &Namespace) -> Self {
        let mut names = namespace.public_names();
        names.extend(KEYWORDS.iter().map(|k| (*k).to_owned()));
        names.sort();
        ShellHelper { names }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &head[start..];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }
        let candidates = self
            .names
            .iter()
            .filter(|name| name.starts_with(word))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let head = &line[..pos];
        let start = head
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &head[start..];
        if word.is_empty() {
            return None;
        }
        self.names
            .iter()
            .find(|name| name.starts_with(word) && name.len() > word.len())
            .map(|name| name[word.len()..].to_owned())
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Borrowed(line)
    }
}

impl Validator for ShellHelper {}

/// Run the interactive shell until `exit`/`quit` or end of input.
pub fn run(mut session: Session, store: &SessionStore) -> Result<(), ConcertError> {
    if let Some(doc) = &session.docstring {
        println!("{doc}");
        println!();
    }
    let prompt = format!("{} > ", session.name);
    let mut rl: Editor<ShellHelper, DefaultHistory> =
        Editor::new().map_err(|e| ConcertError::Io(io::Error::other(e)))?;
    rl.set_helper(Some(ShellHelper::new(&session.namespace)));
    tracing::info!("session started");

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "exit" || trimmed == "quit" {
                    break;
                }
                let _ = rl.add_history_entry(&line);
                report(evaluate_line(trimmed, &mut session, store));
                rl.set_helper(Some(ShellHelper::new(&session.namespace)));
            }
            // Ctrl-C clears the current line and keeps the session alive
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("fatal: {err}").red());
                break;
            }
        }
    }
    tracing::info!("session ended");
    Ok(())
}

fn report(outcome: Result<Option<Value>, ConcertError>) {
    match outcome {
        Ok(Some(value)) => println!("{value}"),
        Ok(None) => {}
        Err(ConcertError::Script(err)) if err.is_domain() => {
            tracing::warn!("{err}");
            println!("{}", format!("Sorry, {err}").yellow());
        }
        Err(err) => eprintln!("{}", err.to_string().red()),
    }
}

/// Evaluate one shell input line against the session namespace.
pub fn evaluate_line(
    line: &str,
    session: &mut Session,
    store: &SessionStore,
) -> Result<Option<Value>, ConcertError> {
    let Some(statement) = script::parse_line(line)? else {
        return Ok(None);
    };
    match statement {
        Statement::Use(name) => {
            let mut visited = HashSet::from([session.name.clone()]);
            session::resolve_use(store, &mut session.namespace, &name, &mut visited)?;
            tracing::info!("imported session {name}");
            Ok(None)
        }
        other => {
            let value = session.namespace.execute(&other)?;
            if let Statement::Assign { name, .. } = &other
                && let Ok(current) = session.namespace.get(name)
            {
                tracing::info!("set {name}='{current}'");
            }
            Ok(value)
        }
    }
}
