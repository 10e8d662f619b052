//! Implements `log`: print the store logfile, optionally filtered to one
//! session, optionally streaming appended records.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use clap::Parser;

use crate::internal::error::ConcertError;

#[derive(Parser, Debug, Clone)]
pub struct LogArgs {
    /// Only show records of this session
    pub session: Option<String>,

    /// Keep the log open and stream appended records
    #[clap(long, short)]
    pub follow: bool,
}

pub async fn execute(args: LogArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    let path = store.logfile_path();
    if !path.exists() {
        println!("No log records yet.");
        return Ok(());
    }
    if args.follow {
        follow(&path, args.session.as_deref()).await
    } else {
        print_all(&path, args.session.as_deref())
    }
}

/// The start span tags every record with `name=<session>`.
fn matches_session(line: &str, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(name) => line.contains(&format!("name={name}")),
    }
}

fn print_all(path: &Path, filter: Option<&str>) -> Result<(), ConcertError> {
    let contents = fs::read_to_string(path)?;
    let selected: String = contents
        .lines()
        .filter(|line| matches_session(line, filter))
        .map(|line| format!("{line}\n"))
        .collect();

    #[cfg(unix)]
    {
        use std::io::IsTerminal;
        if std::io::stdout().is_terminal() {
            return page(&selected);
        }
    }
    print!("{selected}");
    Ok(())
}

/// Pipe long output through `less`, as interactive terminals expect.
#[cfg(unix)]
fn page(contents: &str) -> Result<(), ConcertError> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut pager = Command::new("less")
        .arg("-R")
        .arg("-F")
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .spawn()?;
    if let Some(mut stdin) = pager.stdin.take() {
        // the pager may quit early; a broken pipe is not an error
        let _ = stdin.write_all(contents.as_bytes());
    }
    pager.wait()?;
    Ok(())
}

/// Poll the logfile for appended records until Ctrl-C, which exits cleanly.
async fn follow(path: &Path, filter: Option<&str>) -> Result<(), ConcertError> {
    use tokio::time::{Duration, sleep};

    let mut offset = 0u64;
    loop {
        offset = drain(path, offset, filter)?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
            _ = sleep(Duration::from_millis(500)) => {}
        }
    }
}

fn drain(path: &Path, mut offset: u64, filter: Option<&str>) -> Result<u64, ConcertError> {
    let mut file = fs::File::open(path)?;
    let len = file.metadata()?.len();
    if len < offset {
        // the file was truncated underneath us; start over
        offset = 0;
    }
    file.seek(SeekFrom::Start(offset))?;
    let mut appended = String::new();
    file.read_to_string(&mut appended)?;
    for line in appended.lines().filter(|line| matches_session(line, filter)) {
        println!("{line}");
    }
    Ok(len)
}
