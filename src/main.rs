//! This is the main entry point for concert.

use colored::Colorize;

fn main() {
    if let Err(e) = concert::cli::parse(None) {
        eprintln!("{}", format!("fatal: {e}").red());
        std::process::exit(1);
    }
}
