//! Implements `export`: bundle every session file into a zip archive.

use std::fs;
use std::io::Write;

use clap::Parser;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::internal::error::ConcertError;
use crate::internal::store::SESSION_EXT;

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Archive name; a `.zip` suffix is appended if missing
    pub name: String,
}

pub async fn execute(args: ExportArgs) -> Result<(), ConcertError> {
    let store = super::store()?;
    let archive_name = if args.name.ends_with(".zip") {
        args.name.clone()
    } else {
        format!("{}.zip", args.name)
    };

    let file = fs::File::create(&archive_name)?;
    let mut archive = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let sessions = store.get_existing()?;
    for session in &sessions {
        archive.start_file(format!("{session}.{SESSION_EXT}"), options)?;
        archive.write_all(&fs::read(store.path(session))?)?;
    }
    archive.finish()?;

    println!("Exported {} session(s) to {archive_name}", sessions.len());
    Ok(())
}
