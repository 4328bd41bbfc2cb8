use crate::cli::ArchiveArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

use super::open_archive;

pub fn run(args: ArchiveArgs) -> Result<()> {
    let reader = open_archive(&args.archive)?;
    let header = reader.header();

    let size = std::fs::metadata(&args.archive)
        .map_err(|source| Error::ProcessFile {
            path: args.archive.clone(),
            source,
        })?
        .len();

    let files = reader.entries().iter().filter(|e| e.is_file()).count();
    let dirs = reader.entries().len() - files;

    println!("Archive:     {}", args.archive.display());
    println!("Size:        {}", format_size(size));
    println!("Version:     {}", header.version());
    println!(
        "Compression: {} (id {})",
        header.compression(),
        header.compression().id()
    );
    println!(
        "Protection:  {} (id {})",
        header.protection(),
        header.protection().id()
    );
    println!(
        "Entries:     {} ({} files, {} directories)",
        header.entry_count(),
        files,
        dirs
    );

    Ok(())
}
