use crate::cli::ArchiveArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

use super::open_archive;

pub fn run(args: ArchiveArgs) -> Result<()> {
    let reader = open_archive(&args.archive)?;
    let protection = reader.header().protection();

    tracing::debug!(
        archive = %args.archive.display(),
        compression = %reader.header().compression(),
        %protection,
        "validating archive"
    );

    let stats = reader.validate_all().map_err(|source| Error::Validate {
        path: args.archive.clone(),
        source,
    })?;

    println!(
        "{}: OK ({} files, {} decoded, checksums: {})",
        args.archive.display(),
        stats.files_checked,
        format_size(stats.bytes_checked),
        protection
    );

    Ok(())
}
