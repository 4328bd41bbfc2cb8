use std::path::Path;

use myarch_format::compression::deflate::MAX_LEVEL;
use myarch_format::fs::create_archive;
use myarch_format::EncodeOptions;

use crate::cli::CreateArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

fn is_inside(archive: &Path, root: &Path) -> bool {
    match (archive.canonicalize(), root.canonicalize()) {
        (Ok(archive), Ok(root)) => archive.starts_with(root),
        _ => false,
    }
}

pub fn run(args: CreateArgs) -> Result<()> {
    if args.level > MAX_LEVEL {
        return Err(Error::InvalidLevel(args.level));
    }

    if args.archive.exists() {
        if !args.force {
            return Err(Error::ArchiveExists { path: args.archive });
        }

        // The old archive would be enumerated as part of the new one
        if is_inside(&args.archive, &args.path) {
            return Err(Error::ArchiveInsideSource { path: args.archive });
        }
    }

    let options = EncodeOptions {
        compression: args.compression,
        protection: args.protection,
        level: args.level,
    };

    tracing::debug!(
        source = %args.path.display(),
        archive = %args.archive.display(),
        compression = %options.compression,
        protection = %options.protection,
        level = options.level,
        "creating archive"
    );

    let stats = create_archive(&args.path, &args.archive, options).map_err(|source| {
        Error::Create {
            path: args.archive.clone(),
            source,
        }
    })?;

    println!(
        "Created {} with {} entries ({} files, {} -> {}, {} / {})",
        args.archive.display(),
        stats.entries,
        stats.files,
        format_size(stats.bytes_read),
        format_size(stats.bytes_written),
        args.compression,
        args.protection,
    );

    Ok(())
}
