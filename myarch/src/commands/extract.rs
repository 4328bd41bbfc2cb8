use std::path::PathBuf;

use myarch_format::fs::FsSink;
use myarch_format::{ArchivePath, EntrySink, ExtractOptions};

use super::open_archive;
use crate::cli::ExtractArgs;
use crate::error::{Error, Result};

/// Prints every path as it is written when running verbosely.
struct Reporting<S> {
    inner: S,
    verbose: bool,
}

impl<S: EntrySink> EntrySink for Reporting<S> {
    fn create_directory(&mut self, path: &ArchivePath) -> std::io::Result<()> {
        tracing::trace!(%path, "create directory");
        self.inner.create_directory(path)
    }

    fn write_file(&mut self, path: &ArchivePath, data: &[u8]) -> std::io::Result<()> {
        if self.verbose {
            println!("{}", path.to_path_buf().display());
        }
        self.inner.write_file(path, data)
    }
}

pub fn run(args: ExtractArgs, verbose: bool) -> Result<()> {
    let reader = open_archive(&args.archive)?;

    let output_path = args.output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_path).map_err(|source| Error::ProcessFile {
        path: output_path.clone(),
        source,
    })?;

    let options = ExtractOptions {
        verify_checksums: !args.no_verify,
    };
    tracing::debug!(
        archive = %args.archive.display(),
        output = %output_path.display(),
        entries = reader.entries().len(),
        verify = options.verify_checksums,
        "extracting archive"
    );

    let sink = Reporting {
        inner: FsSink::new(&output_path),
        verbose,
    };

    let stats = reader
        .extract_all(sink, options)
        .map_err(|source| Error::Extract { source })?;

    println!(
        "Extracted {} files and {} directories to {}",
        stats.files_extracted,
        stats.dirs_created,
        output_path.display()
    );

    Ok(())
}
