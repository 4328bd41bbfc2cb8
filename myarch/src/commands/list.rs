use myarch_format::{ExtractError, Protection};

use crate::cli::ArchiveArgs;
use crate::error::{Error, Result};
use crate::util::{format_path, format_size};

use super::open_archive;

pub fn run(args: ArchiveArgs) -> Result<()> {
    let mut reader = open_archive(&args.archive)?;
    let entries = reader.entries().to_vec();
    let compression = reader.header().compression();
    let protection = reader.header().protection();

    println!("Method        Compressed     Length         Checksum   Path");
    println!("------------  -------------  -------------  ---------  --------");

    let mut total_compressed = 0u64;
    let mut total_length = 0u64;

    for entry in entries.iter() {
        if entry.is_directory() {
            println!(
                "{:12}  {:>13}  {:>13}  {:>9}  {}",
                "<directory>",
                "-",
                "-",
                "-",
                format_path(entry)
            );
            continue;
        }

        let record = match reader
            .next_record()
            .map_err(|source| Error::Extract { source })?
        {
            Some((_, record)) => record,
            None => break,
        };

        let length = compression
            .decompress(&record.data)
            .map_err(|e| Error::Extract {
                source: ExtractError::DecompressionFailed(e, entry.path.clone()),
            })?
            .len() as u64;

        let checksum = match protection {
            Protection::None => "-".to_string(),
            _ => format!("{:08x}", record.checksum),
        };

        println!(
            "{:12}  {:>13}  {:>13}  {:>9}  {}",
            compression.to_string(),
            format_size(record.compressed_size()),
            format_size(length),
            checksum,
            format_path(entry)
        );

        total_compressed += record.compressed_size();
        total_length += length;
    }

    println!("------------  -------------  -------------  ---------  --------");
    println!(
        "{:12}  {:>13}  {:>13}  {:>9}  {} entries",
        "",
        format_size(total_compressed),
        format_size(total_length),
        "",
        entries.len()
    );

    Ok(())
}
